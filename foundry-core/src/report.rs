//! Aggregate counts over a realized scan.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::types::VideoResult;

/// File totals of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub files: usize,
    pub kits: usize,
    /// Distinct file names, not paths: same-named files in different
    /// directories count once.
    pub unique_files: usize,
}

/// Grouped counts over a set of results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Number of results below the height threshold.
    pub concerns: usize,
    /// Keyed by lowercased extension.
    pub extensions: BTreeMap<String, usize>,
    pub groups: BTreeMap<String, usize>,
    /// Keyed by format label (`1080p`).
    pub resolutions: BTreeMap<String, usize>,
    pub total: ReportTotals,
}

impl ScanReport {
    /// Resolution counts ordered by numeric height, tallest first.
    pub fn resolutions_by_height(&self) -> Vec<(&str, usize)> {
        let mut sorted: Vec<_> = self
            .resolutions
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        sorted.sort_by(|(a, _), (b, _)| {
            label_height(b)
                .cmp(&label_height(a))
                .then_with(|| a.cmp(b))
        });
        sorted
    }
}

fn label_height(label: &str) -> u32 {
    let digits = label
        .find(|c: char| !c.is_ascii_digit())
        .map_or(label, |end| &label[..end]);
    digits.parse().unwrap_or(0)
}

/// A finished report together with the records it flagged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummary {
    pub min_acceptable_height: u32,
    pub report: ScanReport,
    pub concerns: Vec<VideoResult>,
}

/// True when the result has a known height strictly below
/// `min_acceptable_height`.
///
/// Results without a probed height are never concerns.
pub fn is_concern(result: &VideoResult, min_acceptable_height: u32) -> bool {
    result
        .height()
        .is_some_and(|height| height < min_acceptable_height)
}

/// Incremental report builder, fed one result at a time while a scan stream
/// is consumed.
#[derive(Debug, Clone)]
pub struct ReportAccumulator {
    min_acceptable_height: u32,
    report: ScanReport,
    filenames: HashSet<String>,
    concerns: Vec<VideoResult>,
}

impl ReportAccumulator {
    pub fn new(min_acceptable_height: u32) -> Self {
        Self {
            min_acceptable_height,
            report: ScanReport::default(),
            filenames: HashSet::new(),
            concerns: Vec::new(),
        }
    }

    pub fn push(&mut self, result: &VideoResult) {
        let file = &result.file_details;
        let report = &mut self.report;

        report.total.files += 1;
        if file.is_kit {
            report.total.kits += 1;
        }
        if self.filenames.insert(file.filename.clone()) {
            report.total.unique_files += 1;
        }

        *report
            .extensions
            .entry(file.extension.to_lowercase())
            .or_default() += 1;
        if let Some(format) = &result.video_details.attributes.format {
            *report.resolutions.entry(format.clone()).or_default() += 1;
        }
        if let Some(group) = &file.group {
            *report.groups.entry(group.clone()).or_default() += 1;
        }

        if is_concern(result, self.min_acceptable_height) {
            report.concerns += 1;
            self.concerns.push(result.clone());
        }
    }

    /// Files seen so far.
    pub fn count(&self) -> usize {
        self.report.total.files
    }

    pub fn finish(self) -> ScanSummary {
        ScanSummary {
            min_acceptable_height: self.min_acceptable_height,
            report: self.report,
            concerns: self.concerns,
        }
    }
}

/// Build the report for an already realized result list.
pub fn summarize(
    results: &[VideoResult],
    min_acceptable_height: u32,
) -> ScanSummary {
    let mut accumulator = ReportAccumulator::new(min_acceptable_height);
    for result in results {
        accumulator.push(result);
    }
    accumulator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileDetails, ScanType, VideoAttributes, VideoDetails};
    use std::path::PathBuf;

    fn result(
        path: &str,
        group: Option<&str>,
        is_kit: bool,
        height: Option<u32>,
    ) -> VideoResult {
        let path = PathBuf::from(path);
        let filename = path.file_name().unwrap().to_string_lossy().into_owned();
        let dot = filename.rfind('.').unwrap();
        VideoResult {
            file_details: FileDetails {
                file_path: path.clone(),
                filename: filename.clone(),
                extension: filename[dot..].to_string(),
                base_filename: filename[..dot].to_string(),
                additional_extensions: Vec::new(),
                group: group.map(str::to_string),
                is_kit,
            },
            video_details: VideoDetails {
                name: filename[..dot].to_string(),
                year: None,
                attributes: VideoAttributes {
                    height,
                    scan_type: height.map(|_| ScanType::Progressive),
                    format: height.map(|h| format!("{h}p")),
                    ..Default::default()
                },
            },
        }
    }

    #[test]
    fn test_counts() {
        let results = vec![
            result("/m/A/Heat.mkv", Some("A"), false, Some(1080)),
            result("/m/B/Heat.mkv", Some("B"), false, Some(2160)),
            result("/m/A/Alien/Alien.MKV", Some("A"), true, Some(480)),
            result("/m/Old.avi", Some("m"), false, None),
        ];
        let summary = summarize(&results, 720);
        let report = &summary.report;

        assert_eq!(report.total.files, 4);
        assert_eq!(report.total.unique_files, 3);
        assert_eq!(report.total.kits, 1);
        assert_eq!(report.concerns, 1);
        assert_eq!(summary.concerns[0].file_details.filename, "Alien.MKV");
        assert_eq!(report.extensions.get(".mkv"), Some(&3));
        assert_eq!(report.extensions.get(".avi"), Some(&1));
        assert_eq!(report.groups.get("A"), Some(&2));
        assert_eq!(report.resolutions.len(), 3);
    }

    #[test]
    fn test_unknown_height_is_never_a_concern() {
        let results = vec![result("/m/Old.avi", None, false, None)];
        for threshold in [0, 720, u32::MAX] {
            assert_eq!(summarize(&results, threshold).report.concerns, 0);
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let results = vec![result("/m/Edge.mkv", None, false, Some(720))];
        assert_eq!(summarize(&results, 720).report.concerns, 0);
        assert_eq!(summarize(&results, 721).report.concerns, 1);
    }

    #[test]
    fn test_absent_group_and_format_are_not_counted() {
        let results = vec![result("Loose.mkv", None, false, None)];
        let report = summarize(&results, 720).report;
        assert!(report.groups.is_empty());
        assert!(report.resolutions.is_empty());
    }

    #[test]
    fn test_resolutions_by_height() {
        let results = vec![
            result("/m/a.mkv", None, false, Some(480)),
            result("/m/b.mkv", None, false, Some(2160)),
            result("/m/c.mkv", None, false, Some(1080)),
            result("/m/d.mkv", None, false, Some(1080)),
        ];
        let report = summarize(&results, 720).report;
        assert_eq!(
            report.resolutions_by_height(),
            vec![("2160p", 1), ("1080p", 2), ("480p", 1)]
        );
    }

    #[test]
    fn test_json_shape() {
        let results =
            vec![result("/m/A/Heat.mkv", Some("A"), false, Some(1080))];
        let json =
            serde_json::to_value(summarize(&results, 720).report).unwrap();
        assert_eq!(json["total"]["uniqueFiles"], 1);
        assert_eq!(json["total"]["files"], 1);
        assert_eq!(json["resolutions"]["1080p"], 1);
        assert_eq!(json["concerns"], 0);
    }
}
