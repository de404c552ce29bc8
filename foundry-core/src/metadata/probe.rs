use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use crate::error::ProbeError;
use crate::scan::observer::ScanObserver;
use crate::types::{ScanType, VideoAttributes};

/// Raw stream descriptor as reported by the probing capability.
///
/// Field names follow ffprobe's `-show_streams` JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProbeStream {
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub codec_name: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub avg_frame_rate: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub field_order: Option<String>,
}

impl ProbeStream {
    pub fn is_video(&self) -> bool {
        self.codec_type.as_deref() == Some("video")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProbeOutput {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

/// External capability that reads stream descriptors from a media file.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<ProbeOutput, ProbeError>;
}

/// Field-order codes that carry no interlacing signal.
const PROGRESSIVE_FIELD_ORDERS: &[&str] =
    &["progressive", "unknown", "undefined"];

/// Classify a probed field-order code.
///
/// Ambiguous signals (absent, empty, `unknown`, `undefined`) default to
/// progressive; any other code (`tt`, `bb`, `tb`, `bt`, ...) is interlaced.
pub fn scan_type_from_field_order(field_order: Option<&str>) -> ScanType {
    match field_order.map(str::trim) {
        None | Some("") => ScanType::Progressive,
        Some(code)
            if PROGRESSIVE_FIELD_ORDERS
                .iter()
                .any(|known| code.eq_ignore_ascii_case(known)) =>
        {
            ScanType::Progressive
        }
        Some(_) => ScanType::Interlaced,
    }
}

/// `1080` + progressive -> `1080p`.
pub fn format_label(height: u32, scan_type: ScanType) -> String {
    format!("{height}{}", scan_type.initial())
}

/// Normalize the first video stream of a probe into [`VideoAttributes`].
/// No video stream yields an empty attribute set.
pub fn attributes_from_output(output: &ProbeOutput) -> VideoAttributes {
    let Some(video) = output.streams.iter().find(|s| s.is_video()) else {
        return VideoAttributes::default();
    };

    let scan_type = scan_type_from_field_order(video.field_order.as_deref());
    VideoAttributes {
        width: video.width,
        height: video.height,
        codec: video.codec_name.clone(),
        frame_rate: video.avg_frame_rate.clone(),
        duration_seconds: video
            .duration
            .as_deref()
            .and_then(|d| d.trim().parse::<f64>().ok()),
        scan_type: Some(scan_type),
        format: video.height.map(|h| format_label(h, scan_type)),
    }
}

/// Adapter between the orchestrator and a [`MediaProbe`].
///
/// Never fails: probe errors are handed to the observer and turned into an
/// empty attribute set so one bad file cannot abort a scan.
#[derive(Clone)]
pub struct MediaAttributeProber {
    probe: Arc<dyn MediaProbe>,
    observer: Arc<dyn ScanObserver>,
}

impl std::fmt::Debug for MediaAttributeProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaAttributeProber").finish_non_exhaustive()
    }
}

impl MediaAttributeProber {
    pub fn new(
        probe: Arc<dyn MediaProbe>,
        observer: Arc<dyn ScanObserver>,
    ) -> Self {
        Self { probe, observer }
    }

    pub async fn probe(&self, path: &Path) -> VideoAttributes {
        match self.probe.probe(path).await {
            Ok(output) => attributes_from_output(&output),
            Err(error) => {
                self.observer.probe_failed(path, &error);
                VideoAttributes::default()
            }
        }
    }
}
