use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Facts derived purely from a file's path and the directories around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetails {
    /// Path exactly as produced by traversal. Natural key of a result.
    pub file_path: PathBuf,
    pub filename: String,
    /// Last dot-delimited suffix including the dot, or empty.
    pub extension: String,
    /// `filename` without `extension`.
    pub base_filename: String,
    /// Chained suffixes between the core title segment and the extension,
    /// each re-prefixed with a dot (`Movie.en.forced.srt` -> `.en`, `.forced`).
    pub additional_extensions: Vec<String>,
    /// Nearest meaningful ancestor directory name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub is_kit: bool,
}

/// Whether frames are stored whole or as two interleaved fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    Progressive,
    Interlaced,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::Progressive => "progressive",
            ScanType::Interlaced => "interlaced",
        }
    }

    /// Lowercase first letter, used as the suffix of a format label.
    pub fn initial(&self) -> char {
        match self {
            ScanType::Progressive => 'p',
            ScanType::Interlaced => 'i',
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized stream attributes of the first video stream of a file.
///
/// Every field is absent when the file could not be probed or carries no
/// video stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    /// Average frame rate in ratio form, e.g. `24000/1001`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_type: Option<ScanType>,
    /// Height followed by the scan type initial, e.g. `1080p`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl VideoAttributes {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Title information from the file name merged with probed attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(flatten)]
    pub attributes: VideoAttributes,
}

/// One record per matched video file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResult {
    pub file_details: FileDetails,
    pub video_details: VideoDetails,
}

impl VideoResult {
    pub fn file_path(&self) -> &std::path::Path {
        &self.file_details.file_path
    }

    pub fn height(&self) -> Option<u32> {
        self.video_details.attributes.height
    }
}
