use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::ProbeError;

/// Sink for per-file problems the pipeline absorbs instead of failing.
///
/// Injected into the scanner so the core never reaches for process-wide
/// logging state of its own.
pub trait ScanObserver: Send + Sync {
    /// A file could not be probed; it is still yielded with empty attributes.
    fn probe_failed(&self, path: &Path, error: &ProbeError);

    /// A directory below the scan root could not be listed and was skipped.
    fn directory_skipped(&self, path: &Path, error: &std::io::Error);

    /// A listed entry whose metadata could not be read was skipped.
    fn entry_skipped(&self, path: &Path, error: &std::io::Error);
}

/// Default observer forwarding everything to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn probe_failed(&self, path: &Path, error: &ProbeError) {
        tracing::warn!(
            target: "foundry::probe",
            path = %path.display(),
            error = %error,
            "failed to probe media file"
        );
    }

    fn directory_skipped(&self, path: &Path, error: &std::io::Error) {
        tracing::warn!(
            target: "foundry::scan",
            path = %path.display(),
            error = %error,
            "skipping unreadable directory"
        );
    }

    fn entry_skipped(&self, path: &Path, error: &std::io::Error) {
        tracing::warn!(
            target: "foundry::scan",
            path = %path.display(),
            error = %error,
            "skipping entry due to metadata error"
        );
    }
}

/// Observer that keeps every event in memory, rendered as strings.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    probe_failures: Mutex<Vec<(PathBuf, String)>>,
    skipped_directories: Mutex<Vec<(PathBuf, String)>>,
    skipped_entries: Mutex<Vec<(PathBuf, String)>>,
}

impl RecordingObserver {
    pub fn probe_failures(&self) -> Vec<(PathBuf, String)> {
        self.probe_failures
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn skipped_directories(&self) -> Vec<(PathBuf, String)> {
        self.skipped_directories
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn skipped_entries(&self) -> Vec<(PathBuf, String)> {
        self.skipped_entries
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ScanObserver for RecordingObserver {
    fn probe_failed(&self, path: &Path, error: &ProbeError) {
        if let Ok(mut events) = self.probe_failures.lock() {
            events.push((path.to_path_buf(), error.to_string()));
        }
    }

    fn directory_skipped(&self, path: &Path, error: &std::io::Error) {
        if let Ok(mut events) = self.skipped_directories.lock() {
            events.push((path.to_path_buf(), error.to_string()));
        }
    }

    fn entry_skipped(&self, path: &Path, error: &std::io::Error) {
        if let Ok(mut events) = self.skipped_entries.lock() {
            events.push((path.to_path_buf(), error.to_string()));
        }
    }
}
