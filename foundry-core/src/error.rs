use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Errors that abort a scan invocation.
///
/// Only problems with the scan root (or with the options handed to the
/// scanner) surface here. Everything that goes wrong for an individual file
/// is absorbed by the pipeline and reported through a
/// [`ScanObserver`](crate::scan::ScanObserver).
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("scan root not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("scan root unreadable: {}: {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scan option: {0}")]
    InvalidOption(String),
}

/// Failure of the external media probing capability for one file.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("probe exited with {status}: {stderr}")]
    Exited { status: ExitStatus, stderr: String },

    #[error("probe produced invalid output: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
