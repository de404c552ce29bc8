//! # Foundry Core
//!
//! Catalog scanning for personal video libraries: walk a directory tree,
//! decompose each video file name, classify kits and groups, probe stream
//! attributes, and aggregate the results into a report.
//!
//! ## Architecture
//!
//! - [`scan`]: depth-bounded traversal with prefix/suffix filtering, and the
//!   [`VideoScanner`] pipeline that turns paths into [`VideoResult`]s.
//! - [`metadata`]: file name decomposition, kit/group heuristics and the
//!   [`MediaProbe`] capability (backed by `ffprobe`).
//! - [`report`]: grouped counts and resolution concerns.
//!
//! The filesystem and the probe are traits so scans can run against
//! in-memory fixtures, and per-file problems go to an injected
//! [`ScanObserver`] rather than global logging state.
//!
//! ## Example
//!
//! ```no_run
//! use foundry_core::{VideoScanner, ScanOptions, summarize};
//! use futures::TryStreamExt;
//!
//! # async fn run() -> foundry_core::Result<()> {
//! let scanner = VideoScanner::with_defaults().with_options(ScanOptions {
//!     max_depth: 3,
//!     ..ScanOptions::default()
//! });
//! let results: Vec<_> =
//!     scanner.list_videos("/media/movies").try_collect().await?;
//! let report = summarize(&results, 720).report;
//! println!("{} files, {} concerns", report.total.files, report.concerns);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod metadata;
pub mod report;
pub mod scan;
pub mod types;

pub use error::{ProbeError, Result, ScanError};
pub use metadata::{
    FfprobeProbe, MediaAttributeProber, MediaProbe, ProbeOutput, ProbeStream,
};
pub use report::{
    ReportAccumulator, ReportTotals, ScanReport, ScanSummary, is_concern,
    summarize,
};
pub use scan::{
    DirectoryWalker, FileSystem, InMemoryFs, RealFs, RecordingObserver,
    ScanObserver, ScanOptions, TracingObserver, TraversalFilter, VideoScanner,
    list_videos, walk,
};
pub use types::{
    FileDetails, ScanType, VideoAttributes, VideoDetails, VideoResult,
};
