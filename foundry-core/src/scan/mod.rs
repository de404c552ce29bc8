//! Directory traversal and the enrichment pipeline built on top of it.

pub mod filter;
pub mod fs;
pub mod observer;
pub mod orchestrator;
pub mod settings;
pub mod walker;

pub use filter::TraversalFilter;
pub use fs::{FileSystem, FsMetadata, InMemoryFs, ReadDirStream, RealFs};
pub use observer::{RecordingObserver, ScanObserver, TracingObserver};
pub use orchestrator::{ScanOptions, VideoScanner, list_videos};
pub use walker::{DirectoryWalker, UNLIMITED_DEPTH, walk};
