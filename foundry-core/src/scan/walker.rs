use async_stream::try_stream;
use futures::stream::BoxStream;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

use super::filter::TraversalFilter;
use super::fs::{FileSystem, ReadDirStream, RealFs};
use super::observer::{ScanObserver, TracingObserver};
use crate::error::{Result, ScanError};
use crate::metadata::paths::file_name;

/// Depth used when the caller sets no limit.
pub const UNLIMITED_DEPTH: i32 = i32::MAX;

/// Depth-bounded, depth-first directory traversal.
///
/// Depth 0 lists only the root, depth 1 also lists its immediate
/// subdirectories, and so on. A negative depth yields nothing without touching
/// the filesystem.
#[derive(Clone)]
pub struct DirectoryWalker {
    fs: Arc<dyn FileSystem>,
    filter: TraversalFilter,
    max_depth: i32,
    observer: Arc<dyn ScanObserver>,
}

impl std::fmt::Debug for DirectoryWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryWalker")
            .field("filter", &self.filter)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

struct Frame {
    path: PathBuf,
    listing: Box<dyn ReadDirStream + Send>,
    depth: i32,
}

impl DirectoryWalker {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            filter: TraversalFilter::allow_all(),
            max_depth: UNLIMITED_DEPTH,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_filter(mut self, filter: TraversalFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_max_depth(mut self, max_depth: i32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Lazily yield every non-excluded file below `root`.
    ///
    /// Entries come out in listing order, descending into a directory as soon
    /// as it is encountered. A missing or unreadable root is returned as the
    /// first (and only) item; unreadable subdirectories and entries are
    /// reported to the observer and skipped. Dropping the stream stops the
    /// traversal.
    ///
    /// A relative root, or one containing `.` or `..`, is canonicalized
    /// first so every yielded path has real directory names above it.
    pub fn walk(
        &self,
        root: impl Into<PathBuf>,
    ) -> BoxStream<'static, Result<PathBuf>> {
        let fs = Arc::clone(&self.fs);
        let observer = Arc::clone(&self.observer);
        let filter = self.filter.clone();
        let max_depth = self.max_depth;
        let root = root.into();

        Box::pin(try_stream! {
            if max_depth >= 0 {
                let (resolved, listing) = open_root(fs.as_ref(), &root).await?;
                let mut stack = vec![Frame {
                    path: resolved,
                    listing,
                    depth: max_depth,
                }];

                loop {
                    let at_root = stack.len() == 1;
                    let Some(frame) = stack.last_mut() else {
                        break;
                    };
                    let depth = frame.depth;
                    let next = match frame.listing.next_entry().await {
                        Ok(next) => next,
                        Err(source) if at_root => {
                            Err::<(), ScanError>(ScanError::RootUnreadable {
                                path: root.clone(),
                                source,
                            })?;
                            None
                        }
                        Err(error) => {
                            observer.directory_skipped(&frame.path, &error);
                            None
                        }
                    };

                    let Some(entry) = next else {
                        stack.pop();
                        continue;
                    };

                    let metadata = match fs.metadata(&entry).await {
                        Ok(metadata) => metadata,
                        Err(error) => {
                            observer.entry_skipped(&entry, &error);
                            continue;
                        }
                    };

                    if metadata.is_dir {
                        if depth == 0 {
                            trace!(
                                target: "foundry::scan",
                                path = %entry.display(),
                                "depth limit reached"
                            );
                            continue;
                        }
                        match fs.read_dir(&entry).await {
                            Ok(listing) => stack.push(Frame {
                                path: entry,
                                listing,
                                depth: depth - 1,
                            }),
                            Err(error) => {
                                observer.directory_skipped(&entry, &error);
                            }
                        }
                        continue;
                    }

                    if filter.is_excluded(&file_name(&entry)) {
                        trace!(
                            target: "foundry::scan",
                            path = %entry.display(),
                            "file omitted by filter"
                        );
                        continue;
                    }

                    debug!(
                        target: "foundry::scan",
                        path = %entry.display(),
                        "discovered file"
                    );
                    yield entry;
                }
            }
        })
    }
}

fn needs_resolution(root: &Path) -> bool {
    root.is_relative()
        || root
            .components()
            .any(|c| matches!(c, Component::CurDir | Component::ParentDir))
}

async fn open_root(
    fs: &dyn FileSystem,
    root: &Path,
) -> Result<(PathBuf, Box<dyn ReadDirStream + Send>)> {
    let root_error = |source: io::Error| {
        if source.kind() == io::ErrorKind::NotFound {
            ScanError::RootNotFound {
                path: root.to_path_buf(),
            }
        } else {
            ScanError::RootUnreadable {
                path: root.to_path_buf(),
                source,
            }
        }
    };

    let resolved = if needs_resolution(root) {
        fs.canonicalize(root).await.map_err(root_error)?
    } else {
        root.to_path_buf()
    };
    if !fs.path_exists(&resolved).await {
        return Err(ScanError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    trace!(
        target: "foundry::scan",
        root = %resolved.display(),
        "resolved scan root"
    );

    let listing = fs.read_dir(&resolved).await.map_err(root_error)?;
    Ok((resolved, listing))
}

/// Walk the real filesystem below `root`.
///
/// Convenience over [`DirectoryWalker`] with [`RealFs`] and a
/// [`TracingObserver`].
pub fn walk(
    root: impl Into<PathBuf>,
    max_depth: i32,
    omit_prefixes: Vec<String>,
    omit_suffixes: Vec<String>,
) -> BoxStream<'static, Result<PathBuf>> {
    DirectoryWalker::new(Arc::new(RealFs::new()))
        .with_max_depth(max_depth)
        .with_filter(TraversalFilter::new(omit_prefixes, omit_suffixes))
        .walk(root)
}
