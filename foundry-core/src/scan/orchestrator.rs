use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use futures::future;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::filter::TraversalFilter;
use super::fs::{FileSystem, RealFs};
use super::observer::{ScanObserver, TracingObserver};
use super::settings::{
    DEFAULT_PROBE_CONCURRENCY, default_omit_prefixes_vec,
    default_omit_suffixes_vec, default_video_file_extensions_vec,
    normalize_extension,
};
use super::walker::{DirectoryWalker, UNLIMITED_DEPTH};
use crate::error::{Result, ScanError};
use crate::metadata::ffprobe::FfprobeProbe;
use crate::metadata::filename_parser::extract_title_year;
use crate::metadata::kit::{group_parts, is_kit_parts};
use crate::metadata::paths::{PathCache, PathParts};
use crate::metadata::probe::{MediaAttributeProber, MediaProbe};
use crate::types::{FileDetails, VideoDetails, VideoResult};

/// Options for a single catalog scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Negative means nothing is scanned. [`UNLIMITED_DEPTH`] by default.
    pub max_depth: i32,
    /// Allowed extensions, compared case-insensitively with or without the
    /// leading dot.
    pub extensions: Vec<String>,
    pub omit_prefixes: Vec<String>,
    pub omit_suffixes: Vec<String>,
    /// Probes kept in flight at once. Results still come out in traversal
    /// order.
    pub probe_concurrency: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: UNLIMITED_DEPTH,
            extensions: default_video_file_extensions_vec(),
            omit_prefixes: default_omit_prefixes_vec(),
            omit_suffixes: default_omit_suffixes_vec(),
            probe_concurrency: DEFAULT_PROBE_CONCURRENCY,
        }
    }
}

impl ScanOptions {
    pub fn validate(&self) -> Result<()> {
        if self.probe_concurrency == 0 {
            return Err(ScanError::InvalidOption(
                "probe_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn allowed_extensions(&self) -> HashSet<String> {
        self.extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .filter(|ext| !ext.is_empty())
            .collect()
    }
}

/// Drives traversal, classification and probing for a catalog scan.
///
/// Each call to [`VideoScanner::list_videos`] is an independent, lazy
/// pipeline with its own path memo; the scanner itself holds no per-scan
/// state and can be reused or shared.
#[derive(Clone)]
pub struct VideoScanner {
    fs: Arc<dyn FileSystem>,
    probe: Arc<dyn MediaProbe>,
    observer: Arc<dyn ScanObserver>,
    options: ScanOptions,
    cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for VideoScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoScanner")
            .field("options", &self.options)
            .field("cancellable", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}

impl VideoScanner {
    pub fn new(fs: Arc<dyn FileSystem>, probe: Arc<dyn MediaProbe>) -> Self {
        Self {
            fs,
            probe,
            observer: Arc::new(TracingObserver),
            options: ScanOptions::default(),
            cancel: None,
        }
    }

    /// Scanner over the real filesystem probing with `ffprobe` from `PATH`.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(RealFs::new()), Arc::new(FfprobeProbe::new()))
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Stop yielding once `token` is cancelled. In-flight probes are dropped
    /// along with the stream.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Lazily yield one [`VideoResult`] per matching video file below `root`.
    ///
    /// Results arrive in traversal order. At most `probe_concurrency` probes
    /// run at a time, and only while the consumer keeps polling. Root
    /// failures (and invalid options) surface as the first error item.
    pub fn list_videos(
        &self,
        root: impl Into<PathBuf>,
    ) -> BoxStream<'static, Result<VideoResult>> {
        let root = root.into();
        if let Err(error) = self.options.validate() {
            return futures::stream::once(future::ready(Err(error))).boxed();
        }

        info!(
            target: "foundry::scan",
            root = %root.display(),
            max_depth = self.options.max_depth,
            "starting video scan"
        );

        let walker = DirectoryWalker::new(Arc::clone(&self.fs))
            .with_max_depth(self.options.max_depth)
            .with_filter(TraversalFilter::new(
                self.options.omit_prefixes.clone(),
                self.options.omit_suffixes.clone(),
            ))
            .with_observer(Arc::clone(&self.observer));

        let allowed = self.options.allowed_extensions();
        let prober = MediaAttributeProber::new(
            Arc::clone(&self.probe),
            Arc::clone(&self.observer),
        );
        let mut cache = PathCache::new();

        let results = walker
            .walk(root)
            .try_filter_map(move |path| {
                let parts = cache.parts(&path);
                let extension = parts.name_parts.extension.to_lowercase();
                let pending = if allowed.contains(&extension) {
                    Some(enrich(path, parts, prober.clone()))
                } else {
                    None
                };
                future::ready(Ok(pending))
            })
            .try_buffered(self.options.probe_concurrency);

        match &self.cancel {
            Some(token) => results
                .take_until(token.clone().cancelled_owned())
                .boxed(),
            None => results.boxed(),
        }
    }
}

async fn enrich(
    path: PathBuf,
    parts: PathParts,
    prober: MediaAttributeProber,
) -> Result<VideoResult> {
    let is_kit = is_kit_parts(&parts);
    let group = group_parts(&parts);
    let title = extract_title_year(&parts.name_parts.base_filename);
    let attributes = prober.probe(&path).await;

    debug!(
        target: "foundry::scan",
        path = %path.display(),
        format = attributes.format.as_deref().unwrap_or("unknown"),
        "enriched video"
    );

    Ok(VideoResult {
        file_details: FileDetails {
            file_path: path,
            filename: parts.filename,
            extension: parts.name_parts.extension,
            base_filename: parts.name_parts.base_filename,
            additional_extensions: parts.name_parts.additional_extensions,
            group,
            is_kit,
        },
        video_details: VideoDetails {
            name: title.name,
            year: title.year,
            attributes,
        },
    })
}

/// Scan `root` on the real filesystem with `ffprobe` from `PATH`.
pub fn list_videos(
    root: impl Into<PathBuf>,
    max_depth: i32,
    extensions: Vec<String>,
    omit_prefixes: Vec<String>,
    omit_suffixes: Vec<String>,
) -> BoxStream<'static, Result<VideoResult>> {
    VideoScanner::with_defaults()
        .with_options(ScanOptions {
            max_depth,
            extensions,
            omit_prefixes,
            omit_suffixes,
            ..ScanOptions::default()
        })
        .list_videos(root)
}
