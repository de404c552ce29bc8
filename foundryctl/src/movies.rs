use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use foundry_config::{ScanConfig, ScanConfigSource};
use foundry_core::{
    RealFs, ReportAccumulator, ScanSummary, VideoResult, VideoScanner,
};
use futures::TryStreamExt;
use serde::Serialize;
use tracing::info;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// The directory to traverse
    #[arg(default_value = "./")]
    pub path: PathBuf,

    /// How many directories should be recursed? Negative scans nothing.
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    pub depth: Option<i32>,

    /// Replace the default movie file extensions used during the scan
    #[arg(long, short = 'e', value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Omit files that match one of the given prefixes
    #[arg(long, value_delimiter = ',')]
    pub omit_prefixes: Option<Vec<String>>,

    /// Omit files that match one of the given suffixes (extensions ignored)
    #[arg(long, value_delimiter = ',')]
    pub omit_suffixes: Option<Vec<String>>,

    /// What is the minimum acceptable height in pixels?
    #[arg(long)]
    pub min_acceptable_height: Option<u32>,

    /// Read scan settings from this TOML or JSON file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    fn resolve_config(&self) -> Result<ScanConfig> {
        let (mut config, source) = match &self.config {
            Some(path) => (
                ScanConfig::load_from_file(path)?,
                ScanConfigSource::File(path.clone()),
            ),
            None => ScanConfig::load_from_env()?,
        };
        info!(source = %source, "resolved scan configuration");

        if let Some(depth) = self.depth {
            config.max_depth = Some(depth);
        }
        if let Some(extensions) = &self.extensions {
            config.extensions = extensions.clone();
        }
        if let Some(prefixes) = &self.omit_prefixes {
            config.omit_prefixes = prefixes.clone();
        }
        if let Some(suffixes) = &self.omit_suffixes {
            config.omit_suffixes = suffixes.clone();
        }
        if let Some(height) = self.min_acceptable_height {
            config.min_acceptable_height = height;
        }

        config.normalize();
        config.validate().context("invalid scan configuration")?;
        Ok(config)
    }
}

#[derive(Serialize)]
struct ListOutput<'a> {
    total: usize,
    concerns: &'a [VideoResult],
    report: &'a foundry_core::ScanReport,
    results: &'a [VideoResult],
}

pub async fn list(args: ListArgs) -> Result<()> {
    let config = args.resolve_config()?;
    info!(path = %args.path.display(), "listing all movies");

    let scanner =
        VideoScanner::new(Arc::new(RealFs::new()), Arc::new(config.ffprobe()))
            .with_options(config.scan_options());

    let mut stream = scanner.list_videos(args.path.clone());
    let mut accumulator = ReportAccumulator::new(config.min_acceptable_height);
    let mut results = Vec::new();
    while let Some(result) = stream
        .try_next()
        .await
        .with_context(|| format!("failed to scan {}", args.path.display()))?
    {
        accumulator.push(&result);
        tracing::debug!(scanned = accumulator.count(), "scanned movie file");
        results.push(result);
    }

    let summary = accumulator.finish();
    info!(
        total = results.len(),
        concerns = summary.concerns.len(),
        "scan complete"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let output = ListOutput {
            total: results.len(),
            concerns: &summary.concerns,
            report: &summary.report,
            results: &results,
        };
        serde_json::to_writer_pretty(&mut out, &output)?;
        writeln!(out)?;
    } else {
        write_summary(&mut out, &summary)?;
    }
    Ok(())
}

fn write_counts<'a>(
    out: &mut impl Write,
    title: &str,
    counts: impl IntoIterator<Item = (&'a str, usize)>,
) -> io::Result<()> {
    let counts: Vec<_> = counts.into_iter().collect();
    if counts.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{title}")?;
    let width = counts.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, count) in counts {
        writeln!(out, "  {key:<width$}  {count}")?;
    }
    Ok(())
}

fn write_summary(
    out: &mut impl Write,
    summary: &ScanSummary,
) -> io::Result<()> {
    let report = &summary.report;
    writeln!(out, "Report Summary")?;
    writeln!(out, "  Total files:       {}", report.total.files)?;
    writeln!(
        out,
        "  Concerns (<{}px):  {}",
        summary.min_acceptable_height, report.concerns
    )?;
    writeln!(out, "  Unique filenames:  {}", report.total.unique_files)?;
    writeln!(out, "  Kits:              {}", report.total.kits)?;

    write_counts(
        out,
        "Extensions",
        report.extensions.iter().map(|(k, v)| (k.as_str(), *v)),
    )?;
    write_counts(out, "Resolutions", report.resolutions_by_height())?;
    write_counts(
        out,
        "Groups",
        report.groups.iter().map(|(k, v)| (k.as_str(), *v)),
    )?;

    if !summary.concerns.is_empty() {
        writeln!(out)?;
        writeln!(out, "Concerns")?;
        for concern in &summary.concerns {
            let format = concern
                .video_details
                .attributes
                .format
                .as_deref()
                .unwrap_or("?");
            writeln!(out, "  {} ({format})", concern.file_path().display())?;
        }
    }
    Ok(())
}
