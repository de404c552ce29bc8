use anyhow::{Context, anyhow};
use foundry_core::scan::{ScanOptions, UNLIMITED_DEPTH, settings};
use foundry_core::FfprobeProbe;
use serde::{Deserialize, Serialize};
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// Environment variable naming a TOML or JSON config file.
pub const CONFIG_PATH_ENV: &str = "FOUNDRY_SCAN_CONFIG_PATH";
/// Environment variable holding inline JSON config.
pub const CONFIG_JSON_ENV: &str = "FOUNDRY_SCAN_CONFIG_JSON";

const DEFAULT_FILE_CANDIDATES: &[&str] = &[
    "foundry.toml",
    "foundry.json",
    "config/foundry.toml",
    "config/foundry.json",
];

/// Source that produced the scan configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl fmt::Display for ScanConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanConfigSource::Default => f.write_str("built-in defaults"),
            ScanConfigSource::EnvPath(path) => {
                write!(f, "{} ({CONFIG_PATH_ENV})", path.display())
            }
            ScanConfigSource::EnvInline => f.write_str(CONFIG_JSON_ENV),
            ScanConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("probe_concurrency must be at least 1")]
    ZeroProbeConcurrency,
    #[error("at least one video extension is required")]
    NoExtensions,
}

/// Settings for one catalog scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// How many directory levels below the root to descend. Absent means no
    /// limit; a negative value scans nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<i32>,
    /// Extensions treated as video files. `mkv` and `.MKV` are equivalent.
    pub extensions: Vec<String>,
    /// Files whose name starts with one of these are skipped.
    pub omit_prefixes: Vec<String>,
    /// Files whose name, extensions stripped, ends with one of these are
    /// skipped.
    pub omit_suffixes: Vec<String>,
    /// Files probed below this height are reported as concerns.
    pub min_acceptable_height: u32,
    /// Probes run at once.
    pub probe_concurrency: usize,
    pub ffprobe_path: PathBuf,
    /// Per-file probe limit in milliseconds; 0 disables the limit.
    pub probe_timeout_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            extensions: settings::default_video_file_extensions_vec(),
            omit_prefixes: settings::default_omit_prefixes_vec(),
            omit_suffixes: settings::default_omit_suffixes_vec(),
            min_acceptable_height: settings::DEFAULT_MIN_ACCEPTABLE_HEIGHT,
            probe_concurrency: settings::DEFAULT_PROBE_CONCURRENCY,
            ffprobe_path: PathBuf::from("ffprobe"),
            probe_timeout_ms: 30_000,
        }
    }
}

impl ScanConfig {
    /// Load configuration from the process environment, resolving default
    /// files against the current directory.
    pub fn load_from_env() -> anyhow::Result<(Self, ScanConfigSource)> {
        Self::load_with(|key| env::var(key).ok(), Path::new("."))
    }

    /// Evaluation order:
    /// 1) `$FOUNDRY_SCAN_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$FOUNDRY_SCAN_CONFIG_JSON` (inline JSON),
    /// 3) the first existing well-known file under `base_dir`,
    /// 4) defaults.
    pub fn load_with(
        lookup: impl Fn(&str) -> Option<String>,
        base_dir: &Path,
    ) -> anyhow::Result<(Self, ScanConfigSource)> {
        if let Some(path_str) = lookup(CONFIG_PATH_ENV)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str.trim());
            let config = Self::load_from_file(&path)?;
            return Ok((config, ScanConfigSource::EnvPath(path)));
        }

        if let Some(raw) = lookup(CONFIG_JSON_ENV)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))?;
            return Ok((parsed, ScanConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(base_dir) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ScanConfigSource::File(path)));
        }

        Ok((Self::default(), ScanConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read scan config from {}", path.display())
        })?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid scan config {}", path.display())
            })?,
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| {
                    anyhow!("invalid scan config {}: {}", path.display(), err)
                })?
            }
            _ => Self::parse_from_str(&contents, &path.display().to_string())?,
        };
        tracing::debug!(path = %path.display(), "loaded scan config");
        Ok(config)
    }

    /// Parse TOML, falling back to JSON.
    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse scan config {}: \
                     toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid scan config json: {err}"))
    }

    fn find_default_file(base_dir: &Path) -> Option<PathBuf> {
        DEFAULT_FILE_CANDIDATES
            .iter()
            .map(|candidate| base_dir.join(candidate))
            .find(|path| path.is_file())
    }

    /// Lowercase extensions, add missing leading dots, drop blanks and
    /// duplicates (first occurrence wins).
    pub fn normalize(&mut self) {
        let mut seen = Vec::with_capacity(self.extensions.len());
        for ext in &self.extensions {
            let normalized = settings::normalize_extension(ext);
            if !normalized.is_empty() && !seen.contains(&normalized) {
                seen.push(normalized);
            }
        }
        self.extensions = seen;
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.probe_concurrency == 0 {
            return Err(ConfigValidationError::ZeroProbeConcurrency);
        }
        if self
            .extensions
            .iter()
            .all(|ext| settings::normalize_extension(ext).is_empty())
        {
            return Err(ConfigValidationError::NoExtensions);
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        (self.probe_timeout_ms > 0)
            .then(|| Duration::from_millis(self.probe_timeout_ms))
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            max_depth: self.max_depth.unwrap_or(UNLIMITED_DEPTH),
            extensions: self.extensions.clone(),
            omit_prefixes: self.omit_prefixes.clone(),
            omit_suffixes: self.omit_suffixes.clone(),
            probe_concurrency: self.probe_concurrency,
        }
    }

    pub fn ffprobe(&self) -> FfprobeProbe {
        FfprobeProbe::new()
            .with_program(&self.ffprobe_path)
            .with_timeout(self.probe_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ScanConfig =
            toml::from_str("max_depth = 2\nextensions = [\"mkv\"]").unwrap();
        assert_eq!(config.max_depth, Some(2));
        assert_eq!(config.extensions, vec!["mkv".to_string()]);
        assert_eq!(config.min_acceptable_height, 720);
        assert_eq!(config.omit_prefixes, vec![".".to_string()]);
    }

    #[test]
    fn test_normalize_extensions() {
        let mut config = ScanConfig {
            extensions: vec![
                "MKV".into(),
                ".mkv".into(),
                " ".into(),
                "mp4".into(),
            ],
            ..ScanConfig::default()
        };
        config.normalize();
        assert_eq!(
            config.extensions,
            vec![".mkv".to_string(), ".mp4".to_string()]
        );
    }

    #[test]
    fn test_validate() {
        assert!(ScanConfig::default().validate().is_ok());

        let zero = ScanConfig {
            probe_concurrency: 0,
            ..ScanConfig::default()
        };
        assert_eq!(
            zero.validate(),
            Err(ConfigValidationError::ZeroProbeConcurrency)
        );

        let empty = ScanConfig {
            extensions: vec!["".into()],
            ..ScanConfig::default()
        };
        assert_eq!(empty.validate(), Err(ConfigValidationError::NoExtensions));
    }

    #[test]
    fn test_scan_options_mapping() {
        let config = ScanConfig::default();
        let options = config.scan_options();
        assert_eq!(options.max_depth, UNLIMITED_DEPTH);
        assert_eq!(options.probe_concurrency, 4);

        let limited = ScanConfig {
            max_depth: Some(-1),
            probe_timeout_ms: 0,
            ..ScanConfig::default()
        };
        assert_eq!(limited.scan_options().max_depth, -1);
        assert_eq!(limited.probe_timeout(), None);
    }
}
