/// Shared scanner defaults that the configuration layer and the CLI build on.
///
/// Keeping the lists in one place means a user override replaces exactly
/// what the core would otherwise filter on.
pub const DEFAULT_VIDEO_FILE_EXTENSIONS: &[&str] = &[
    ".3gp", ".avi", ".divx", ".flv", ".m4v", ".mkv", ".mov", ".mp4", ".mpeg",
    ".ogv", ".ts", ".vob", ".webm", ".wmv",
];

/// Dotfiles (`.DS_Store`, `._Movie.mkv` resource forks) are skipped.
pub const DEFAULT_OMIT_PREFIXES: &[&str] = &["."];

/// Plex modifiers for local inline extras, e.g. `Heat-trailer.mkv`.
pub const DEFAULT_OMIT_SUFFIXES: &[&str] = &[
    "-behindthescenes",
    "-deleted",
    "-featurette",
    "-interview",
    "-scene",
    "-short",
    "-trailer",
    "-other",
];

/// Files below this probed height are reported as concerns.
pub const DEFAULT_MIN_ACCEPTABLE_HEIGHT: u32 = 720;

/// Number of probes kept in flight by the orchestrator.
pub const DEFAULT_PROBE_CONCURRENCY: usize = 4;

fn to_owned_vec(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn default_video_file_extensions_vec() -> Vec<String> {
    to_owned_vec(DEFAULT_VIDEO_FILE_EXTENSIONS)
}

pub fn default_omit_prefixes_vec() -> Vec<String> {
    to_owned_vec(DEFAULT_OMIT_PREFIXES)
}

pub fn default_omit_suffixes_vec() -> Vec<String> {
    to_owned_vec(DEFAULT_OMIT_SUFFIXES)
}

/// Lowercase an extension and make sure it carries its leading dot, so
/// `MKV`, `mkv` and `.mkv` all compare equal. Empty input stays empty.
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}
