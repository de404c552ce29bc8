use crate::metadata::filename_parser::core_title_segment;

/// Prefix and suffix rules deciding which files traversal leaves out.
///
/// Prefixes are matched against the full file name; suffixes against the
/// name with every extension stripped (`Heat-trailer.en.mkv` becomes
/// `Heat-trailer`).
/// Empty rule lists exclude nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalFilter {
    omit_prefixes: Vec<String>,
    omit_suffixes: Vec<String>,
}

impl TraversalFilter {
    pub fn new(omit_prefixes: Vec<String>, omit_suffixes: Vec<String>) -> Self {
        Self {
            omit_prefixes,
            omit_suffixes,
        }
    }

    /// A filter that lets every file through.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn omit_prefixes(&self) -> &[String] {
        &self.omit_prefixes
    }

    pub fn omit_suffixes(&self) -> &[String] {
        &self.omit_suffixes
    }

    pub fn starts_with_omitted_prefix(&self, filename: &str) -> bool {
        self.omit_prefixes
            .iter()
            .any(|prefix| filename.starts_with(prefix.as_str()))
    }

    pub fn ends_with_omitted_suffix(&self, filename: &str) -> bool {
        let stem = core_title_segment(filename);
        self.omit_suffixes
            .iter()
            .any(|suffix| stem.ends_with(suffix.as_str()))
    }

    pub fn is_excluded(&self, filename: &str) -> bool {
        self.starts_with_omitted_prefix(filename)
            || self.ends_with_omitted_suffix(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::settings::{
        default_omit_prefixes_vec, default_omit_suffixes_vec,
    };

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_excludes_nothing() {
        let filter = TraversalFilter::allow_all();
        for name in [".DS_Store", "Heat-trailer.mkv", "Heat.mkv", ""] {
            assert!(!filter.is_excluded(name), "{name}");
        }
    }

    #[test]
    fn test_prefix_rules() {
        let filter =
            TraversalFilter::new(strings(&[".", "sample"]), Vec::new());
        assert!(filter.is_excluded(".DS_Store"));
        assert!(filter.is_excluded("._Heat.mkv"));
        assert!(filter.is_excluded("sample-heat.mkv"));
        assert!(!filter.is_excluded("Heat.sample.mkv"));
    }

    #[test]
    fn test_suffix_rules_ignore_extensions() {
        let filter = TraversalFilter::new(Vec::new(), strings(&["-trailer"]));
        assert!(filter.is_excluded("Heat-trailer.mkv"));
        assert!(filter.is_excluded("Heat-trailer.en.mkv"));
        assert!(!filter.is_excluded("Heat.mkv"));
        // The suffix must end the core title segment, not a later token.
        assert!(!filter.is_excluded("Heat.-trailer.mkv"));
    }

    #[test]
    fn test_default_rules() {
        let filter = TraversalFilter::new(
            default_omit_prefixes_vec(),
            default_omit_suffixes_vec(),
        );
        assert!(filter.is_excluded(".hidden.mkv"));
        assert!(filter.is_excluded("Alien-deleted.mp4"));
        assert!(filter.is_excluded("Alien-behindthescenes.mkv"));
        assert!(!filter.is_excluded("Alien (1979).mkv"));
    }
}
