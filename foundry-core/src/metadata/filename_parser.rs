use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.*?)\s*\((?P<year>\d{4})\)\s*$")
        .expect("trailing year pattern is valid")
});

/// A file name split into its dot-delimited parts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilenameParts {
    /// Substring from the last `.` to the end, or empty without a dot.
    pub extension: String,
    /// The file name with `extension` removed.
    pub base_filename: String,
    /// Every `.`-separated token of `base_filename` after the first one,
    /// re-prefixed with `.`.
    pub additional_extensions: Vec<String>,
}

impl FilenameParts {
    /// First dot-delimited token of the base name.
    pub fn core_title(&self) -> &str {
        core_title_segment(&self.base_filename)
    }
}

/// Split a file name into extension, base name and chained suffixes.
///
/// Total for every input: `extension + base_filename` reassembles the input
/// after `base_filename` is put back in front.
pub fn decompose(filename: &str) -> FilenameParts {
    let (base_filename, extension) = match filename.rfind('.') {
        Some(idx) => filename.split_at(idx),
        None => (filename, ""),
    };

    let additional_extensions = base_filename
        .split('.')
        .skip(1)
        .map(|token| format!(".{token}"))
        .collect();

    FilenameParts {
        extension: extension.to_string(),
        base_filename: base_filename.to_string(),
        additional_extensions,
    }
}

/// Everything before the first `.`, i.e. the name with all extensions
/// stripped. This is the comparison base for kit detection and suffix
/// filtering.
pub fn core_title_segment(filename: &str) -> &str {
    match filename.find('.') {
        Some(idx) => &filename[..idx],
        None => filename,
    }
}

/// Title portion of a base name and its optional release year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleYear {
    pub name: String,
    pub year: Option<u16>,
}

/// Recognize a trailing parenthesized four digit year.
///
/// Only a `(dddd)` token at the very end is considered; parentheses elsewhere
/// in the title are left alone.
pub fn extract_title_year(base_filename: &str) -> TitleYear {
    if let Some(captures) = TRAILING_YEAR.captures(base_filename)
        && let Ok(year) = captures["year"].parse::<u16>()
    {
        return TitleYear {
            name: captures["name"].trim().to_string(),
            year: Some(year),
        };
    }

    TitleYear {
        name: base_filename.trim().to_string(),
        year: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_simple() {
        let parts = decompose("Inception (2010).mkv");
        assert_eq!(parts.extension, ".mkv");
        assert_eq!(parts.base_filename, "Inception (2010)");
        assert!(parts.additional_extensions.is_empty());
        assert_eq!(parts.core_title(), "Inception (2010)");
    }

    #[test]
    fn test_decompose_chained_suffixes() {
        let parts = decompose("Heat (1995).en.forced.srt");
        assert_eq!(parts.extension, ".srt");
        assert_eq!(parts.base_filename, "Heat (1995).en.forced");
        assert_eq!(parts.additional_extensions, vec![".en", ".forced"]);
        assert_eq!(parts.core_title(), "Heat (1995)");
    }

    #[test]
    fn test_decompose_without_extension() {
        let parts = decompose("README");
        assert_eq!(parts.extension, "");
        assert_eq!(parts.base_filename, "README");
        assert!(parts.additional_extensions.is_empty());
    }

    #[test]
    fn test_decompose_dotfile() {
        let parts = decompose(".DS_Store");
        assert_eq!(parts.extension, ".DS_Store");
        assert_eq!(parts.base_filename, "");
        assert_eq!(parts.core_title(), "");
    }

    #[test]
    fn test_decompose_reassembles_input() {
        for name in [
            "a.b.c.mkv",
            "no_extension",
            ".hidden",
            "trailing.",
            "..",
            "",
            "Movie (2020) - 1080p.MP4",
        ] {
            let parts = decompose(name);
            assert_eq!(
                format!("{}{}", parts.base_filename, parts.extension),
                name
            );
        }
    }

    #[test]
    fn test_core_title_segment() {
        assert_eq!(core_title_segment("Alien.1979.mkv"), "Alien");
        assert_eq!(core_title_segment("Alien"), "Alien");
        assert_eq!(core_title_segment(".Alien"), "");
    }

    #[test]
    fn test_extract_title_year() {
        assert_eq!(
            extract_title_year("Movie Title (2020)"),
            TitleYear {
                name: "Movie Title".to_string(),
                year: Some(2020),
            }
        );
        assert_eq!(
            extract_title_year("Just A Title"),
            TitleYear {
                name: "Just A Title".to_string(),
                year: None,
            }
        );
    }

    #[test]
    fn test_extract_title_year_only_trailing() {
        let parsed = extract_title_year("Blade Runner (1982) (Final Cut)");
        assert_eq!(parsed.name, "Blade Runner (1982) (Final Cut)");
        assert_eq!(parsed.year, None);

        let parsed = extract_title_year("(500) Days of Summer (2009)");
        assert_eq!(parsed.name, "(500) Days of Summer");
        assert_eq!(parsed.year, Some(2009));

        let parsed = extract_title_year("Movie (12345)");
        assert_eq!(parsed.year, None);
    }

    #[test]
    fn test_extract_title_year_bare_year() {
        let parsed = extract_title_year("(2001)");
        assert_eq!(parsed.name, "");
        assert_eq!(parsed.year, Some(2001));
    }
}
