use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::filename_parser::{FilenameParts, decompose};

/// Final path segment as a string, or empty when the path has none
/// (`/`, `..`, empty path).
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Name of the directory directly containing `path`.
pub fn parent_name(path: &Path) -> Option<String> {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
}

/// Name of the directory two levels above `path`.
pub fn grandparent_name(path: &Path) -> Option<String> {
    path.parent()
        .and_then(Path::parent)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
}

/// Everything the pipeline derives from a path string alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParts {
    pub filename: String,
    pub parent_name: Option<String>,
    pub grandparent_name: Option<String>,
    pub name_parts: FilenameParts,
}

impl PathParts {
    pub fn from_path(path: &Path) -> Self {
        let filename = file_name(path);
        let name_parts = decompose(&filename);
        Self {
            parent_name: parent_name(path),
            grandparent_name: grandparent_name(path),
            filename,
            name_parts,
        }
    }
}

/// Directory names shared by every file listed in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DirectoryNames {
    name: Option<String>,
    parent_name: Option<String>,
}

/// Per-scan memo of directory name lookups, keyed by the directory holding
/// each file.
///
/// Files are visited once per scan, so only their containing directories
/// repeat. Owned by a single scan invocation and dropped with it.
#[derive(Debug, Default)]
pub struct PathCache {
    directories: HashMap<PathBuf, DirectoryNames>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parts(&mut self, path: &Path) -> PathParts {
        let filename = file_name(path);
        let name_parts = decompose(&filename);
        let names = match path.parent() {
            Some(directory) => self
                .directories
                .entry(directory.to_path_buf())
                .or_insert_with(|| DirectoryNames {
                    name: parent_name(path),
                    parent_name: grandparent_name(path),
                })
                .clone(),
            None => DirectoryNames {
                name: None,
                parent_name: None,
            },
        };
        PathParts {
            filename,
            parent_name: names.name,
            grandparent_name: names.parent_name,
            name_parts,
        }
    }

    /// Number of distinct directories looked up so far.
    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        let path = Path::new("/media/Movies/Inception/Inception.mkv");
        assert_eq!(file_name(path), "Inception.mkv");
        assert_eq!(parent_name(path).as_deref(), Some("Inception"));
        assert_eq!(grandparent_name(path).as_deref(), Some("Movies"));
    }

    #[test]
    fn test_names_near_root() {
        assert_eq!(parent_name(Path::new("Inception.mkv")), None);
        assert_eq!(grandparent_name(Path::new("/Inception.mkv")), None);
        assert_eq!(file_name(Path::new("/")), "");
    }

    #[test]
    fn test_cache_shares_directory_names() {
        let mut cache = PathCache::new();
        let heat = cache.parts(Path::new("/lib/Movies/Heat (1995).mkv"));
        let alien = cache.parts(Path::new("/lib/Movies/Alien.mp4"));
        assert_eq!(cache.len(), 1);
        assert_eq!(heat.parent_name.as_deref(), Some("Movies"));
        assert_eq!(alien.parent_name.as_deref(), Some("Movies"));
        assert_eq!(alien.grandparent_name.as_deref(), Some("lib"));
        assert_eq!(heat.name_parts.extension, ".mkv");
        assert_eq!(alien.filename, "Alien.mp4");

        let kit_path = Path::new("/lib/Movies/Alien/Alien.mkv");
        let kit = cache.parts(kit_path);
        assert_eq!(cache.len(), 2);
        assert_eq!(kit, PathParts::from_path(kit_path));
    }
}
