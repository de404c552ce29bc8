//! Kit and group classification.
//!
//! A kit is a title wrapped in its own folder, e.g.
//! `Movies/Inception/Inception.mkv` next to `Inception.en.srt`. The wrapper
//! folder carries no information of its own, so the group of a kit member is
//! the folder above it.

use std::path::Path;

use super::paths::PathParts;

/// True when the immediate parent directory is named exactly like the core
/// title segment of the file (all extensions stripped).
pub fn is_kit(path: &Path) -> bool {
    is_kit_parts(&PathParts::from_path(path))
}

/// Group of a file: the grandparent name for kit members, the parent name
/// otherwise.
pub fn group(path: &Path) -> Option<String> {
    group_parts(&PathParts::from_path(path))
}

pub fn is_kit_parts(parts: &PathParts) -> bool {
    parts
        .parent_name
        .as_deref()
        .is_some_and(|parent| parent == parts.name_parts.core_title())
}

pub fn group_parts(parts: &PathParts) -> Option<String> {
    if is_kit_parts(parts) {
        parts.grandparent_name.clone()
    } else {
        parts.parent_name.clone()
    }
}
