//! Violation records and base-name measurement.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::paths::redact_root;

/// One file whose base name is longer than the configured bound.
///
/// Invariants: `name_length > max_len` for the run that produced it, and
/// `path` is a strict descendant of the canonical scan root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Absolute, canonical path of the offending file.
    pub path: PathBuf,
    /// Length of the base name in characters (not bytes).
    pub name_length: usize,
    /// Path with the root's parent directories replaced by a marker.
    pub redacted_path: String,
}

impl Violation {
    /// Build a record for a canonical `path` under the canonical `root`.
    pub(crate) fn new(path: PathBuf, name_length: usize, root: &Path) -> Self {
        let redacted_path = redact_root(&path, root);
        Self {
            path,
            name_length,
            redacted_path,
        }
    }
}

/// Character count of a base name.
///
/// Counts Unicode scalar values, not bytes: `é` is one character even though
/// it occupies two bytes on disk. Undecodable bytes count as one replacement
/// character each.
pub fn name_length(name: &OsStr) -> usize {
    name.to_string_lossy().chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(name_length(OsStr::new("shortname.txt")), 13);
        assert_eq!(name_length(OsStr::new("é.txt")), 5);
        assert_eq!(name_length(OsStr::new("日本語")), 3);
        assert!(OsStr::new("日本語").len() > 3);
    }

    #[test]
    fn violation_carries_redacted_suffix() {
        let root = Path::new("/srv/checkout/repo");
        let v = Violation::new(PathBuf::from("/srv/checkout/repo/docs/a.md"), 4, root);
        assert_eq!(v.redacted_path, "repo/.../docs/a.md");
        assert_eq!(v.name_length, 4);
    }
}
