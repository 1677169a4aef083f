//! Shared path manipulation utilities: canonicalization, containment, redaction.

use std::env;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Marker inserted between the root's display name and the unredacted suffix.
pub const REDACTION_MARKER: &str = "...";

/// Expand a leading `~` to the current user's home directory.
///
/// Paths without a leading `~` component (and `~user` forms) are returned
/// unchanged. If no home directory is known the path is also left alone and
/// later resolution reports it as missing.
pub fn expand_home(path: &Path) -> PathBuf {
    expand_home_with(path, env::var_os("HOME"))
}

fn expand_home_with(path: &Path, home: Option<OsString>) -> PathBuf {
    let mut components = path.components();
    match (components.next(), home) {
        (Some(Component::Normal(first)), Some(home)) if first == "~" => {
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                PathBuf::from(home)
            } else {
                PathBuf::from(home).join(rest)
            }
        }
        _ => path.to_path_buf(),
    }
}

/// Resolve a path to an absolute, normalized path.
///
/// If `fs::canonicalize` succeeds (path exists), it is used to resolve symlinks
/// and normalize components.
///
/// If it fails (e.g. path does not exist), the path is made absolute relative
/// to CWD and `..`/`.` components are resolved syntactically. Only used for
/// display; containment decisions always go through `fs::canonicalize`.
pub fn resolve_absolute_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };

    if let Ok(canonical) = std::fs::canonicalize(&absolute) {
        return canonical;
    }

    normalize_syntactic(&absolute)
}

fn normalize_syntactic(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir | Component::Normal(_) => {
                components.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                }
            }
        }
    }
    components.into_iter().collect()
}

/// True when `path` equals `root` or lies beneath it.
///
/// Both arguments must already be canonical. The comparison is component-wise,
/// so `/data/rootx` is not inside `/data/root`.
pub fn is_within_root(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// True when `path` lies strictly beneath `root` (never equal to it).
pub fn is_strict_descendant(path: &Path, root: &Path) -> bool {
    path != root && is_within_root(path, root)
}

/// Display name for a canonical root: its final component, or the full path
/// for filesystem roots that have none (`/`).
pub fn root_display_name(root: &Path) -> String {
    root.file_name().map_or_else(
        || root.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Replace everything above `root` in `path` with the root's display name and
/// an ellipsis marker: `/home/alice/work/repo/src/x.rs` with root
/// `/home/alice/work/repo` becomes `repo/.../src/x.rs`.
///
/// Paths outside the root degrade to their bare file name, so the absolute
/// layout never leaks either way.
pub fn redact_root(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => {
            let name = root_display_name(root);
            let name = name.trim_end_matches('/');
            format!("{name}/{REDACTION_MARKER}/{}", rel.display())
        }
        Err(_) => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}
