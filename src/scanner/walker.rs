//! Sequential, containment-checked directory walker.
//!
//! The walker is the whole audit: it canonicalizes the scan root, visits every
//! directory reachable from it through an explicit worklist, and reports files
//! whose base name is longer than the configured bound.
//!
//! Safety invariants:
//! - Every directory is canonicalized and must be the root or lie beneath it
//!   before it is listed; anything else is skipped, never descended into
//! - Every over-long file is canonicalized and must lie strictly beneath the
//!   root before it becomes a [`Violation`]
//! - Each canonical directory is listed at most once, so symlink cycles end
//! - Mid-walk failures are skip events, never errors
//!
//! There is one check-then-use window per entry: a path can be swapped between
//! its containment check and the later listing or canonicalization. The walker
//! never writes, so the worst outcome is a mis-attributed report, not damage.

#![allow(missing_docs)]

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::errors::{GuardError, Result};
use crate::core::paths::{
    expand_home, is_strict_descendant, is_within_root, resolve_absolute_path,
};
use crate::logger::{EventSink, EventType, LogEntry, Severity};
use crate::scanner::violation::{Violation, name_length};

/// Default upper bound on base-name length.
pub const MAX_FILENAME_LEN_DEFAULT: i64 = 64;
/// Smallest accepted bound.
pub const MIN_FILENAME_LEN: i64 = 1;
/// Largest accepted bound (filesystem sanity limit).
pub const MAX_FILENAME_LEN: i64 = 255;

/// Parameters for one scan, built once per invocation from caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Directory to audit. `~` is expanded and symlinks are resolved.
    pub root: PathBuf,
    /// Inclusive upper bound on base-name length, must lie in `[1, 255]`.
    pub max_len: i64,
    /// Opaque correlation token echoed in every emitted event.
    pub trace_id: Option<String>,
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_len: MAX_FILENAME_LEN_DEFAULT,
            trace_id: None,
        }
    }

    #[must_use]
    pub fn with_max_len(mut self, max_len: i64) -> Self {
        self.max_len = max_len;
        self
    }

    #[must_use]
    pub fn with_trace_id(mut self, trace_id: Option<String>) -> Self {
        self.trace_id = trace_id;
        self
    }

    /// Check the length bound without touching the filesystem.
    pub fn validated_max_len(&self) -> Result<usize> {
        if !(MIN_FILENAME_LEN..=MAX_FILENAME_LEN).contains(&self.max_len) {
            return Err(GuardError::InvalidConfig {
                details: format!(
                    "max_len must be between {MIN_FILENAME_LEN} and {MAX_FILENAME_LEN}, got {}",
                    self.max_len
                ),
            });
        }
        usize::try_from(self.max_len).map_err(|e| GuardError::InvalidConfig {
            details: format!("max_len {}: {e}", self.max_len),
        })
    }
}

/// Outcome of a completed scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Canonical scan root.
    pub root: PathBuf,
    /// Effective length bound.
    pub max_len: usize,
    /// Offending files, in traversal order.
    pub violations: Vec<Violation>,
    /// Number of skip events raised during the walk.
    pub skipped: usize,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Scans one directory tree for over-long file names.
#[derive(Debug, Clone)]
pub struct NameScanner {
    config: ScanConfig,
}

impl NameScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Run the audit, emitting diagnostics into `sink`.
    ///
    /// Fails only for a bad bound ([`GuardError::InvalidConfig`], checked
    /// before any I/O), an unresolvable root ([`GuardError::RootResolution`])
    /// or a root that is not a directory ([`GuardError::NotADirectory`]).
    pub fn scan(&self, sink: &mut dyn EventSink) -> Result<ScanReport> {
        let max_len = self.config.validated_max_len()?;
        let root = resolve_root(&self.config.root)?;

        let mut walk = Walk {
            root: &root,
            max_len,
            trace_id: self.config.trace_id.as_deref(),
            sink: &mut *sink,
            stack: vec![root.clone()],
            visited: HashSet::new(),
            violations: Vec::new(),
            skipped: 0,
        };
        walk.run();

        let Walk {
            violations,
            skipped,
            ..
        } = walk;

        sink.emit(
            LogEntry::new(
                EventType::ScanComplete,
                Severity::Info,
                self.config.trace_id.as_deref(),
            )
            .with_root(root.display().to_string())
            .with_violations(violations.len())
            .with_max_len(self.config.max_len)
            .with_skipped(skipped),
        );

        Ok(ScanReport {
            root,
            max_len,
            violations,
            skipped,
        })
    }
}

/// One-shot convenience wrapper around [`NameScanner::scan`].
pub fn scan_directory(config: &ScanConfig, sink: &mut dyn EventSink) -> Result<ScanReport> {
    NameScanner::new(config.clone()).scan(sink)
}

/// Canonicalize the root and require a directory.
fn resolve_root(root: &Path) -> Result<PathBuf> {
    let expanded = expand_home(root);
    let canonical =
        fs::canonicalize(&expanded).map_err(|source| GuardError::RootResolution {
            path: resolve_absolute_path(&expanded),
            source,
        })?;
    let meta = fs::metadata(&canonical).map_err(|source| GuardError::RootResolution {
        path: canonical.clone(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(GuardError::NotADirectory { path: canonical });
    }
    Ok(canonical)
}

/// Mutable state of a single walk. Owned exclusively by one `scan` call.
struct Walk<'a> {
    root: &'a Path,
    max_len: usize,
    trace_id: Option<&'a str>,
    sink: &'a mut dyn EventSink,
    /// Directories still to visit, as joined (not yet canonical) paths.
    stack: Vec<PathBuf>,
    /// Canonical directories already listed.
    visited: HashSet<PathBuf>,
    violations: Vec<Violation>,
    skipped: usize,
}

impl Walk<'_> {
    fn run(&mut self) {
        while let Some(dir) = self.stack.pop() {
            let canonical = match fs::canonicalize(&dir) {
                Ok(path) => path,
                Err(err) => {
                    self.skip(EventType::SkipUnreadableDir, &dir, err.to_string());
                    continue;
                }
            };

            if !is_within_root(&canonical, self.root) {
                self.skip(
                    EventType::SkipOutOfRootDir,
                    &canonical,
                    "resolves outside scan root".to_string(),
                );
                continue;
            }

            if !self.visited.insert(canonical.clone()) {
                self.skip(
                    EventType::SkipVisitedDir,
                    &canonical,
                    "directory already scanned".to_string(),
                );
                continue;
            }

            self.visit_directory(&canonical);
        }
    }

    /// List one directory: check its files in name order, then queue its
    /// subdirectories so they pop in name order (pre-order depth-first).
    fn visit_directory(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                self.skip(EventType::SkipUnreadableDir, dir, err.to_string());
                return;
            }
        };

        let mut children: Vec<(OsString, bool)> = Vec::new();
        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    self.skip(EventType::SkipUnreadableEntry, dir, err.to_string());
                    continue;
                }
            };

            let ft = match entry.file_type() {
                Ok(ft) => ft,
                Err(err) => {
                    self.skip(EventType::SkipUnreadableEntry, &entry.path(), err.to_string());
                    continue;
                }
            };

            // Symlinks count as directories when their target is one; dangling
            // links and links to anything else are treated as files.
            let is_dir = if ft.is_symlink() {
                fs::metadata(entry.path()).is_ok_and(|m| m.is_dir())
            } else {
                ft.is_dir()
            };
            children.push((entry.file_name(), is_dir));
        }

        children.sort_by(|a, b| a.0.cmp(&b.0));

        let mut subdirs = Vec::new();
        for (name, is_dir) in children {
            if is_dir {
                subdirs.push(dir.join(name));
            } else {
                self.check_file(dir, &name);
            }
        }
        self.stack.extend(subdirs.into_iter().rev());
    }

    fn check_file(&mut self, dir: &Path, name: &OsStr) {
        let length = name_length(name);
        if length <= self.max_len {
            return;
        }

        let joined = dir.join(name);
        let canonical = match fs::canonicalize(&joined) {
            Ok(path) => path,
            Err(err) => {
                self.skip(EventType::SkipUnresolvableFile, &joined, err.to_string());
                return;
            }
        };

        if !is_strict_descendant(&canonical, self.root) {
            self.skip(
                EventType::SkipOutOfRootFile,
                &canonical,
                "resolves outside scan root".to_string(),
            );
            return;
        }

        self.violations
            .push(Violation::new(canonical, length, self.root));
    }

    fn skip(&mut self, event: EventType, path: &Path, reason: String) {
        debug_assert!(event.is_skip(), "{} is not a skip event", event.as_str());
        self.skipped += 1;
        self.sink.emit(
            LogEntry::new(event, Severity::Warning, self.trace_id)
                .with_path(path.display().to_string())
                .with_root(self.root.display().to_string())
                .with_reason(reason),
        );
    }
}
