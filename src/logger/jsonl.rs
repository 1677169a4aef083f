//! JSONL event records: line-delimited JSON for CI and agent consumption.
//!
//! Each line is a self-contained JSON object. Lines are assembled in memory and
//! written with a single `write_all` so a tailing reader never sees a partial
//! record.
//!
//! Three-level fallback chain:
//! 1. The configured writer (stdout for the CLI)
//! 2. stderr with `[FNG-JSONL]` prefix
//! 3. Silent discard (an audit must never crash for logging failures)

#![allow(missing_docs)]

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::EventSink;
use crate::core::errors::GuardError;

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Uppercase label used by the text sink.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// Event types emitted during a scan and by the CLI around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SkipOutOfRootDir,
    SkipOutOfRootFile,
    SkipUnreadableDir,
    SkipUnreadableEntry,
    SkipUnresolvableFile,
    SkipVisitedDir,
    ScanComplete,
    FilenameTooLong,
    ScanError,
    NoViolations,
}

impl EventType {
    /// Wire name, identical to the serialized form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SkipOutOfRootDir => "skip_out_of_root_dir",
            Self::SkipOutOfRootFile => "skip_out_of_root_file",
            Self::SkipUnreadableDir => "skip_unreadable_dir",
            Self::SkipUnreadableEntry => "skip_unreadable_entry",
            Self::SkipUnresolvableFile => "skip_unresolvable_file",
            Self::SkipVisitedDir => "skip_visited_dir",
            Self::ScanComplete => "scan_complete",
            Self::FilenameTooLong => "filename_too_long",
            Self::ScanError => "scan_error",
            Self::NoViolations => "no_violations",
        }
    }

    /// True for the recoverable skip-and-continue events.
    pub const fn is_skip(self) -> bool {
        matches!(
            self,
            Self::SkipOutOfRootDir
                | Self::SkipOutOfRootFile
                | Self::SkipUnreadableDir
                | Self::SkipUnreadableEntry
                | Self::SkipUnresolvableFile
                | Self::SkipVisitedDir
        )
    }
}

/// A single structured event record. All fields optional except `ts`, `event`,
/// `severity` and `trace_id` (which serializes as `null` when unset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    /// Event type identifier.
    pub event: EventType,
    /// Severity level.
    pub severity: Severity,
    /// Caller-supplied correlation token, echoed verbatim.
    pub trace_id: Option<String>,
    /// Affected filesystem path (when applicable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Canonical scan root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Character length of the offending base name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Display-safe path with the root's parents hidden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redacted_path: Option<String>,
    /// Effective length bound for the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_len: Option<i64>,
    /// Violation count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<usize>,
    /// Number of skip events raised during the walk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<usize>,
    /// Why an entry was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// FNG error code if the scan failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity, trace_id: Option<&str>) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            trace_id: trace_id.map(str::to_owned),
            path: None,
            root: None,
            length: None,
            redacted_path: None,
            max_len: None,
            violations: None,
            skipped: None,
            reason: None,
            error: None,
            error_code: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    #[must_use]
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    #[must_use]
    pub fn with_redacted_path(mut self, redacted: impl Into<String>) -> Self {
        self.redacted_path = Some(redacted.into());
        self
    }

    #[must_use]
    pub fn with_max_len(mut self, max_len: i64) -> Self {
        self.max_len = Some(max_len);
        self
    }

    #[must_use]
    pub fn with_violations(mut self, count: usize) -> Self {
        self.violations = Some(count);
        self
    }

    #[must_use]
    pub fn with_skipped(mut self, count: usize) -> Self {
        self.skipped = Some(count);
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_error(mut self, code: &str, message: impl Into<String>) -> Self {
        self.error_code = Some(code.to_owned());
        self.error = Some(message.into());
        self
    }
}

/// Degradation state of the JSONL sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    /// Writing to the configured writer.
    Normal,
    /// Writer failed, writing to stderr.
    Stderr,
    /// Everything failed, silently discarding.
    Discard,
}

/// Line-delimited JSON event sink with stderr fallback.
pub struct JsonlSink<W: Write> {
    writer: W,
    state: SinkState,
    lines_written: u64,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            state: SinkState::Normal,
            lines_written: 0,
        }
    }

    /// Write a single log entry as one atomic JSONL line.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                let err = GuardError::from(e);
                let _ = writeln!(io::stderr(), "[FNG-JSONL] {err}");
                return;
            }
        };
        self.write_line(&line);
    }

    /// Current degradation state.
    pub fn state(&self) -> &str {
        match self.state {
            SinkState::Normal => "normal",
            SinkState::Stderr => "stderr",
            SinkState::Discard => "discard",
        }
    }

    /// Number of lines delivered to the configured writer.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Consume the sink and hand back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &str) {
        match self.state {
            SinkState::Normal => {
                if self.writer.write_all(line.as_bytes()).is_err() || self.writer.flush().is_err()
                {
                    self.state = SinkState::Stderr;
                    self.write_line(line);
                    return;
                }
                self.lines_written += 1;
            }
            SinkState::Stderr => {
                if write!(io::stderr(), "[FNG-JSONL] {line}").is_err() {
                    self.state = SinkState::Discard;
                }
            }
            SinkState::Discard => {}
        }
    }
}

impl<W: Write> EventSink for JsonlSink<W> {
    fn emit(&mut self, entry: LogEntry) {
        self.write_entry(&entry);
    }
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ──────────────────────── tests ────────────────────────
