//! Human-readable event lines: `LEVEL event key=value ...`.

use std::fmt::Write as _;
use std::io::{self, Write};

use colored::Colorize;

use super::EventSink;
use super::jsonl::{LogEntry, Severity};

/// Event sink that renders one plain-text line per record.
pub struct TextSink<W: Write> {
    writer: W,
    color: bool,
}

impl<W: Write> TextSink<W> {
    /// Create a sink; `color` controls ANSI styling of the level tag.
    pub fn new(writer: W, color: bool) -> Self {
        Self { writer, color }
    }

    /// Consume the sink and hand back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for TextSink<W> {
    fn emit(&mut self, entry: LogEntry) {
        let line = format_line(&entry, self.color);
        if self.writer.write_all(line.as_bytes()).is_err() || self.writer.flush().is_err() {
            let _ = write!(io::stderr(), "{line}");
        }
    }
}

/// Render an entry as a single line terminated by `\n`.
pub fn format_line(entry: &LogEntry, color: bool) -> String {
    let label = format!("{:<5}", entry.severity.label());
    let label = if color {
        match entry.severity {
            Severity::Info => label.green().to_string(),
            Severity::Warning => label.yellow().bold().to_string(),
            Severity::Error => label.red().bold().to_string(),
        }
    } else {
        label
    };

    let mut line = format!("{label} {}", entry.event.as_str());
    let mut field = |key: &str, value: Option<String>| {
        if let Some(value) = value {
            let _ = write!(line, " {key}={}", quote_if_needed(&value));
        }
    };
    field("path", entry.path.clone());
    field("root", entry.root.clone());
    field("length", entry.length.map(|v| v.to_string()));
    field("redacted_path", entry.redacted_path.clone());
    field("max_len", entry.max_len.map(|v| v.to_string()));
    field("violations", entry.violations.map(|v| v.to_string()));
    field("skipped", entry.skipped.map(|v| v.to_string()));
    field("reason", entry.reason.clone());
    field("error_code", entry.error_code.clone());
    field("error", entry.error.clone());
    field(
        "trace_id",
        Some(entry.trace_id.clone().unwrap_or_else(|| "-".to_string())),
    );
    line.push('\n');
    line
}

fn quote_if_needed(value: &str) -> String {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '"') {
        format!("{value:?}")
    } else {
        value.to_owned()
    }
}
