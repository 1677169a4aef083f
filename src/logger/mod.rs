//! Structured event emission: an injected sink instead of process-wide logging.
//!
//! The scanner only ever appends to an [`EventSink`]; the CLI decides whether
//! records become JSON lines or human text.

pub mod jsonl;
pub mod text;

pub use jsonl::{EventType, JsonlSink, LogEntry, Severity};
pub use text::TextSink;

/// Append-only channel for structured event records.
pub trait EventSink {
    /// Deliver one record. Sinks must not fail the caller.
    fn emit(&mut self, entry: LogEntry);
}

/// Sink that keeps every record in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Vec<LogEntry>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record emitted so far.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Records of a single event type.
    pub fn of_type(&self, event: EventType) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.event == event)
    }

    /// Consume the sink, returning the collected records.
    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

impl EventSink for MemorySink {
    fn emit(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, entry: LogEntry) {
        (**self).emit(entry);
    }
}
