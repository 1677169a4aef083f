//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use filename_guard::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, OutputFormat};
pub use crate::core::errors::{GuardError, Result};

// Logger
pub use crate::logger::{EventSink, EventType, JsonlSink, LogEntry, MemorySink, Severity, TextSink};

// Scanner
pub use crate::scanner::violation::Violation;
pub use crate::scanner::walker::{NameScanner, ScanConfig, ScanReport, scan_directory};
