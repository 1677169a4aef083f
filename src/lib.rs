#![forbid(unsafe_code)]

//! filename_guard (fng): audits a directory tree for files whose base name is
//! longer than a configured limit.
//!
//! Meant as a pre-commit or CI guard against names that break on constrained
//! filesystems. The walk is read-only, sequential and confined to the scan
//! root: symlinks that resolve outside it are skipped and reported, never
//! followed.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use filename_guard::prelude::*;
//!
//! let mut sink = MemorySink::new();
//! let config = ScanConfig::new("./repo").with_max_len(100);
//! let report = NameScanner::new(config).scan(&mut sink)?;
//! for v in &report.violations {
//!     println!("{} ({} chars)", v.redacted_path, v.name_length);
//! }
//! # Ok::<(), GuardError>(())
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod scanner;
