//! Configuration system: TOML file + env var overrides + smart defaults.
//!
//! Precedence, lowest to highest: built-in defaults, the TOML file, `FNG_*`
//! environment variables, then CLI flags (applied by the binary).

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::num::{IntErrorKind, ParseIntError};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::{GuardError, Result};
use crate::scanner::walker::MAX_FILENAME_LEN_DEFAULT;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = ".fng.toml";

/// Full filename_guard configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub scan: ScanSettings,
    pub output: OutputSettings,
}

/// Scan defaults. `max_len` is range-checked by the scanner, not here, so the
/// same fail-fast error is raised whatever layer supplied the value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanSettings {
    pub max_len: i64,
    pub trace_id: Option<String>,
}

/// Rendering of event records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub color: bool,
}

/// Output encoding for event records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for OutputFormat {
    type Err = GuardError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" | "jsonl" => Ok(Self::Json),
            other => Err(GuardError::ConfigParse {
                context: "output.format",
                details: format!("expected \"human\" or \"json\", got {other:?}"),
            }),
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_len: MAX_FILENAME_LEN_DEFAULT,
            trace_id: None,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

impl Config {
    /// `.fng.toml` in the current working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default file is used
    /// when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, env_var)
    }

    /// Same as [`Config::load`] with an injectable environment lookup.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut cfg = match path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(GuardError::MissingConfig {
                        path: explicit.to_path_buf(),
                    });
                }
                Self::from_file(explicit)?
            }
            None => {
                let fallback = Self::default_path();
                if fallback.is_file() {
                    Self::from_file(&fallback)?
                } else {
                    Self::default()
                }
            }
        };

        cfg.apply_env_overrides_from(lookup)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| GuardError::io(path, source))?;
        Self::from_toml_str(&raw)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut non_blank = |name: &str| lookup(name).filter(|raw| !raw.trim().is_empty());

        if let Some(raw) = non_blank("FNG_MAX_LEN") {
            self.scan.max_len = parse_max_len(&raw).map_err(|error| GuardError::ConfigParse {
                context: "env",
                details: format!("FNG_MAX_LEN={raw:?}: {error}"),
            })?;
        }

        if let Some(raw) = non_blank("FNG_TRACE_ID") {
            self.scan.trace_id = Some(raw);
        }

        if let Some(raw) = non_blank("FNG_OUTPUT_FORMAT") {
            self.output.format = raw.parse()?;
        }

        if let Some(raw) = non_blank("FNG_COLOR") {
            self.output.color = parse_env_bool("FNG_COLOR", &raw)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if let Some(trace_id) = &self.scan.trace_id {
            validate_trace_id(trace_id)?;
        }
        Ok(())
    }
}

/// A trace id is opaque but must be a single printable token-ish string.
pub fn validate_trace_id(trace_id: &str) -> Result<()> {
    if trace_id.is_empty() {
        return Err(GuardError::InvalidConfig {
            details: "trace_id must not be empty".to_string(),
        });
    }
    if trace_id.chars().any(char::is_control) {
        return Err(GuardError::InvalidConfig {
            details: "trace_id must not contain control characters".to_string(),
        });
    }
    Ok(())
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Parse a length bound, saturating integers that overflow `i64`.
///
/// Any integer literal is accepted so that out-of-range bounds reach the
/// scanner's range check instead of failing as a parse error.
pub fn parse_max_len(raw: &str) -> std::result::Result<i64, ParseIntError> {
    match raw.trim().parse::<i64>() {
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(i64::MAX),
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => Ok(i64::MIN),
        parsed => parsed,
    }
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(GuardError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: expected a boolean"),
        }),
    }
}
