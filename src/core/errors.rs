//! FNG-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, GuardError>;

/// Top-level error type for filename_guard.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("[FNG-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[FNG-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[FNG-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[FNG-2001] cannot resolve scan root {path}: {source}")]
    RootResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[FNG-2002] path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("[FNG-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[FNG-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GuardError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "FNG-1001",
            Self::MissingConfig { .. } => "FNG-1002",
            Self::ConfigParse { .. } => "FNG-1003",
            Self::RootResolution { .. } => "FNG-2001",
            Self::NotADirectory { .. } => "FNG-2002",
            Self::Serialization { .. } => "FNG-2101",
            Self::Io { .. } => "FNG-3002",
        }
    }

    /// Whether this is one of the three failures that abort a scan before any
    /// violation is produced.
    #[must_use]
    pub const fn is_scan_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::RootResolution { .. } | Self::NotADirectory { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for GuardError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for GuardError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "test")
    }

    fn all_variants() -> Vec<GuardError> {
        vec![
            GuardError::InvalidConfig {
                details: String::new(),
            },
            GuardError::MissingConfig {
                path: PathBuf::new(),
            },
            GuardError::ConfigParse {
                context: "",
                details: String::new(),
            },
            GuardError::RootResolution {
                path: PathBuf::new(),
                source: io_err(),
            },
            GuardError::NotADirectory {
                path: PathBuf::new(),
            },
            GuardError::Serialization {
                context: "",
                details: String::new(),
            },
            GuardError::Io {
                path: PathBuf::new(),
                source: io_err(),
            },
        ]
    }

    #[test]
    fn error_codes_are_unique() {
        let codes: Vec<&str> = all_variants().iter().map(GuardError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn display_carries_code_prefix() {
        for err in all_variants() {
            let msg = err.to_string();
            assert!(
                msg.starts_with(&format!("[{}]", err.code())),
                "display should start with its code: {msg}"
            );
        }
    }

    #[test]
    fn only_scan_contract_errors_are_fatal() {
        let fatal: Vec<&str> = all_variants()
            .iter()
            .filter(|e| e.is_scan_fatal())
            .map(GuardError::code)
            .collect();
        assert_eq!(fatal, vec!["FNG-1001", "FNG-2001", "FNG-2002"]);
    }

    #[test]
    fn root_resolution_keeps_io_source() {
        use std::error::Error as _;

        let err = GuardError::RootResolution {
            path: PathBuf::from("/nope"),
            source: io_err(),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/nope"));
    }

    #[test]
    fn io_convenience_constructor() {
        let err = GuardError::io("/tmp/test.txt", io_err());
        assert_eq!(err.code(), "FNG-3002");
        assert!(err.to_string().contains("/tmp/test.txt"));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: GuardError = json_err.into();
        assert_eq!(err.code(), "FNG-2101");
    }

    #[test]
    fn from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("= invalid").unwrap_err();
        let err: GuardError = toml_err.into();
        assert_eq!(err.code(), "FNG-1003");
    }
}
