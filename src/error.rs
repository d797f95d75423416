//! Error types for the dashboard core.
//!
//! Only failures that the caller must report live here. A record whose date
//! cannot be parsed is not an error: it is excluded from date-dependent
//! results. An empty collection is not an error either.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while building or persisting an export payload.
///
/// A failed export is user-visible data loss, so these are always returned
/// to the caller and never logged-and-dropped.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush spreadsheet buffer: {0}")]
    Buffer(String),

    #[error("Failed to encode PDF document: {0}")]
    Pdf(String),

    #[error("Output directory {path} is not writable: {source}")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while loading or validating the dashboard configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failure while loading a record snapshot or a pre-counted summary.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_names_field() {
        let err = ConfigError::Invalid {
            field: "reveal.page_size",
            reason: "must be greater than zero".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid config value for `reveal.page_size`: must be greater than zero"
        );
    }

    #[test]
    fn test_write_error_includes_path() {
        let err = ExportError::Write {
            path: PathBuf::from("/tmp/out/noticias.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/out/noticias.csv"));
    }
}
