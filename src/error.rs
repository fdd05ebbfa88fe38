//! Error types for the conflux library

use crate::key::Key;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for conflux operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for conflux
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Source Errors
    // -------------------------------------------------------------------------
    #[error("Invalid {kind} source: {detail}")]
    InvalidSource { kind: String, detail: String },

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {detail}")]
    Parse { path: PathBuf, detail: String },

    // -------------------------------------------------------------------------
    // Resolution Errors
    // -------------------------------------------------------------------------
    #[error("No source produced a value for setting '{0}'")]
    MissingSetting(Key),

    #[error("Invalid value for setting '{key}': {value} does not satisfy schema {schema}")]
    InvalidSetting {
        key: Key,
        value: Value,
        schema: String,
    },

    #[error("Cannot coerce value for '{key}': '{raw}' is not a valid {expected}: {detail}")]
    Coercion {
        key: Key,
        raw: String,
        expected: String,
        detail: String,
    },
}

impl Error {
    /// Check if this error means a setting was absent from every source
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Error::MissingSetting(_))
    }

    /// Check if this is a source-shape error surfaced at setup time
    #[must_use]
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidSource { .. } | Error::FileRead { .. } | Error::Parse { .. }
        )
    }
}
