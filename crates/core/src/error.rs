//! Error types for RoofSolar

use thiserror::Error;

/// Main error type for RoofSolar operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed coordinate '{token}': {reason}")]
    MalformedCoordinate { token: String, reason: String },

    #[error("Insufficient corners: found {found}, need at least 3")]
    InsufficientCorners { found: usize },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Invalid configuration: {name} = {value} ({reason})")]
    InvalidConfiguration {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Shorthand for building an [`Error::InvalidConfiguration`].
    pub fn config(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error only invalidates a single array.
    ///
    /// Per-array errors are reported and skipped by the pipeline. Everything
    /// else (configuration, I/O) aborts the run.
    pub fn is_per_array(&self) -> bool {
        matches!(
            self,
            Error::MalformedCoordinate { .. }
                | Error::InsufficientCorners { .. }
                | Error::DegenerateGeometry(_)
        )
    }
}

/// Result type alias for RoofSolar operations
pub type Result<T> = std::result::Result<T, Error>;
