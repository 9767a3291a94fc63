//! # Application Errors
//!
//! Every failure the CLI can report. Core errors are wrapped, never flattened,
//! so the missing field list of an `IncompleteObjectError` survives to `main`.

use proptrack_core::{IncompleteObjectError, TrackError};
use thiserror::Error;

/// Errors raised by the proptrack application.
#[derive(Debug, Error)]
pub enum AppError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// The configuration file could not be parsed or is inconsistent.
    #[error("Config error: {0}")]
    Config(String),

    /// Input JSON could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A shape declaration is malformed.
    #[error("Invalid shape '{shape}': {source}")]
    Track {
        /// Shape being declared.
        shape: String,
        /// Underlying declaration error.
        #[source]
        source: TrackError,
    },

    /// A checked transformation returned an incomplete object.
    #[error(transparent)]
    Incomplete(#[from] IncompleteObjectError),

    /// No shape with this name is configured.
    #[error("Unknown shape: {0}")]
    UnknownShape(String),

    /// No mapping with this name is configured.
    #[error("Unknown mapping: {0}")]
    UnknownMapping(String),

    /// A record was passed to a mapping built for another shape.
    #[error("Mapping '{mapping}' expects a '{expected}' record, got '{actual}'")]
    ShapeMismatch {
        /// Mapping name.
        mapping: String,
        /// Source shape the mapping was configured with.
        expected: String,
        /// Shape of the record actually passed.
        actual: String,
    },

    /// Input was valid JSON but not an object.
    #[error("Input must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
