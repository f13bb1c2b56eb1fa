//! Error types for the Dictcast core library
//!
//! This module defines the error handling system for Dictcast, using thiserror
//! for ergonomic error definitions and anyhow for errors raised by user supplied
//! converters and extractors.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

use crate::conversion::path::PathError;

/// Main error type for Dictcast operations
#[derive(Error, Debug)]
pub enum Error {
    /// Path extraction errors (missing keys, malformed paths, wrong cursor shape)
    #[error(transparent)]
    Path(#[from] PathError),

    /// The runtime shape of a value is incompatible with the requested descriptor
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: String,
        context: Option<String>,
    },

    /// The target type rejected the value during construction
    #[error("Conversion to {target} failed for value {value}: {message}")]
    Conversion {
        target: String,
        value: String,
        message: String,
    },

    /// The type descriptor itself is malformed
    #[error("Invalid type descriptor: {message}")]
    InvalidDescriptor { message: String },

    /// A required field is absent from the source and has no default
    #[error("Missing field '{field}' required by {type_name}")]
    MissingField { type_name: String, field: String },

    /// A field carries its own path and is also rerouted by the routing table
    #[error("Field '{field}' of {type_name} has both an embedded path and a route override")]
    RouteConflict { type_name: String, field: String },

    /// A route does not fit the type it is attached to
    #[error("Invalid route for {type_name}: {message}")]
    RouteValidation {
        type_name: String,
        field: Option<String>,
        message: String,
    },

    /// Recursion went deeper than the configured limit
    #[error("Maximum conversion depth {max_depth} exceeded")]
    DepthExceeded { max_depth: usize },

    /// JSON parsing errors for textual input
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Errors raised by user supplied converters and extractors
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a type mismatch error for a value that did not have the expected shape
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
            context: None,
        }
    }

    /// Build a conversion error
    pub fn conversion(
        target: impl Into<String>,
        value: impl fmt::Display,
        message: impl Into<String>,
    ) -> Self {
        Error::Conversion {
            target: target.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }

    /// True when this error is a missing key raised by path extraction
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Error::Path(PathError::KeyNotFound { .. }))
    }

    /// True for the shape-mismatch class of errors
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Error::TypeMismatch { .. }
                | Error::Path(PathError::NotASequence { .. })
                | Error::Path(PathError::NotAMapping { .. })
        )
    }
}

/// Strictness modes applied when a conversion has to degrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrictMode {
    /// Fail instead of degrading
    Strict,
    /// Degrade and log a warning
    #[default]
    Warn,
    /// Degrade silently
    Coerce,
}

impl fmt::Display for StrictMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrictMode::Strict => write!(f, "Strict"),
            StrictMode::Warn => write!(f, "Warn"),
            StrictMode::Coerce => write!(f, "Coerce"),
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
