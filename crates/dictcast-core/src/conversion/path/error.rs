//! Error types for path extraction
//!
//! Copyright (c) 2025 Dictcast Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors raised while parsing or evaluating a path expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// A literal key segment missed on a mapping cursor
    #[error("Key not found: '{key}' in path '{path}'")]
    KeyNotFound { key: String, path: String },

    /// Malformed segment
    #[error("Parse error in segment '{segment}' of path '{path}': {message}")]
    Syntax {
        message: String,
        segment: String,
        path: String,
    },

    /// A wildcard segment was applied to something that is not a sequence
    #[error(
        "Type mismatch: wildcard '{segment}' expects a sequence, found {found} in path '{path}'"
    )]
    NotASequence {
        segment: String,
        found: String,
        path: String,
    },

    /// A literal key segment was applied to a scalar cursor
    #[error("Type mismatch: cannot index {found} with key '{key}' in path '{path}'")]
    NotAMapping {
        key: String,
        found: String,
        path: String,
    },
}

impl PathError {
    /// Create a syntax error for a segment of a path
    pub fn syntax(
        message: impl Into<String>,
        segment: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        PathError::Syntax {
            message: message.into(),
            segment: segment.into(),
            path: path.into(),
        }
    }

    /// Path expression the error was raised for
    pub fn path(&self) -> &str {
        match self {
            PathError::KeyNotFound { path, .. }
            | PathError::Syntax { path, .. }
            | PathError::NotASequence { path, .. }
            | PathError::NotAMapping { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PathError::KeyNotFound {
            key: "b".to_string(),
            path: "a/b".to_string(),
        };
        assert_eq!(err.to_string(), "Key not found: 'b' in path 'a/b'");
        assert_eq!(err.path(), "a/b");

        let err = PathError::syntax("missing '='", "*{f}", "e/*{f}");
        assert!(err.to_string().contains("missing '='"));
    }
}
