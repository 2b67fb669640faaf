//! Error types for configuration field addressing.

use thiserror::Error;

use crate::field::FieldKind;

/// Primary error type for resolving and updating configuration fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Field identifier was not of the form `field` or `section.field`.
    #[error("malformed field path '{path}'")]
    InvalidPath {
        /// Identifier supplied by the caller.
        path: String,
    },
    /// Field identifier was well-formed but names no known leaf.
    #[error("unknown configuration field '{path}'")]
    UnknownField {
        /// Identifier supplied by the caller.
        path: String,
    },
    /// Operation did not match the declared type of the leaf.
    #[error("field '{path}' holds a {expected} value, got {found}")]
    TypeMismatch {
        /// Path of the targeted leaf.
        path: &'static str,
        /// Kind declared by the leaf.
        expected: FieldKind,
        /// Description of what the caller supplied.
        found: String,
    },
    /// Raw input could not be coerced to the leaf's declared kind.
    #[error("'{value}' is not a valid {kind} for '{path}'")]
    InvalidInput {
        /// Path of the targeted leaf.
        path: &'static str,
        /// Kind declared by the leaf.
        kind: FieldKind,
        /// Raw input supplied by the caller.
        value: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid_path(path: &str) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
        }
    }

    pub(crate) fn unknown_field(path: &str) -> Self {
        Self::UnknownField {
            path: path.to_string(),
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
