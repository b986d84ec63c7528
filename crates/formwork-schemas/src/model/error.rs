//! Errors raised while building schema and UI schema models
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Result type for model construction
pub type ModelResult<T> = Result<T, ModelError>;

/// A document could not be turned into a model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The document (or a nested definition) is not a JSON object
    #[error("expected an object at '{path}'")]
    NotAnObject { path: String },

    /// A property does not declare a type
    #[error("property '{path}' has no type")]
    MissingType { path: String },

    /// A property declares a type this engine does not know
    #[error("property '{path}' has unsupported type '{found}'")]
    UnsupportedType { path: String, found: String },

    /// An array property without an item definition
    #[error("array property '{path}' must declare items")]
    MissingItems { path: String },

    /// A keyword holds a value of the wrong shape
    #[error("invalid '{keyword}' at '{path}': {reason}")]
    InvalidKeyword {
        path: String,
        keyword: String,
        reason: String,
    },

    /// A cross-field rule definition is malformed
    #[error("invalid cross-field rule '{name}': {reason}")]
    InvalidRule { name: String, reason: String },

    /// The UI schema tree could not be decoded
    #[error("invalid UI schema: {reason}")]
    InvalidUiSchema { reason: String },
}

impl ModelError {
    pub fn invalid_keyword(
        path: impl Into<String>,
        keyword: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidKeyword {
            path: path.into(),
            keyword: keyword.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_rule(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_ui(reason: impl Into<String>) -> Self {
        Self::InvalidUiSchema {
            reason: reason.into(),
        }
    }
}
