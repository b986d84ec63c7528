//! Error types for document loading
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// A document could not be fetched, parsed, or turned into a model.
///
/// Load failures are never cached; the next call retries.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse JSON document '{path}': {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML document '{path}': {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Unsupported document format for '{path}'. Expected .json, .yaml, or .yml")]
    UnsupportedFormat { path: PathBuf },

    /// No document exists for the identifier
    #[error("No document found for '{key}'")]
    NotFound { key: String },

    /// The document parsed but is not a valid schema or UI schema
    #[error("Invalid document '{key}': {reason}")]
    InvalidDocument { key: String, reason: String },
}

impl LoaderError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::JsonParse {
            path: path.into(),
            source,
        }
    }

    pub fn yaml_parse(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::YamlParse {
            path: path.into(),
            source,
        }
    }

    pub fn unsupported_format(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }

    pub fn not_found(key: impl ToString) -> Self {
        Self::NotFound {
            key: key.to_string(),
        }
    }

    pub fn invalid_document(key: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// File path the error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. }
            | Self::JsonParse { path, .. }
            | Self::YamlParse { path, .. }
            | Self::UnsupportedFormat { path } => Some(path),
            Self::NotFound { .. } | Self::InvalidDocument { .. } => None,
        }
    }

    /// Document identifier the error refers to, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::NotFound { key } | Self::InvalidDocument { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
