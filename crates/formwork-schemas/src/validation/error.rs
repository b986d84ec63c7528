//! Field-level validation results
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Message recorded for missing or blank required fields
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Outcome of checking one value: `Err` carries the user-facing message
pub type FieldResult = Result<(), String>;

/// Mapping from field path to a human-readable message.
///
/// Only failed fields have an entry. A later message for the same path
/// replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed for {} field(s):", self.errors.len())?;
        for (path, message) in &self.errors {
            write!(f, "\n  - {}: {}", path, message)?;
        }
        Ok(())
    }
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field, returning the message it replaced
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) -> Option<String> {
        self.errors.insert(path.into(), message.into())
    }

    /// Record the standard required-field message
    pub fn insert_required(&mut self, path: impl Into<String>) -> Option<String> {
        self.insert(path, REQUIRED_MESSAGE)
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.errors.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Paths of all failed fields, in sorted order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok` if nothing failed, otherwise the collected errors
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.errors
    }
}

impl From<BTreeMap<String, String>> for ValidationErrors {
    fn from(errors: BTreeMap<String, String>) -> Self {
        Self { errors }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            errors: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_writer_wins() {
        let mut errors = ValidationErrors::new();
        assert!(errors.insert_required("email").is_none());
        let previous = errors.insert("email", "Must be a valid email address");
        assert_eq!(previous.as_deref(), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Must be a valid email address"));
    }

    #[test]
    fn test_into_result_and_display() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let errors: ValidationErrors = [("b", "second"), ("a", "first")].into_iter().collect();
        let text = errors.to_string();
        assert!(text.starts_with("Validation failed for 2 field(s):"));
        assert!(text.find("a: first").unwrap() < text.find("b: second").unwrap());
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let errors: ValidationErrors = [("end", "End must be after start")].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&errors).unwrap(),
            r#"{"end":"End must be after start"}"#
        );
    }
}
