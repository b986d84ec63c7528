//! JSON and YAML document parsing
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use serde_json::Value;
use std::path::Path;

/// On-disk document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `.json`
    Json,
    /// `.yaml`, `.yml`
    Yaml,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => Err(LoaderError::unsupported_format(path)),
        }
    }

    /// Extensions tried when resolving an identifier, in order
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yaml", "yml"],
        }
    }

    pub fn all() -> [Format; 2] {
        [Format::Json, Format::Yaml]
    }
}

/// Parses document text into a JSON value regardless of source format
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a file, detecting the format from its extension
    pub fn parse_file(&self, path: &Path) -> LoaderResult<Value> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| LoaderError::io(path, e))?;
        self.parse_content(&content, format, path)
    }

    /// `path` is only used for error context
    pub fn parse_content(&self, content: &str, format: Format, path: &Path) -> LoaderResult<Value> {
        match format {
            Format::Json => self.parse_json(content, path),
            Format::Yaml => self.parse_yaml(content, path),
        }
    }

    pub fn parse_json(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        serde_json::from_str(content).map_err(|e| LoaderError::json_parse(path, e))
    }

    pub fn parse_yaml(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        // Parse as YAML first so syntax errors are reported as YAML errors
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| LoaderError::yaml_parse(path, e))?;
        serde_json::to_value(yaml).map_err(|e| LoaderError::json_parse(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(Path::new("event.schema.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("event.ui.YAML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("event.yml")).unwrap(), Format::Yaml);
        assert!(Format::from_path(Path::new("event.toml")).is_err());
        assert!(Format::from_path(Path::new("event")).is_err());
    }

    #[test]
    fn test_yaml_and_json_agree() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        let yaml_path = dir.path().join("event.yaml");
        let json_path = dir.path().join("event.json");

        fs::write(
            &yaml_path,
            "title: Event\nproperties:\n  count:\n    type: integer\n    minimum: 1\nrequired: [count]\n",
        )
        .unwrap();
        fs::write(
            &json_path,
            r#"{"title": "Event", "properties": {"count": {"type": "integer", "minimum": 1}}, "required": ["count"]}"#,
        )
        .unwrap();

        let parser = DocumentParser::new();
        assert_eq!(parser.parse_file(&yaml_path)?, parser.parse_file(&json_path)?);
        Ok(())
    }

    #[test]
    fn test_parse_errors_carry_path() {
        let parser = DocumentParser::new();
        let err = parser
            .parse_content("{ not json", Format::Json, Path::new("bad.json"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::JsonParse { .. }));
        assert_eq!(err.path(), Some(Path::new("bad.json")));

        let err = parser.parse_file(Path::new("/definitely/missing.json")).unwrap_err();
        assert!(err.is_not_found());
    }
}
