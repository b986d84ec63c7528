//! Summary metadata read straight from a raw schema document
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Declared type of a field, as written in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeInfo {
    /// `string`, `integer`, ... or `unknown` when no type is declared
    pub base_type: String,
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<TypeInfo>>,
    pub nullable: bool,
}

impl TypeInfo {
    pub fn from_schema(schema: &Value) -> Self {
        let format = schema.get("format").and_then(Value::as_str).map(String::from);
        let (base_type, nullable) = match schema.get("type") {
            Some(Value::String(name)) => (name.clone(), false),
            Some(Value::Array(names)) => {
                let names: Vec<&str> = names.iter().filter_map(Value::as_str).collect();
                let base = names
                    .iter()
                    .find(|name| **name != "null")
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| "null".to_string());
                (base, names.contains(&"null"))
            }
            _ => ("unknown".to_string(), false),
        };
        let items = if base_type == "array" {
            schema.get("items").map(|items| Box::new(TypeInfo::from_schema(items)))
        } else {
            None
        };

        Self {
            base_type,
            format,
            items,
            nullable,
        }
    }

    /// `string (email)`, `array<integer>`, `boolean | null`
    pub fn display_type(&self) -> String {
        let mut display = match (self.base_type.as_str(), &self.format, &self.items) {
            ("string", Some(format), _) => format!("string ({})", format),
            ("array", _, Some(items)) => format!("array<{}>", items.display_type()),
            (base, _, _) => base.to_string(),
        };
        if self.nullable {
            display.push_str(" | null");
        }
        display
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMetadata {
    pub name: String,
    /// The `type` keyword verbatim (`unknown` when absent)
    pub declared_type: String,
    pub type_info: TypeInfo,
    pub title: Option<String>,
    pub description: Option<String>,
    pub required: bool,
}

/// Reporting view of a schema: never used to decide validity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    /// The `required` list as written, including names with no property
    pub required: Vec<String>,
    /// Declared properties not listed in `required`
    pub optional: Vec<String>,
    pub fields: Vec<FieldMetadata>,
}

impl SchemaMetadata {
    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Markdown summary with a field table
    pub fn to_markdown(&self) -> String {
        Markdown(self).to_string()
    }
}

/// Markdown rendering of a schema summary
struct Markdown<'a>(&'a SchemaMetadata);

impl fmt::Display for Markdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metadata = self.0;
        writeln!(f, "# {}", metadata.title.as_deref().unwrap_or("Schema"))?;
        if let Some(description) = &metadata.description {
            writeln!(f, "\n{}", description)?;
        }

        if metadata.fields.is_empty() {
            return writeln!(f, "\n_No fields declared._");
        }

        writeln!(f, "\n| Field | Type | Required | Description |")?;
        writeln!(f, "|-------|------|----------|-------------|")?;
        for field in &metadata.fields {
            writeln!(
                f,
                "| `{}` | {} | {} | {} |",
                field.name,
                escape_cell(&field.type_info.display_type()),
                if field.required { "yes" } else { "no" },
                escape_cell(field.description.as_deref().unwrap_or(""))
            )?;
        }
        Ok(())
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Single read-only pass over a raw schema document.
///
/// Nothing is validated or cross-checked; malformed sections are
/// reported as absent rather than rejected.
pub fn extract_metadata(document: &Value) -> SchemaMetadata {
    let text = |key: &str| document.get(key).and_then(Value::as_str).map(String::from);

    let required: Vec<String> = document
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default();

    let mut fields = Vec::new();
    let mut optional = Vec::new();
    if let Some(properties) = document.get("properties").and_then(Value::as_object) {
        for (name, definition) in properties {
            let is_required = required.contains(name);
            if !is_required {
                optional.push(name.clone());
            }
            let declared_type = match definition.get("type") {
                Some(Value::String(name)) => name.clone(),
                Some(other) => other.to_string(),
                None => "unknown".to_string(),
            };
            fields.push(FieldMetadata {
                name: name.clone(),
                declared_type,
                type_info: TypeInfo::from_schema(definition),
                title: definition.get("title").and_then(Value::as_str).map(String::from),
                description: definition
                    .get("description")
                    .and_then(Value::as_str)
                    .map(String::from),
                required: is_required,
            });
        }
    }

    SchemaMetadata {
        title: text("title"),
        description: text("description"),
        required,
        optional,
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_metadata() {
        let metadata = extract_metadata(&json!({
            "title": "Event",
            "description": "A calendar event",
            "properties": {
                "title": {"type": "string", "description": "Shown | in lists"},
                "start": {"type": "string", "format": "datetime-local"},
                "tags": {"type": "array", "items": {"type": "string"}},
                "note": {"type": ["string", "null"]},
                "misc": {}
            },
            "required": ["title", "ghost"]
        }));

        assert_eq!(metadata.title.as_deref(), Some("Event"));
        assert_eq!(metadata.required, ["title", "ghost"]);
        let mut optional = metadata.optional.clone();
        optional.sort();
        assert_eq!(optional, ["misc", "note", "start", "tags"]);
        assert_eq!(metadata.field("start").unwrap().declared_type, "string");
        assert_eq!(
            metadata.field("start").unwrap().type_info.display_type(),
            "string (datetime-local)"
        );
        assert_eq!(metadata.field("tags").unwrap().type_info.display_type(), "array<string>");
        assert_eq!(metadata.field("note").unwrap().type_info.display_type(), "string | null");
        assert_eq!(metadata.field("misc").unwrap().declared_type, "unknown");
        assert!(metadata.field("title").unwrap().required);
    }

    #[test]
    fn test_markdown_table() {
        let metadata = extract_metadata(&json!({
            "properties": {"title": {"type": "string", "description": "Shown | in lists"}},
            "required": ["title"]
        }));
        let markdown = metadata.to_markdown();
        assert!(markdown.starts_with("# Schema\n"));
        assert!(markdown.contains("| `title` | string | yes | Shown \\| in lists |"));
    }

    #[test]
    fn test_markdown_without_fields() {
        let metadata = extract_metadata(&json!({"title": "Empty", "description": "Nothing yet"}));
        assert_eq!(
            metadata.to_markdown(),
            "# Empty\n\nNothing yet\n\n_No fields declared._\n"
        );
    }

    #[test]
    fn test_non_object_document() {
        assert_eq!(extract_metadata(&json!([1, 2])), SchemaMetadata::default());
    }
}
