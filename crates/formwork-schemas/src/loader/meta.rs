//! Structural checks of raw documents against embedded meta-schemas
//!
//! These run before model construction so a malformed document is
//! rejected with every violation listed, not just the first one the
//! model builder trips over.
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use jsonschema::{Draft, Validator};
use serde_json::{json, Value};
use std::sync::OnceLock;

static SCHEMA_META: OnceLock<Validator> = OnceLock::new();
static UI_META: OnceLock<Validator> = OnceLock::new();

fn schema_meta() -> &'static Validator {
    SCHEMA_META.get_or_init(|| compile(&schema_meta_document()))
}

fn ui_meta() -> &'static Validator {
    UI_META.get_or_init(|| compile(&ui_meta_document()))
}

fn compile(document: &Value) -> Validator {
    jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(document)
        .expect("embedded meta-schema is valid")
}

fn schema_meta_document() -> Value {
    let kinds = json!(["string", "integer", "number", "boolean", "array", "object"]);
    let nullable_kinds = json!(["string", "integer", "number", "boolean", "array", "object", "null"]);
    json!({
        "type": "object",
        "properties": {
            "type": {"const": "object"},
            "title": {"type": "string"},
            "description": {"type": "string"},
            "properties": {
                "type": "object",
                "additionalProperties": {"$ref": "#/definitions/property"}
            },
            "required": {"type": "array", "items": {"type": "string"}},
            "x-cross-field-rules": {
                "type": "object",
                "additionalProperties": {"$ref": "#/definitions/rule"}
            }
        },
        "definitions": {
            "property": {
                "type": "object",
                "required": ["type"],
                "properties": {
                    "type": {
                        "anyOf": [
                            {"enum": kinds},
                            {"type": "array", "items": {"enum": nullable_kinds}, "minItems": 1}
                        ]
                    },
                    "title": {"type": "string"},
                    "description": {"type": "string"},
                    "format": {"type": "string"},
                    "minLength": {"type": "integer", "minimum": 0},
                    "maxLength": {"type": "integer", "minimum": 0},
                    "minimum": {"type": "number"},
                    "maximum": {"type": "number"},
                    "enum": {"type": "array"},
                    "items": {"$ref": "#/definitions/property"},
                    "properties": {
                        "type": "object",
                        "additionalProperties": {"$ref": "#/definitions/property"}
                    },
                    "required": {"type": "array", "items": {"type": "string"}}
                }
            },
            "rule": {
                "type": "object",
                "required": ["fields", "message"],
                "properties": {
                    "fields": {"type": "array", "items": {"type": "string"}, "minItems": 2},
                    "message": {"type": "string"},
                    "rule": {
                        "enum": ["after", "afterOrEqual", "before", "beforeOrEqual", "equals", "differs"]
                    }
                }
            }
        }
    })
}

fn ui_meta_document() -> Value {
    json!({
        "allOf": [
            {"$ref": "#/definitions/element"},
            {"properties": {"type": {"enum": ["VerticalLayout", "HorizontalLayout", "Group"]}}}
        ],
        "definitions": {
            "element": {
                "type": "object",
                "required": ["type"],
                "properties": {
                    "type": {
                        "enum": ["VerticalLayout", "HorizontalLayout", "Group", "Label", "Control"]
                    },
                    "elements": {"type": "array", "items": {"$ref": "#/definitions/element"}},
                    "title": {"type": "string"},
                    "text": {"type": "string"},
                    "scope": {"type": "string", "pattern": "^#/properties/"},
                    "label": {"type": "string"},
                    "description": {"type": "string"},
                    "options": {"type": "object"}
                },
                "allOf": [
                    {
                        "if": {"properties": {"type": {"const": "Control"}}},
                        "then": {"required": ["scope"]}
                    },
                    {
                        "if": {"properties": {"type": {"const": "Label"}}},
                        "then": {"required": ["text"]}
                    }
                ]
            }
        }
    })
}

fn violations(validator: &Validator, document: &Value) -> Result<(), Vec<String>> {
    let found: Vec<String> = validator
        .iter_errors(document)
        .map(|e| {
            let location = e.instance_path.to_string();
            if location.is_empty() {
                e.to_string()
            } else {
                format!("{}: {}", location, e)
            }
        })
        .collect();

    if found.is_empty() {
        Ok(())
    } else {
        Err(found)
    }
}

/// Check a schema document's structure, listing every violation
pub fn check_schema_document(document: &Value) -> Result<(), Vec<String>> {
    violations(schema_meta(), document)
}

/// Check a UI schema document's structure, listing every violation
pub fn check_ui_document(document: &Value) -> Result<(), Vec<String>> {
    violations(ui_meta(), document)
}
