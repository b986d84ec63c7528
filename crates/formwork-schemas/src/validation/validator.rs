//! Schema-driven validation of decoded submissions
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::codec::{FormData, FormNumber, FormValue};
use crate::model::{Property, PropertyKind, Schema};
use crate::validation::error::{FieldResult, ValidationErrors};
use crate::validation::formats::check_format;
use crate::validation::rules::check_rule;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// How far type dispatch descends into structured values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Arrays and objects are accepted as-is
    #[default]
    Shallow,
    /// Array items and object members are validated against `items` and
    /// nested `properties`, honouring nested `required`
    Deep,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub mode: ValidationMode,
}

impl ValidatorConfig {
    pub fn deep() -> Self {
        Self {
            mode: ValidationMode::Deep,
        }
    }
}

/// Position of the value under inspection
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Canonical field path (`attendees[0].email`); empty at the root
    pub path: String,
    pub mode: ValidationMode,
}

impl ValidationContext {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            path: String::new(),
            mode,
        }
    }

    pub fn child<P: AsRef<str>>(&self, segment: P) -> Self {
        let path = if self.path.is_empty() {
            segment.as_ref().to_string()
        } else {
            format!("{}.{}", self.path, segment.as_ref())
        };
        Self {
            path,
            mode: self.mode,
        }
    }

    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
            mode: self.mode,
        }
    }
}

/// Validates decoded data against one schema.
///
/// Checks run in a fixed order: required fields, then per-field type
/// dispatch, then cross-field rules. A later message for the same path
/// replaces an earlier one.
#[derive(Debug, Clone)]
pub struct Validator<'s> {
    schema: &'s Schema,
    config: ValidatorConfig,
}

impl<'s> Validator<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self::with_config(schema, ValidatorConfig::default())
    }

    pub fn with_config(schema: &'s Schema, config: ValidatorConfig) -> Self {
        Self { schema, config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn validate(&self, data: &FormData) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let context = ValidationContext::new(self.config.mode);

        check_fields(
            &context,
            &self.schema.properties,
            &self.schema.required,
            data.fields(),
            &mut errors,
        );

        for (name, rule) in &self.schema.cross_field_rules {
            check_rule(name, rule, data, self.schema, &mut errors);
        }

        debug!(
            fields = data.len(),
            errors = errors.len(),
            mode = ?self.config.mode,
            "validated submission"
        );
        errors
    }
}

/// Required check plus type dispatch over one level of named members
fn check_fields(
    context: &ValidationContext,
    properties: &BTreeMap<String, Property>,
    required: &BTreeSet<String>,
    fields: &BTreeMap<String, FormValue>,
    errors: &mut ValidationErrors,
) {
    for name in required {
        if fields.get(name).map_or(true, FormValue::is_blank) {
            errors.insert_required(context.child(name).path);
        }
    }

    for (name, value) in fields {
        let Some(property) = properties.get(name) else {
            continue;
        };
        // Blank optional fields are skipped; blank required ones were
        // already reported above.
        if value.is_blank() {
            continue;
        }
        check_property(&context.child(name), property, value, errors);
    }
}

fn check_property(
    context: &ValidationContext,
    property: &Property,
    value: &FormValue,
    errors: &mut ValidationErrors,
) {
    let outcome = match property.kind {
        PropertyKind::String => validate_string(property, value),
        PropertyKind::Integer | PropertyKind::Number => validate_number(property, value),
        PropertyKind::Boolean => validate_boolean(value),
        PropertyKind::Array => {
            if context.mode == ValidationMode::Deep {
                check_array(context, property, value, errors);
            }
            Ok(())
        }
        PropertyKind::Object => {
            if context.mode == ValidationMode::Deep {
                check_object(context, property, value, errors);
            }
            Ok(())
        }
    };

    if let Err(message) = outcome {
        errors.insert(context.path.as_str(), message);
    }
}

fn check_array(
    context: &ValidationContext,
    property: &Property,
    value: &FormValue,
    errors: &mut ValidationErrors,
) {
    let Some(items) = value.as_array() else {
        errors.insert(context.path.as_str(), "Must be a list");
        return;
    };
    let Some(item_property) = property.items.as_deref() else {
        return;
    };
    for (index, item) in items.iter().enumerate() {
        if item.is_blank() {
            continue;
        }
        check_property(&context.child_index(index), item_property, item, errors);
    }
}

fn check_object(
    context: &ValidationContext,
    property: &Property,
    value: &FormValue,
    errors: &mut ValidationErrors,
) {
    let Some(members) = value.as_object() else {
        errors.insert(context.path.as_str(), "Must be a group of fields");
        return;
    };
    let empty = BTreeMap::new();
    let properties = property.properties.as_ref().unwrap_or(&empty);
    check_fields(context, properties, &property.required, members, errors);
}

/// Check a value against a `string` property.
///
/// Any scalar is accepted and its submitted text is checked, so `"007"`
/// keeps its leading zeros. Lists and groups are type errors.
pub fn validate_string(property: &Property, value: &FormValue) -> FieldResult {
    let text = value.text().ok_or_else(|| "Must be text".to_string())?;
    let length = text.chars().count();

    if let Some(min) = property.min_length {
        if length < min {
            return Err(format!("Must be at least {} characters", min));
        }
    }
    if let Some(max) = property.max_length {
        if length > max {
            return Err(format!("Must be at most {} characters", max));
        }
    }
    if let Some(allowed) = &property.enum_values {
        if !allowed.iter().any(|candidate| candidate.as_str() == &*text) {
            return Err(format!("Must be one of: {}", allowed.join(", ")));
        }
    }
    if let Some(format) = &property.format {
        check_format(format, &text).map_err(String::from)?;
    }
    Ok(())
}

/// Check a value against an `integer` or `number` property.
///
/// Numeric strings are accepted; bounds apply only when declared.
pub fn validate_number(property: &Property, value: &FormValue) -> FieldResult {
    let number = value
        .as_f64()
        .ok_or_else(|| "Must be a number".to_string())?;

    if property.kind == PropertyKind::Integer && number.fract() != 0.0 {
        return Err("Must be a whole number".to_string());
    }
    if let Some(min) = property.minimum {
        if number < min {
            return Err(format!("Must be at least {}", FormNumber::from_f64(min)));
        }
    }
    if let Some(max) = property.maximum {
        if number > max {
            return Err(format!("Must be at most {}", FormNumber::from_f64(max)));
        }
    }
    Ok(())
}

/// Check a value against a `boolean` property: native booleans and the
/// checkbox strings `true`, `false`, `on` and empty are accepted.
pub fn validate_boolean(value: &FormValue) -> FieldResult {
    match value {
        FormValue::Bool(_) => Ok(()),
        FormValue::String(s) if matches!(s.as_str(), "true" | "false" | "on" | "") => Ok(()),
        _ => Err("Must be true or false".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attendee_schema() -> Schema {
        Schema::from_value(&json!({
            "properties": {
                "attendees": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "email": {"type": "string", "format": "email"},
                            "seats": {"type": "integer", "minimum": 1}
                        },
                        "required": ["email"]
                    }
                },
                "venue": {
                    "type": "object",
                    "properties": {"capacity": {"type": "integer"}},
                    "required": ["capacity"]
                }
            }
        }))
        .unwrap()
    }

    fn attendee_data() -> FormData {
        FormData::from_json(&json!({
            "attendees": [
                {"email": "a@example.com", "seats": 2},
                {"email": "broken", "seats": 0},
                {"seats": 1}
            ],
            "venue": {"capacity": "lots"}
        }))
    }

    #[test]
    fn test_context_paths() {
        let root = ValidationContext::new(ValidationMode::Deep);
        let item = root.child("attendees").child_index(2).child("email");
        assert_eq!(item.path, "attendees[2].email");
    }

    #[test]
    fn test_shallow_mode_passes_structures_through() {
        let schema = attendee_schema();
        let errors = Validator::new(&schema).validate(&attendee_data());
        assert!(errors.is_empty(), "{}", errors);
    }

    #[test]
    fn test_deep_mode_descends_into_items_and_members() {
        let schema = attendee_schema();
        let errors = Validator::with_config(&schema, ValidatorConfig::deep()).validate(&attendee_data());

        assert_eq!(errors.get("attendees[1].email"), Some("Must be a valid email address"));
        assert_eq!(errors.get("attendees[1].seats"), Some("Must be at least 1"));
        assert_eq!(errors.get("attendees[2].email"), Some("This field is required"));
        assert_eq!(errors.get("venue.capacity"), Some("Must be a number"));
        assert!(!errors.contains("attendees[0].email"));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_deep_mode_rejects_scalar_for_array() {
        let schema = attendee_schema();
        let data = FormData::from_json(&json!({"attendees": "nobody"}));
        let errors = Validator::with_config(&schema, ValidatorConfig::deep()).validate(&data);
        assert_eq!(errors.get("attendees"), Some("Must be a list"));
    }

    #[test]
    fn test_string_accepts_numeric_text() {
        let property = Property::new(PropertyKind::String).with_length(Some(3), Some(3));
        assert!(validate_string(&property, &FormValue::coerce("007")).is_ok());
        assert!(validate_string(&property, &FormValue::coerce("7")).is_err());
        assert!(validate_string(&property, &FormValue::Array(vec![])).is_err());
    }

    #[test]
    fn test_number_bounds_include_zero() {
        let property = Property::new(PropertyKind::Number).with_range(Some(0.0), Some(2.5));
        assert!(validate_number(&property, &FormValue::coerce("0")).is_ok());
        assert_eq!(
            validate_number(&property, &FormValue::coerce("-1")),
            Err("Must be at least 0".to_string())
        );
        assert_eq!(
            validate_number(&property, &FormValue::coerce("3")),
            Err("Must be at most 2.5".to_string())
        );
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let property = Property::new(PropertyKind::Integer);
        assert!(validate_number(&property, &FormValue::coerce("4")).is_ok());
        assert!(validate_number(&property, &FormValue::String(" 4 ".into())).is_ok());
        assert_eq!(
            validate_number(&property, &FormValue::coerce("4.5")),
            Err("Must be a whole number".to_string())
        );
        assert!(validate_number(&property, &FormValue::Bool(true)).is_err());
    }

    #[test]
    fn test_boolean_checkbox_values() {
        for accepted in ["true", "false"] {
            assert!(validate_boolean(&FormValue::coerce(accepted)).is_ok());
        }
        assert!(validate_boolean(&FormValue::String("on".into())).is_ok());
        assert!(validate_boolean(&FormValue::String(String::new())).is_ok());
        assert!(validate_boolean(&FormValue::String("yes".into())).is_err());
        assert!(validate_boolean(&FormValue::coerce("1")).is_err());
    }
}
