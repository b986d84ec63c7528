//! In-memory schema model built from a JSON-Schema-like document
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::model::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::warn;

/// Document key carrying the cross-field rule side-table
pub const CROSS_FIELD_RULES_KEY: &str = "x-cross-field-rules";

/// Declared type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl PropertyKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Number)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declared property.
///
/// `items` is set exactly when `kind` is `Array`, `properties` exactly
/// when `kind` is `Object`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub kind: PropertyKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub enum_values: Option<Vec<String>>,
    pub items: Option<Box<Property>>,
    pub properties: Option<BTreeMap<String, Property>>,
    /// Required members of an object property
    pub required: BTreeSet<String>,
    pub examples: Vec<String>,
    pub default: Option<Value>,
}

impl Property {
    /// A bare property of a scalar kind
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            title: None,
            description: None,
            format: None,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
            enum_values: None,
            items: None,
            properties: None,
            required: BTreeSet::new(),
            examples: Vec::new(),
            default: None,
        }
    }

    /// An array property with the given item shape
    pub fn array(items: Property) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::new(PropertyKind::Array)
        }
    }

    /// An object property with nested members
    pub fn object<I, S>(properties: BTreeMap<String, Property>, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            properties: Some(properties),
            required: required.into_iter().map(Into::into).collect(),
            ..Self::new(PropertyKind::Object)
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn with_range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Parse a property definition; `path` names it in error messages
    pub fn from_value(path: &str, value: &Value) -> ModelResult<Self> {
        let obj = value.as_object().ok_or_else(|| ModelError::NotAnObject {
            path: path.to_string(),
        })?;

        let kind = parse_kind(path, obj)?;
        let mut property = Property::new(kind);
        property.title = string_keyword(path, obj, "title")?;
        property.description = string_keyword(path, obj, "description")?;
        property.format = string_keyword(path, obj, "format")?;
        property.min_length = usize_keyword(path, obj, "minLength")?;
        property.max_length = usize_keyword(path, obj, "maxLength")?;
        property.minimum = number_keyword(path, obj, "minimum")?;
        property.maximum = number_keyword(path, obj, "maximum")?;
        property.default = obj.get("default").cloned();

        if let Some(values) = obj.get("enum") {
            property.enum_values = Some(text_list(path, "enum", values)?);
        }

        property.examples = match obj.get("examples") {
            Some(list @ Value::Array(_)) => text_list(path, "examples", list)?,
            Some(single) => scalar_text(single).into_iter().collect(),
            None => Vec::new(),
        };

        match kind {
            PropertyKind::Array => {
                let items = obj.get("items").ok_or_else(|| ModelError::MissingItems {
                    path: path.to_string(),
                })?;
                property.items = Some(Box::new(Property::from_value(
                    &format!("{}.items", path),
                    items,
                )?));
            }
            PropertyKind::Object => {
                property.properties = Some(parse_properties(path, obj.get("properties"))?);
                property.required = parse_required(path, obj.get("required"))?;
            }
            _ => {}
        }

        Ok(property)
    }

    /// Display label: the title when present, else the given name
    pub fn label_or<'a>(&'a self, name: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(name)
    }
}

/// How a cross-field rule compares its first field against its second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    /// First field must be strictly after (greater than) the second
    #[default]
    After,
    AfterOrEqual,
    Before,
    BeforeOrEqual,
    Equals,
    Differs,
}

impl RuleKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "after" => Some(Self::After),
            "afterOrEqual" => Some(Self::AfterOrEqual),
            "before" => Some(Self::Before),
            "beforeOrEqual" => Some(Self::BeforeOrEqual),
            "equals" => Some(Self::Equals),
            "differs" => Some(Self::Differs),
            _ => None,
        }
    }

    /// Whether `first.cmp(second) == ordering` satisfies this rule
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Self::After => ordering == Ordering::Greater,
            Self::AfterOrEqual => ordering != Ordering::Less,
            Self::Before => ordering == Ordering::Less,
            Self::BeforeOrEqual => ordering != Ordering::Greater,
            Self::Equals => ordering == Ordering::Equal,
            Self::Differs => ordering != Ordering::Equal,
        }
    }
}

/// A constraint spanning several fields.
///
/// Only the first two fields are compared; all listed fields take part
/// in the presence check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossFieldRule {
    pub fields: Vec<String>,
    pub message: String,
    pub kind: RuleKind,
}

impl CrossFieldRule {
    pub fn new<I, S>(fields: I, message: impl Into<String>, kind: RuleKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            message: message.into(),
            kind,
        }
    }

    /// Field the rule's message is reported against
    pub fn target(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    fn from_value(name: &str, value: &Value) -> ModelResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| ModelError::invalid_rule(name, "definition must be an object"))?;

        let fields: Vec<String> = obj
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(|| ModelError::invalid_rule(name, "missing 'fields' list"))?
            .iter()
            .map(|f| {
                f.as_str()
                    .map(String::from)
                    .ok_or_else(|| ModelError::invalid_rule(name, "field names must be strings"))
            })
            .collect::<ModelResult<_>>()?;
        if fields.len() < 2 {
            return Err(ModelError::invalid_rule(name, "at least two fields are required"));
        }

        let message = obj
            .get("message")
            .and_then(Value::as_str)
            .ok_or_else(|| ModelError::invalid_rule(name, "missing 'message'"))?
            .to_string();

        let kind = match obj.get("rule") {
            None => RuleKind::default(),
            Some(Value::String(kind)) => RuleKind::parse(kind)
                .ok_or_else(|| ModelError::invalid_rule(name, format!("unknown rule '{}'", kind)))?,
            Some(_) => return Err(ModelError::invalid_rule(name, "'rule' must be a string")),
        };

        Ok(Self {
            fields,
            message,
            kind,
        })
    }
}

/// A compiled validation schema
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub properties: BTreeMap<String, Property>,
    pub required: BTreeSet<String>,
    pub cross_field_rules: BTreeMap<String, CrossFieldRule>,
}

impl Schema {
    /// Build a schema from its JSON document
    ///
    /// # Examples
    ///
    /// ```rust
    /// use formwork_schemas::model::{PropertyKind, Schema};
    /// use serde_json::json;
    ///
    /// let schema = Schema::from_value(&json!({
    ///     "type": "object",
    ///     "properties": {"email": {"type": "string", "format": "email"}},
    ///     "required": ["email"]
    /// })).unwrap();
    ///
    /// assert!(schema.is_required("email"));
    /// assert_eq!(schema.property("email").unwrap().kind, PropertyKind::String);
    /// ```
    pub fn from_value(document: &Value) -> ModelResult<Self> {
        let obj = document.as_object().ok_or_else(|| ModelError::NotAnObject {
            path: "$".to_string(),
        })?;

        let schema = Self {
            title: string_keyword("$", obj, "title")?,
            description: string_keyword("$", obj, "description")?,
            properties: parse_properties("", obj.get("properties"))?,
            required: parse_required("$", obj.get("required"))?,
            cross_field_rules: parse_rules(obj.get(CROSS_FIELD_RULES_KEY))?,
        };

        for name in schema.dangling_references() {
            warn!(field = %name, "schema references a field it does not declare");
        }

        Ok(schema)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Names in `required` or in rule field lists with no matching property.
    ///
    /// These never fail loading; they simply can never be satisfied.
    pub fn dangling_references(&self) -> BTreeSet<&str> {
        let rule_fields = self
            .cross_field_rules
            .values()
            .flat_map(|rule| rule.fields.iter());
        self.required
            .iter()
            .chain(rule_fields)
            .map(String::as_str)
            .filter(|name| {
                let top = name.split(['.', '[']).next().unwrap_or_default();
                !self.properties.contains_key(top)
            })
            .collect()
    }
}

fn parse_kind(path: &str, obj: &Map<String, Value>) -> ModelResult<PropertyKind> {
    let declared = match obj.get("type") {
        Some(Value::String(name)) => name.as_str(),
        // Nullable unions such as ["string", "null"]
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .find(|name| *name != "null")
            .ok_or_else(|| ModelError::MissingType {
                path: path.to_string(),
            })?,
        Some(other) => {
            return Err(ModelError::UnsupportedType {
                path: path.to_string(),
                found: other.to_string(),
            })
        }
        None => {
            return Err(ModelError::MissingType {
                path: path.to_string(),
            })
        }
    };

    PropertyKind::parse(declared).ok_or_else(|| ModelError::UnsupportedType {
        path: path.to_string(),
        found: declared.to_string(),
    })
}

fn parse_properties(
    parent: &str,
    value: Option<&Value>,
) -> ModelResult<BTreeMap<String, Property>> {
    let Some(value) = value else {
        return Ok(BTreeMap::new());
    };
    let obj = value
        .as_object()
        .ok_or_else(|| ModelError::invalid_keyword(parent, "properties", "must be an object"))?;

    obj.iter()
        .map(|(name, definition)| {
            let path = if parent.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", parent, name)
            };
            Property::from_value(&path, definition).map(|p| (name.clone(), p))
        })
        .collect()
}

fn parse_required(path: &str, value: Option<&Value>) -> ModelResult<BTreeSet<String>> {
    match value {
        None => Ok(BTreeSet::new()),
        Some(Value::Array(names)) => names
            .iter()
            .map(|name| {
                name.as_str().map(String::from).ok_or_else(|| {
                    ModelError::invalid_keyword(path, "required", "entries must be strings")
                })
            })
            .collect(),
        Some(_) => Err(ModelError::invalid_keyword(path, "required", "must be a list")),
    }
}

fn parse_rules(value: Option<&Value>) -> ModelResult<BTreeMap<String, CrossFieldRule>> {
    let Some(value) = value else {
        return Ok(BTreeMap::new());
    };
    let obj = value.as_object().ok_or_else(|| {
        ModelError::invalid_keyword("$", CROSS_FIELD_RULES_KEY, "must be an object")
    })?;

    obj.iter()
        .map(|(name, definition)| {
            CrossFieldRule::from_value(name, definition).map(|rule| (name.clone(), rule))
        })
        .collect()
}

fn string_keyword(path: &str, obj: &Map<String, Value>, keyword: &str) -> ModelResult<Option<String>> {
    match obj.get(keyword) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ModelError::invalid_keyword(path, keyword, "must be a string")),
    }
}

fn usize_keyword(path: &str, obj: &Map<String, Value>, keyword: &str) -> ModelResult<Option<usize>> {
    match obj.get(keyword) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                ModelError::invalid_keyword(path, keyword, "must be a non-negative integer")
            }),
    }
}

fn number_keyword(path: &str, obj: &Map<String, Value>, keyword: &str) -> ModelResult<Option<f64>> {
    match obj.get(keyword) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| ModelError::invalid_keyword(path, keyword, "must be a number")),
    }
}

fn text_list(path: &str, keyword: &str, value: &Value) -> ModelResult<Vec<String>> {
    let entries = value
        .as_array()
        .ok_or_else(|| ModelError::invalid_keyword(path, keyword, "must be a list"))?;
    entries
        .iter()
        .map(|entry| {
            scalar_text(entry).ok_or_else(|| {
                ModelError::invalid_keyword(path, keyword, "entries must be scalars")
            })
        })
        .collect()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event_schema() -> Value {
        json!({
            "type": "object",
            "title": "Event",
            "description": "A calendar event",
            "properties": {
                "title": {"type": "string", "title": "Title", "minLength": 1, "maxLength": 120},
                "start": {"type": "string", "format": "datetime-local"},
                "end": {"type": "string", "format": "datetime-local"},
                "repeat": {"type": "string", "enum": ["DAILY", "WEEKLY", "MONTHLY"]},
                "count": {"type": "integer", "minimum": 1, "maximum": 52},
                "attendees": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {"email": {"type": "string", "format": "email"}},
                        "required": ["email"]
                    }
                }
            },
            "required": ["title", "start"],
            "x-cross-field-rules": {
                "endAfterStart": {"fields": ["end", "start"], "message": "End must be after start"}
            }
        })
    }

    #[test]
    fn test_parse_full_schema() {
        let schema = Schema::from_value(&event_schema()).unwrap();
        assert_eq!(schema.title.as_deref(), Some("Event"));
        assert_eq!(schema.properties.len(), 6);
        assert!(schema.is_required("title"));
        assert!(!schema.is_required("end"));

        let title = schema.property("title").unwrap();
        assert_eq!(title.min_length, Some(1));
        assert_eq!(title.max_length, Some(120));

        let count = schema.property("count").unwrap();
        assert_eq!(count.kind, PropertyKind::Integer);
        assert_eq!(count.minimum, Some(1.0));

        let attendees = schema.property("attendees").unwrap();
        let item = attendees.items.as_ref().unwrap();
        assert_eq!(item.kind, PropertyKind::Object);
        assert!(item.required.contains("email"));
        assert!(attendees.properties.is_none());

        let rule = &schema.cross_field_rules["endAfterStart"];
        assert_eq!(rule.fields, ["end", "start"]);
        assert_eq!(rule.kind, RuleKind::After);
        assert_eq!(rule.target(), "end");
        assert!(schema.dangling_references().is_empty());
    }

    #[test]
    fn test_array_without_items_is_rejected() {
        let err = Schema::from_value(&json!({
            "properties": {"tags": {"type": "array"}}
        }))
        .unwrap_err();
        assert_eq!(err, ModelError::MissingItems { path: "tags".into() });
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = Schema::from_value(&json!({
            "properties": {"blob": {"type": "binary"}}
        }))
        .unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedType { .. }));
    }

    #[test]
    fn test_rule_needs_two_fields() {
        let err = Schema::from_value(&json!({
            "properties": {"a": {"type": "string"}},
            "x-cross-field-rules": {"solo": {"fields": ["a"], "message": "m"}}
        }))
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidRule { .. }));
    }

    #[test]
    fn test_dangling_references_are_not_fatal() {
        let schema = Schema::from_value(&json!({
            "properties": {"a": {"type": "string"}},
            "required": ["a", "ghost"]
        }))
        .unwrap();
        assert_eq!(schema.dangling_references().into_iter().collect::<Vec<_>>(), ["ghost"]);
    }

    #[test]
    fn test_nullable_type_union() {
        let property = Property::from_value("note", &json!({"type": ["string", "null"]})).unwrap();
        assert_eq!(property.kind, PropertyKind::String);
    }

    #[test]
    fn test_rule_kind_ordering() {
        assert!(RuleKind::After.accepts(Ordering::Greater));
        assert!(!RuleKind::After.accepts(Ordering::Equal));
        assert!(RuleKind::BeforeOrEqual.accepts(Ordering::Equal));
        assert!(RuleKind::Differs.accepts(Ordering::Less));
    }
}
