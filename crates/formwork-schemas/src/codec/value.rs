//! Typed values decoded from flat form submissions
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::codec::path::{FieldPath, PathSegment};
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

static DECIMAL_REGEX: OnceLock<Regex> = OnceLock::new();

fn decimal_regex() -> &'static Regex {
    DECIMAL_REGEX.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").expect("decimal pattern is valid")
    })
}

/// A number decoded from submitted text.
///
/// The submitted text is kept next to the parsed value so that a field
/// declared as `string` still sees `"007"` rather than `7`.
#[derive(Debug, Clone, PartialEq)]
pub struct FormNumber {
    value: f64,
    text: String,
}

impl FormNumber {
    /// Parse a plain decimal literal (`12`, `-3.5`, `.25`).
    ///
    /// Exponents, `inf`, `NaN` and surrounding whitespace are rejected so
    /// that such inputs stay strings.
    pub fn parse(text: &str) -> Option<Self> {
        if !decimal_regex().is_match(text) {
            return None;
        }
        let value: f64 = text.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(Self {
            value,
            text: text.to_string(),
        })
    }

    /// Build a number from a value, rendering its canonical text
    pub fn from_f64(value: f64) -> Self {
        let text = if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else {
            format!("{}", value)
        };
        Self { value, text }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// The text this number was decoded from
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_integral(&self) -> bool {
        self.value.is_finite() && self.value.fract() == 0.0
    }
}

impl fmt::Display for FormNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A node of decoded submission data.
///
/// Leaves are strings, numbers, or booleans; branches are ordered lists
/// or name-keyed objects.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    String(String),
    Number(FormNumber),
    Bool(bool),
    Array(Vec<FormValue>),
    Object(BTreeMap<String, FormValue>),
}

impl FormValue {
    /// Coerce a raw submitted string into a typed leaf.
    ///
    /// `"true"`/`"false"` become booleans, decimal literals become numbers,
    /// anything else stays a string with its whitespace untouched.
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "true" => FormValue::Bool(true),
            "false" => FormValue::Bool(false),
            _ => match FormNumber::parse(raw) {
                Some(number) => FormValue::Number(number),
                None => FormValue::String(raw.to_string()),
            },
        }
    }

    /// Filler used when an array has to grow past its current length
    pub(crate) fn placeholder() -> Self {
        FormValue::String(String::new())
    }

    /// True for strings that are empty or whitespace only
    pub fn is_blank(&self) -> bool {
        matches!(self, FormValue::String(s) if s.trim().is_empty())
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, FormValue::Array(_) | FormValue::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FormValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of the value, accepting numeric strings
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FormValue::Number(n) => Some(n.value()),
            FormValue::String(s) => FormNumber::parse(s.trim()).map(|n| n.value()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FormValue]> {
        match self {
            FormValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, FormValue>> {
        match self {
            FormValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Textual form of a scalar, as it was submitted
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            FormValue::String(s) => Some(Cow::Borrowed(s)),
            FormValue::Number(n) => Some(Cow::Borrowed(n.as_str())),
            FormValue::Bool(true) => Some(Cow::Borrowed("true")),
            FormValue::Bool(false) => Some(Cow::Borrowed("false")),
            _ => None,
        }
    }

    /// Short name of the variant, used in messages and logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            FormValue::String(_) => "string",
            FormValue::Number(_) => "number",
            FormValue::Bool(_) => "boolean",
            FormValue::Array(_) => "array",
            FormValue::Object(_) => "object",
        }
    }

    /// Resolve a path below this value
    pub fn get_path(&self, path: &FieldPath) -> Option<&FormValue> {
        let mut current = self;
        for segment in path.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), FormValue::Object(map)) => map.get(key)?,
                (PathSegment::Index(index), FormValue::Array(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Convert from a JSON document. Nulls have no counterpart and are
    /// dropped from objects and replaced by empty strings inside arrays.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(FormValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(|v| {
                FormValue::Number(FormNumber {
                    value: v,
                    text: n.to_string(),
                })
            }),
            Value::String(s) => Some(FormValue::String(s.clone())),
            Value::Array(items) => Some(FormValue::Array(
                items
                    .iter()
                    .map(|item| FormValue::from_json(item).unwrap_or_else(FormValue::placeholder))
                    .collect(),
            )),
            Value::Object(map) => Some(FormValue::Object(
                map.iter()
                    .filter_map(|(k, v)| FormValue::from_json(v).map(|v| (k.clone(), v)))
                    .collect(),
            )),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FormValue::String(s) => Value::String(s.clone()),
            FormValue::Number(n) => number_to_json(n),
            FormValue::Bool(b) => Value::Bool(*b),
            FormValue::Array(items) => Value::Array(items.iter().map(FormValue::to_json).collect()),
            FormValue::Object(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

fn number_to_json(number: &FormNumber) -> Value {
    if number.is_integral() && number.value().abs() < 9.0e15 {
        Value::from(number.value() as i64)
    } else {
        serde_json::Number::from_f64(number.value())
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text() {
            Some(text) => f.write_str(&text),
            None => write!(f, "{}", self.to_json()),
        }
    }
}

impl Serialize for FormValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FormValue::String(s) => serializer.serialize_str(s),
            FormValue::Number(n) => {
                if n.is_integral() && n.value().abs() < 9.0e15 {
                    serializer.serialize_i64(n.value() as i64)
                } else {
                    serializer.serialize_f64(n.value())
                }
            }
            FormValue::Bool(b) => serializer.serialize_bool(*b),
            FormValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FormValue::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

/// Decoded submission: the root object of a form post
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: BTreeMap<String, FormValue>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &BTreeMap<String, FormValue> {
        &self.fields
    }

    /// Top-level field by name
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Resolve a dotted/indexed path; `None` when any segment is absent
    pub fn lookup(&self, path: &str) -> Option<&FormValue> {
        self.lookup_path(&FieldPath::parse_or_literal(path))
    }

    pub fn lookup_path(&self, path: &FieldPath) -> Option<&FormValue> {
        let (first, rest) = path.segments().split_first()?;
        let PathSegment::Key(name) = first else {
            return None;
        };
        let head = self.fields.get(name)?;
        head.get_path(&FieldPath::from_segments(rest.to_vec()))
    }

    /// Build decoded data from an already nested JSON object
    pub fn from_json(value: &Value) -> Self {
        match FormValue::from_json(value) {
            Some(FormValue::Object(fields)) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    pub(crate) fn from_fields(fields: BTreeMap<String, FormValue>) -> Self {
        Self { fields }
    }
}

impl Serialize for FormData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}
