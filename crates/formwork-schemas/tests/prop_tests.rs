//! Property-based tests for decoding, validation, and rendering
//!
//! These check that the codec and validator behave consistently across
//! arbitrary submissions, including malformed keys.

use formwork_schemas::codec::{decode, FormValue};
use formwork_schemas::model::Schema;
use formwork_schemas::render::render;
use formwork_schemas::ui::UiSchema;
use formwork_schemas::validation::{validate, Validator, ValidatorConfig};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Leaf values as a browser would submit them
fn raw_value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("true".to_string()),
        Just("false".to_string()),
        "-?[0-9]{1,6}(\\.[0-9]{1,3})?",
        "[a-zA-Z0-9 @.:-]{0,20}",
    ]
}

/// Top-level field shapes that never conflict with each other
#[derive(Debug, Clone)]
enum Shape {
    Scalar(String),
    Nested(BTreeMap<String, String>),
    List(BTreeMap<usize, String>),
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    prop_oneof![
        raw_value_strategy().prop_map(Shape::Scalar),
        proptest::collection::btree_map("[a-z][a-z0-9_]{0,6}", raw_value_strategy(), 1..4)
            .prop_map(Shape::Nested),
        proptest::collection::btree_map(0usize..8, raw_value_strategy(), 1..4).prop_map(Shape::List),
    ]
}

fn submission_strategy() -> impl Strategy<Value = BTreeMap<String, Shape>> {
    proptest::collection::btree_map("[a-z][a-zA-Z0-9_]{0,8}", shape_strategy(), 0..6)
}

/// Flatten shapes into submitted `(key, value)` pairs
fn flatten(fields: &BTreeMap<String, Shape>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (name, shape) in fields {
        match shape {
            Shape::Scalar(value) => pairs.push((name.clone(), value.clone())),
            Shape::Nested(members) => {
                for (member, value) in members {
                    pairs.push((format!("{}.{}", name, member), value.clone()));
                }
            }
            Shape::List(items) => {
                for (index, value) in items {
                    pairs.push((format!("{}[{}]", name, index), value.clone()));
                }
            }
        }
    }
    pairs
}

fn property_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!({"type": "string"})),
        Just(json!({"type": "string", "minLength": 2, "maxLength": 8})),
        Just(json!({"type": "string", "format": "email"})),
        Just(json!({"type": "string", "format": "date"})),
        Just(json!({"type": "string", "enum": ["a", "b", "c"]})),
        Just(json!({"type": "integer", "minimum": 0, "maximum": 100})),
        Just(json!({"type": "number"})),
        Just(json!({"type": "boolean"})),
        Just(json!({"type": "array", "items": {"type": "integer"}})),
        Just(json!({"type": "object", "properties": {"x": {"type": "string"}}, "required": ["x"]})),
    ]
}

fn schema_strategy() -> impl Strategy<Value = Schema> {
    (
        proptest::collection::btree_map("[a-z][a-zA-Z0-9_]{0,8}", property_strategy(), 1..6),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(properties, require_first, with_rule)| {
            let names: Vec<String> = properties.keys().cloned().collect();
            let mut document = json!({"type": "object", "properties": properties});
            if require_first {
                document["required"] = json!([names[0]]);
            }
            if with_rule && names.len() >= 2 {
                document["x-cross-field-rules"] = json!({
                    "ordered": {"fields": [names[0], names[1]], "message": "Out of order"}
                });
            }
            Schema::from_value(&document).unwrap()
        })
}

/// Paths an error may legitimately be reported under in shallow mode
fn reportable(schema: &Schema) -> BTreeSet<String> {
    let mut names: BTreeSet<String> = schema.properties.keys().cloned().collect();
    names.extend(schema.required.iter().cloned());
    for rule in schema.cross_field_rules.values() {
        names.extend(rule.fields.iter().cloned());
    }
    names
}

proptest! {
    #[test]
    fn test_decode_then_lookup_returns_coerced_leaf(fields in submission_strategy()) {
        let pairs = flatten(&fields);
        let data = decode(pairs.iter().map(|(k, v)| (k.as_str(), vec![v.clone()])));

        for (key, raw) in &pairs {
            let expected = FormValue::coerce(raw);
            prop_assert_eq!(data.lookup(key), Some(&expected), "key {}", key);
        }
        prop_assert_eq!(data.len(), fields.len());
    }

    #[test]
    fn test_decode_accepts_any_key(
        raw in proptest::collection::btree_map("[a-z.\\[\\]0-9]{0,12}", "[a-z0-9]{0,4}", 0..8)
    ) {
        let data = decode(raw.iter().map(|(k, v)| (k.as_str(), vec![v.clone()])));
        prop_assert!(data.len() <= raw.len());
        // Nothing is declared, so nothing can fail
        prop_assert!(validate(&data, &Schema::default()).is_empty());
    }

    #[test]
    fn test_validate_reports_only_known_paths(
        schema in schema_strategy(),
        fields in submission_strategy(),
    ) {
        let pairs = flatten(&fields);
        let data = decode(pairs.iter().map(|(k, v)| (k.as_str(), vec![v.clone()])));

        let errors = validate(&data, &schema);
        let known = reportable(&schema);
        for path in errors.fields() {
            prop_assert!(known.contains(path), "unexpected error path {}", path);
        }
        for name in &schema.required {
            if data.get(name).map_or(true, FormValue::is_blank) {
                prop_assert!(errors.contains(name), "missing required error for {}", name);
            }
        }
    }

    #[test]
    fn test_deep_validation_and_render_are_total(
        schema in schema_strategy(),
        fields in submission_strategy(),
    ) {
        let pairs = flatten(&fields);
        let data = decode(pairs.iter().map(|(k, v)| (k.as_str(), vec![v.clone()])));
        let errors = Validator::with_config(&schema, ValidatorConfig::deep()).validate(&data);

        let elements: Vec<Value> = schema
            .properties
            .keys()
            .map(|name| json!({"type": "Control", "scope": format!("#/properties/{}", name)}))
            .collect();
        let ui = UiSchema::from_value(&json!({"type": "VerticalLayout", "elements": elements})).unwrap();

        let view = render(&ui, &schema, Some(&data), Some(&errors));
        prop_assert!(view.unresolved().is_empty());
        prop_assert_eq!(view.to_html(), render(&ui, &schema, Some(&data), Some(&errors)).to_html());
    }
}
