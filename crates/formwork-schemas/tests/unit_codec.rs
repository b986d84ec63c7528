//! Path codec: decoding flat submissions and looking values back up

use formwork_schemas::codec::{decode, lookup, FieldPath, FormData, FormValue, PathSegment};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};

fn single(pairs: &[(&str, &str)]) -> BTreeMap<String, Vec<String>> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
        .collect()
}

#[cfg(test)]
mod decoding {
    use super::*;

    #[test]
    fn test_full_event_submission() {
        let data = decode(&single(&[
            ("title", "Quarterly review"),
            ("count", "3"),
            ("allDay", "false"),
            ("location.room", "4B"),
            ("location.floor", "2"),
            ("attendees[0].email", "ada@example.com"),
            ("attendees[1].email", "grace@example.com"),
            ("attendees[1].optional", "true"),
            ("notes", "  keep spacing  "),
        ]));

        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({
                "title": "Quarterly review",
                "count": 3,
                "allDay": false,
                "location": {"room": "4B", "floor": 2},
                "attendees": [
                    {"email": "ada@example.com"},
                    {"email": "grace@example.com", "optional": true}
                ],
                "notes": "  keep spacing  "
            })
        );
    }

    #[test]
    fn test_only_first_value_is_used() {
        let mut raw = HashMap::new();
        raw.insert("tag", vec!["first".to_string(), "second".to_string()]);
        raw.insert("none", Vec::new());

        let data = decode(raw);
        assert_eq!(data.lookup("tag").and_then(FormValue::as_str), Some("first"));
        assert!(data.get("none").is_none());
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_decode_is_independent_of_input_order() {
        let forward = vec![
            ("a[1]".to_string(), vec!["x".to_string()]),
            ("a[0].b".to_string(), vec!["y".to_string()]),
        ];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(decode(forward), decode(backward));
    }

    #[test]
    fn test_shape_conflicts_last_sorted_key_wins() {
        // "a" sorts before "a.b", so the nested leaf replaces the scalar
        let data = decode(&single(&[("a", "scalar"), ("a.b", "nested")]));
        assert_eq!(data.lookup("a.b").and_then(FormValue::as_str), Some("nested"));
    }

    #[test]
    fn test_coercion_ignores_schema() {
        let data = decode(&single(&[("zip", "02134"), ("flag", "TRUE"), ("ratio", ".5")]));
        assert_eq!(data.lookup("zip").and_then(FormValue::as_f64), Some(2134.0));
        assert_eq!(data.lookup("zip").unwrap().text().as_deref(), Some("02134"));
        assert_eq!(data.lookup("flag").and_then(FormValue::as_str), Some("TRUE"));
        assert_eq!(data.lookup("ratio").and_then(FormValue::as_f64), Some(0.5));
    }
}

#[cfg(test)]
mod lookups {
    use super::*;

    #[test]
    fn test_not_found_is_not_an_error() {
        let data = FormData::from_json(&json!({"a": {"b": "leaf"}, "list": ["x"]}));
        assert_eq!(lookup(&data, "a.b").and_then(FormValue::as_str), Some("leaf"));
        assert!(lookup(&data, "a.b.c").is_none());
        assert!(lookup(&data, "a.missing").is_none());
        assert!(lookup(&data, "list.0").is_none());
        assert!(lookup(&data, "list[1]").is_none());
        assert!(lookup(&data, "").is_none());
    }

    #[test]
    fn test_canonical_paths() {
        let path: FieldPath = "attendees[3].email".parse().unwrap();
        assert_eq!(
            path.segments(),
            [
                PathSegment::Key("attendees".into()),
                PathSegment::Index(3),
                PathSegment::Key("email".into())
            ]
        );
        assert_eq!(path.to_string(), "attendees[3].email");
        assert_eq!(FieldPath::key("attendees").index(0).child("email").to_string(), "attendees[0].email");
    }
}
