//! Rendering UI schemas against schemas, data, and validation errors

use formwork_schemas::codec::{decode, FormData};
use formwork_schemas::model::Schema;
use formwork_schemas::render::{render, Direction, InputKind, InputView, ViewNode};
use formwork_schemas::ui::UiSchema;
use formwork_schemas::validation::validate;
use serde_json::json;
use std::collections::BTreeMap;

fn schema() -> Schema {
    Schema::from_value(&json!({
        "type": "object",
        "properties": {
            "title": {"type": "string", "title": "Title", "description": "Shown in the calendar", "examples": ["Standup"]},
            "notes": {"type": "string"},
            "repeat": {"type": "string", "enum": ["DAILY", "WEEKLY", "MONTHLY"]},
            "count": {"type": "integer", "minimum": 1, "maximum": 52},
            "allDay": {"type": "boolean", "title": "All day"},
            "start": {"type": "string", "format": "datetime-local"},
            "organizer": {"type": "string", "format": "email"},
            "location": {
                "type": "object",
                "properties": {
                    "room": {"type": "string"},
                    "floor": {"type": "integer"}
                },
                "required": ["room"]
            },
            "attendees": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "email": {"type": "string", "format": "email"},
                        "tags": {"type": "array", "items": {"type": "string"}}
                    },
                    "required": ["email"]
                }
            }
        },
        "required": ["title", "start"]
    }))
    .unwrap()
}

fn ui() -> UiSchema {
    UiSchema::from_value(&json!({
        "type": "VerticalLayout",
        "elements": [
            {"type": "Label", "text": "New <event>"},
            {"type": "Control", "scope": "#/properties/title"},
            {"type": "Control", "scope": "#/properties/notes", "label": "Notes", "options": {"multi": true}},
            {"type": "HorizontalLayout", "elements": [
                {"type": "Control", "scope": "#/properties/start"},
                {"type": "Control", "scope": "#/properties/missing"},
                {"type": "Control", "scope": "#/properties/count"}
            ]},
            {"type": "Group", "title": "Details", "elements": [
                {"type": "Control", "scope": "#/properties/repeat"},
                {"type": "Control", "scope": "#/properties/allDay", "options": {"showLabel": false}},
                {"type": "Control", "scope": "#/properties/organizer", "options": {"suggestions": ["me@example.com"]}},
                {"type": "Control", "scope": "#/properties/location"},
                {"type": "Control", "scope": "#/properties/attendees"}
            ]}
        ]
    }))
    .unwrap()
}

fn submitted() -> FormData {
    let raw: BTreeMap<&str, Vec<String>> = [
        ("title", "Plan <Q4> & review"),
        ("start", "2025-10-28T09:00"),
        ("count", "60"),
        ("repeat", "WEEKLY"),
        ("allDay", "true"),
        ("location.room", "4B"),
        ("attendees[0].email", "ada@example.com"),
        ("attendees[1].email", "grace@example.com"),
    ]
    .into_iter()
    .map(|(k, v)| (k, vec![v.to_string()]))
    .collect();
    decode(raw)
}

#[cfg(test)]
mod structure {
    use super::*;

    #[test]
    fn test_layout_tree_and_depths() {
        let view = render(&ui(), &schema(), None, None);
        let ViewNode::Layout { direction, depth, children } = view.root() else {
            panic!("root should be a layout");
        };
        assert_eq!(*direction, Direction::Vertical);
        assert_eq!(*depth, 0);
        assert_eq!(children.len(), 5);
        assert!(matches!(&children[0], ViewNode::Label { text, depth: 1 } if text == "New <event>"));
        assert!(matches!(
            &children[3],
            ViewNode::Layout { direction: Direction::Horizontal, depth: 1, .. }
        ));
        assert!(matches!(&children[4], ViewNode::Group { title: Some(t), .. } if t == "Details"));
    }

    #[test]
    fn test_unknown_scope_degrades() {
        let view = render(&ui(), &schema(), None, None);
        assert_eq!(view.unresolved(), ["#/properties/missing"]);
        // Siblings on either side still render
        assert!(view.field("start").is_some());
        assert!(view.field("count").is_some());
        assert!(view.to_html().contains("class=\"fw-unresolved\" data-scope=\"#/properties/missing\""));
    }

    #[test]
    fn test_input_kinds() {
        let view = render(&ui(), &schema(), None, None);
        let kind = |name: &str| view.field(name).unwrap().input.kind();
        assert_eq!(kind("title"), InputKind::Text);
        assert_eq!(kind("notes"), InputKind::TextArea);
        assert_eq!(kind("start"), InputKind::DateTimeLocal);
        assert_eq!(kind("count"), InputKind::Number);
        assert_eq!(kind("repeat"), InputKind::Select);
        assert_eq!(kind("allDay"), InputKind::Checkbox);
        assert_eq!(kind("organizer"), InputKind::Email);
        assert_eq!(kind("location"), InputKind::Object);
        assert_eq!(kind("attendees"), InputKind::Repeater);
        assert_eq!(kind("location.room"), InputKind::Text);
        assert_eq!(kind("location.floor"), InputKind::Number);
    }

    #[test]
    fn test_labels_descriptions_and_required() {
        let view = render(&ui(), &schema(), None, None);

        let title = view.field("title").unwrap();
        assert_eq!(title.label, "Title");
        assert_eq!(title.description.as_deref(), Some("Shown in the calendar"));
        assert!(title.required);
        let InputView::Text { placeholder, .. } = &title.input else {
            panic!("title should be a text input");
        };
        assert_eq!(placeholder.as_deref(), Some("Standup"));

        assert_eq!(view.field("notes").unwrap().label, "Notes");
        assert_eq!(view.field("count").unwrap().label, "count");
        assert!(!view.field("allDay").unwrap().show_label);
        assert!(view.field("location.room").unwrap().required);
        assert!(!view.field("location.floor").unwrap().required);
    }
}

#[cfg(test)]
mod prefill {
    use super::*;

    #[test]
    fn test_values_and_errors_round_trip() {
        let schema = schema();
        let data = submitted();
        let errors = validate(&data, &schema);
        assert_eq!(errors.get("count"), Some("Must be at most 52"));

        let view = render(&ui(), &schema, Some(&data), Some(&errors));

        let count = view.field("count").unwrap();
        assert_eq!(count.input.value(), Some("60"));
        assert_eq!(count.error.as_deref(), Some("Must be at most 52"));
        assert!(view.field("title").unwrap().error.is_none());

        assert_eq!(view.field("repeat").unwrap().input.value(), Some("WEEKLY"));
        assert!(matches!(view.field("allDay").unwrap().input, InputView::Checkbox { checked: true }));
        assert_eq!(view.field("location.room").unwrap().input.value(), Some("4B"));

        let html = view.to_html();
        assert!(html.contains("value=\"Plan &lt;Q4&gt; &amp; review\""));
        assert!(html.contains("<p class=\"fw-error\">Must be at most 52</p>"));
        assert!(html.contains("<option value=\"WEEKLY\" selected>WEEKLY</option>"));
        assert!(html.contains("<p class=\"fw-label\">New &lt;event&gt;</p>"));
    }

    #[test]
    fn test_repeater_instances_follow_data() {
        let view = render(&ui(), &schema(), Some(&submitted()), None);
        let InputView::Repeater { template, items, placeholder } = &view.field("attendees").unwrap().input
        else {
            panic!("attendees should be a repeater");
        };

        assert_eq!(placeholder, "__index__");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].fields[0].name, "attendees[1].email");
        assert_eq!(items[1].fields[0].input.value(), Some("grace@example.com"));
        assert_eq!(template[0].name, "attendees[__index__].email");
        assert_eq!(template[0].input.value(), Some(""));

        // Arrays inside a repeater fall back to a plain text input
        let tags = view.field("attendees[0].tags").unwrap();
        assert_eq!(tags.input.kind(), InputKind::Text);

        let html = view.to_html();
        assert!(html.contains("<template class=\"fw-repeater-template\">"));
        assert!(html.contains("name=\"attendees[__index__].email\""));
        assert!(html.contains("class=\"fw-add\""));
    }

    #[test]
    fn test_empty_array_renders_one_blank_instance() {
        let view = render(&ui(), &schema(), Some(&FormData::new()), None);
        let InputView::Repeater { items, .. } = &view.field("attendees").unwrap().input else {
            panic!("attendees should be a repeater");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].fields[0].name, "attendees[0].email");
    }
}

#[cfg(test)]
mod purity {
    use super::*;

    #[test]
    fn test_render_is_deterministic() {
        let schema = schema();
        let ui = ui();
        let data = submitted();
        let errors = validate(&data, &schema);

        let first = render(&ui, &schema, Some(&data), Some(&errors));
        let second = render(&ui, &schema, Some(&data), Some(&errors));
        assert_eq!(first, second);
        assert_eq!(first.to_html(), second.to_html());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_render_leaves_inputs_untouched() {
        let schema = schema();
        let ui = ui();
        let data = submitted();
        let errors = validate(&data, &schema);
        let (schema_before, ui_before, data_before, errors_before) =
            (schema.clone(), ui.clone(), data.clone(), errors.clone());

        let _ = render(&ui, &schema, Some(&data), Some(&errors));
        assert_eq!(schema, schema_before);
        assert_eq!(ui, ui_before);
        assert_eq!(data, data_before);
        assert_eq!(errors, errors_before);
    }

    #[test]
    fn test_json_view_shape() {
        let view = render(&ui(), &schema(), None, None);
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["node"], "layout");
        assert_eq!(value["children"][1]["node"], "field");
        assert_eq!(value["children"][1]["name"], "title");
        assert_eq!(value["children"][1]["input"]["input"], "text");
        assert_eq!(value["children"][1]["input"]["kind"], "text");
    }
}
