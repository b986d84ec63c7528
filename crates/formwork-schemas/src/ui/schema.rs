//! UI schema layout tree
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix every control scope must carry
pub const SCOPE_PREFIX: &str = "#/properties/";

/// Rendering hints attached to a control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlOptions {
    pub placeholder: Option<String>,
    /// Render a string as a multi-line text area
    pub multi: bool,
    /// Overrides the property's declared format
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_label: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ControlOptions {
    pub fn show_label(&self) -> bool {
        self.show_label.unwrap_or(true)
    }
}

/// A leaf bound to one schema property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub options: ControlOptions,
}

impl Control {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            label: None,
            description: None,
            options: ControlOptions::default(),
        }
    }

    /// Control for a top-level property name
    pub fn for_property(name: &str) -> Self {
        Self::new(format!("{}{}", SCOPE_PREFIX, name))
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_options(mut self, options: ControlOptions) -> Self {
        self.options = options;
        self
    }

    /// Property named by the scope. Only single-level scopes resolve.
    pub fn property_name(&self) -> Option<&str> {
        self.scope
            .strip_prefix(SCOPE_PREFIX)
            .filter(|name| !name.is_empty() && !name.contains('/'))
    }
}

/// A node of the layout tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    VerticalLayout {
        #[serde(default)]
        elements: Vec<Element>,
    },
    /// Children are placed side by side
    HorizontalLayout {
        #[serde(default)]
        elements: Vec<Element>,
    },
    Group {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default)]
        elements: Vec<Element>,
    },
    Label {
        text: String,
    },
    Control(Control),
}

impl Element {
    /// Child elements of a container; empty for leaves
    pub fn children(&self) -> &[Element] {
        match self {
            Element::VerticalLayout { elements }
            | Element::HorizontalLayout { elements }
            | Element::Group { elements, .. } => elements,
            Element::Label { .. } | Element::Control(_) => &[],
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Element::VerticalLayout { .. } | Element::HorizontalLayout { .. } | Element::Group { .. }
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Element::VerticalLayout { .. } => "VerticalLayout",
            Element::HorizontalLayout { .. } => "HorizontalLayout",
            Element::Group { .. } => "Group",
            Element::Label { .. } => "Label",
            Element::Control(_) => "Control",
        }
    }
}

/// A parsed UI schema: a layout tree rooted at a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UiSchema {
    root: Element,
}

impl UiSchema {
    /// Wrap a root element, which must be a layout or a group
    pub fn new(root: Element) -> ModelResult<Self> {
        if !root.is_container() {
            return Err(ModelError::invalid_ui(format!(
                "root element must be a layout or group, found {}",
                root.type_name()
            )));
        }
        Ok(Self { root })
    }

    pub fn from_value(document: &Value) -> ModelResult<Self> {
        let root: Element = serde_json::from_value(document.clone())
            .map_err(|e| ModelError::invalid_ui(e.to_string()))?;
        Self::new(root)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All controls in document order
    pub fn controls(&self) -> Vec<&Control> {
        let mut found = Vec::new();
        collect_controls(&self.root, &mut found);
        found
    }
}

fn collect_controls<'a>(element: &'a Element, found: &mut Vec<&'a Control>) {
    match element {
        Element::Control(control) => found.push(control),
        other => {
            for child in other.children() {
                collect_controls(child, found);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_layout_tree() {
        let ui = UiSchema::from_value(&json!({
            "type": "VerticalLayout",
            "elements": [
                {"type": "Label", "text": "New event"},
                {"type": "HorizontalLayout", "elements": [
                    {"type": "Control", "scope": "#/properties/start"},
                    {"type": "Control", "scope": "#/properties/end", "label": "Ends"}
                ]},
                {"type": "Group", "title": "Details", "elements": [
                    {"type": "Control", "scope": "#/properties/notes",
                     "options": {"multi": true, "placeholder": "Anything else?", "showLabel": false}}
                ]}
            ]
        }))
        .unwrap();

        let controls = ui.controls();
        assert_eq!(controls.len(), 3);
        assert_eq!(controls[0].property_name(), Some("start"));
        assert_eq!(controls[1].label.as_deref(), Some("Ends"));
        assert!(controls[2].options.multi);
        assert!(!controls[2].options.show_label());
        assert!(controls[0].options.show_label());
    }

    #[test]
    fn test_root_must_be_container() {
        let err = UiSchema::from_value(&json!({"type": "Label", "text": "alone"})).unwrap_err();
        assert!(matches!(err, ModelError::InvalidUiSchema { .. }));

        let err = UiSchema::from_value(&json!({"type": "Carousel", "elements": []})).unwrap_err();
        assert!(matches!(err, ModelError::InvalidUiSchema { .. }));
    }

    #[test]
    fn test_scope_resolution() {
        assert_eq!(Control::for_property("title").property_name(), Some("title"));
        assert_eq!(Control::new("#/properties/a/properties/b").property_name(), None);
        assert_eq!(Control::new("title").property_name(), None);
        assert_eq!(Control::new("#/properties/").property_name(), None);
    }
}
