//! Rendered form view tree
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use serde::Serialize;
use std::fmt;

/// Concrete input chosen for a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    Select,
    TextArea,
    Checkbox,
    Number,
    Text,
    Email,
    Url,
    Date,
    DateTimeLocal,
    Time,
    Object,
    Repeater,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Select => "select",
            InputKind::TextArea => "textarea",
            InputKind::Checkbox => "checkbox",
            InputKind::Number => "number",
            InputKind::Text => "text",
            InputKind::Email => "email",
            InputKind::Url => "url",
            InputKind::Date => "date",
            InputKind::DateTimeLocal => "datetime-local",
            InputKind::Time => "time",
            InputKind::Object => "object",
            InputKind::Repeater => "repeater",
        }
    }

    /// Text-like kind for a format keyword. `date-time` carries an
    /// offset no browser picker accepts, so it stays plain text.
    pub fn for_format(format: &str) -> Option<Self> {
        match format {
            "email" => Some(InputKind::Email),
            "uri" | "url" => Some(InputKind::Url),
            "date" => Some(InputKind::Date),
            "datetime-local" => Some(InputKind::DateTimeLocal),
            "time" => Some(InputKind::Time),
            _ => None,
        }
    }

    pub fn is_text_like(&self) -> bool {
        matches!(
            self,
            InputKind::Text
                | InputKind::Email
                | InputKind::Url
                | InputKind::Date
                | InputKind::DateTimeLocal
                | InputKind::Time
        )
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

/// One instance of a repeating group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeaterItem {
    pub index: usize,
    pub fields: Vec<FieldView>,
}

/// Input widget with its pre-filled state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "input", rename_all = "camelCase")]
pub enum InputView {
    Select {
        options: Vec<SelectOption>,
    },
    TextArea {
        value: String,
        placeholder: Option<String>,
    },
    Checkbox {
        checked: bool,
    },
    Number {
        value: String,
        min: Option<f64>,
        max: Option<f64>,
        integer: bool,
        placeholder: Option<String>,
    },
    /// Single-line input; `kind` is one of the text-like kinds
    Text {
        kind: InputKind,
        value: String,
        placeholder: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        suggestions: Vec<String>,
    },
    Object {
        fields: Vec<FieldView>,
    },
    Repeater {
        /// Item fields with the index placeholder in their names
        template: Vec<FieldView>,
        items: Vec<RepeaterItem>,
        placeholder: String,
    },
}

impl InputView {
    pub fn kind(&self) -> InputKind {
        match self {
            InputView::Select { .. } => InputKind::Select,
            InputView::TextArea { .. } => InputKind::TextArea,
            InputView::Checkbox { .. } => InputKind::Checkbox,
            InputView::Number { .. } => InputKind::Number,
            InputView::Text { kind, .. } => *kind,
            InputView::Object { .. } => InputKind::Object,
            InputView::Repeater { .. } => InputKind::Repeater,
        }
    }

    /// Current value for scalar inputs
    pub fn value(&self) -> Option<&str> {
        match self {
            InputView::TextArea { value, .. }
            | InputView::Number { value, .. }
            | InputView::Text { value, .. } => Some(value),
            InputView::Select { options } => options
                .iter()
                .find(|option| option.selected)
                .map(|option| option.value.as_str()),
            _ => None,
        }
    }
}

/// A control resolved against its property
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    /// Canonical field path, also the submitted input name
    pub name: String,
    pub label: String,
    pub show_label: bool,
    pub description: Option<String>,
    pub required: bool,
    pub error: Option<String>,
    pub depth: usize,
    pub input: InputView,
}

impl FieldView {
    /// Nested field views (object members and repeater instances)
    fn children(&self) -> Box<dyn Iterator<Item = &FieldView> + '_> {
        match &self.input {
            InputView::Object { fields } => Box::new(fields.iter()),
            InputView::Repeater { items, .. } => {
                Box::new(items.iter().flat_map(|item| item.fields.iter()))
            }
            _ => Box::new(std::iter::empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum ViewNode {
    Layout {
        direction: Direction,
        depth: usize,
        children: Vec<ViewNode>,
    },
    Group {
        title: Option<String>,
        depth: usize,
        children: Vec<ViewNode>,
    },
    Label {
        text: String,
        depth: usize,
    },
    Field(FieldView),
    /// Diagnostic left in place of a control whose scope does not resolve
    Unresolved {
        scope: String,
        message: String,
        depth: usize,
    },
}

impl ViewNode {
    pub fn children(&self) -> &[ViewNode] {
        match self {
            ViewNode::Layout { children, .. } | ViewNode::Group { children, .. } => children,
            _ => &[],
        }
    }
}

/// Result of rendering a UI schema
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormView {
    root: ViewNode,
}

impl FormView {
    pub(crate) fn new(root: ViewNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &ViewNode {
        &self.root
    }

    /// Every field view, depth first, including object members and
    /// repeater instances (templates excluded)
    pub fn fields(&self) -> Vec<&FieldView> {
        let mut found = Vec::new();
        collect_nodes(&self.root, &mut found);
        found
    }

    /// Field view by canonical path
    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields().into_iter().find(|field| field.name == name)
    }

    /// Scopes that could not be resolved
    pub fn unresolved(&self) -> Vec<&str> {
        let mut found = Vec::new();
        collect_unresolved(&self.root, &mut found);
        found
    }
}

fn collect_nodes<'a>(node: &'a ViewNode, found: &mut Vec<&'a FieldView>) {
    match node {
        ViewNode::Field(field) => collect_field(field, found),
        other => {
            for child in other.children() {
                collect_nodes(child, found);
            }
        }
    }
}

fn collect_field<'a>(field: &'a FieldView, found: &mut Vec<&'a FieldView>) {
    found.push(field);
    for child in field.children() {
        collect_field(child, found);
    }
}

fn collect_unresolved<'a>(node: &'a ViewNode, found: &mut Vec<&'a str>) {
    match node {
        ViewNode::Unresolved { scope, .. } => found.push(scope),
        other => {
            for child in other.children() {
                collect_unresolved(child, found);
            }
        }
    }
}
