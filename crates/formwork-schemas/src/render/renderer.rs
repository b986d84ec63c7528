//! Walks a UI schema together with its schema, data and errors
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::codec::{FormData, FormValue};
use crate::model::{Property, PropertyKind, Schema};
use crate::render::view::{
    Direction, FieldView, FormView, InputKind, InputView, RepeaterItem, SelectOption, ViewNode,
};
use crate::ui::{Control, ControlOptions, Element, UiSchema};
use crate::validation::ValidationErrors;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Renderer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Index written into repeater template names, e.g. `items[__index__]`
    pub index_placeholder: String,
    /// Instances rendered for an array with no submitted items
    pub empty_array_instances: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            index_placeholder: "__index__".to_string(),
            empty_array_instances: 1,
        }
    }
}

/// Pick the input for a property: the first matching rule wins.
///
/// `allow_repeater` is false inside a repeater, where nested arrays fall
/// back to a plain text input.
pub fn choose_input_kind(
    property: &Property,
    options: &ControlOptions,
    allow_repeater: bool,
) -> InputKind {
    let is_string = property.kind == PropertyKind::String;
    if is_string && property.enum_values.is_some() {
        return InputKind::Select;
    }
    if is_string && options.multi {
        return InputKind::TextArea;
    }
    match property.kind {
        PropertyKind::Boolean => InputKind::Checkbox,
        PropertyKind::Integer | PropertyKind::Number => InputKind::Number,
        PropertyKind::String => options
            .format
            .as_deref()
            .or(property.format.as_deref())
            .and_then(InputKind::for_format)
            .unwrap_or(InputKind::Text),
        PropertyKind::Array if allow_repeater => InputKind::Repeater,
        PropertyKind::Array => InputKind::Text,
        PropertyKind::Object => InputKind::Object,
    }
}

/// Renders UI schemas against one schema
#[derive(Debug, Clone)]
pub struct Renderer<'s> {
    schema: &'s Schema,
    config: RendererConfig,
}

impl<'s> Renderer<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self::with_config(schema, RendererConfig::default())
    }

    pub fn with_config(schema: &'s Schema, config: RendererConfig) -> Self {
        Self { schema, config }
    }

    /// Render `ui`, pre-filling from `data` and attaching `errors`.
    ///
    /// Inputs are never modified; identical inputs give identical views.
    pub fn render(
        &self,
        ui: &UiSchema,
        data: Option<&FormData>,
        errors: Option<&ValidationErrors>,
    ) -> FormView {
        let pass = RenderPass {
            schema: self.schema,
            config: &self.config,
            data,
            errors,
        };
        let view = FormView::new(pass.element(ui.root(), 0));
        debug!(
            fields = view.fields().len(),
            unresolved = view.unresolved().len(),
            "rendered form"
        );
        view
    }
}

/// A field about to be rendered
struct Slot<'p> {
    path: String,
    property: &'p Property,
    label: String,
    description: Option<String>,
    required: bool,
    depth: usize,
    /// False for repeater templates, which never carry data or errors
    live: bool,
    allow_repeater: bool,
}

struct RenderPass<'a> {
    schema: &'a Schema,
    config: &'a RendererConfig,
    data: Option<&'a FormData>,
    errors: Option<&'a ValidationErrors>,
}

impl RenderPass<'_> {
    fn element(&self, element: &Element, depth: usize) -> ViewNode {
        match element {
            Element::VerticalLayout { elements } => ViewNode::Layout {
                direction: Direction::Vertical,
                depth,
                children: self.children(elements, depth),
            },
            Element::HorizontalLayout { elements } => ViewNode::Layout {
                direction: Direction::Horizontal,
                depth,
                children: self.children(elements, depth),
            },
            Element::Group { title, elements } => ViewNode::Group {
                title: title.clone(),
                depth,
                children: self.children(elements, depth),
            },
            Element::Label { text } => ViewNode::Label {
                text: text.clone(),
                depth,
            },
            Element::Control(control) => self.control(control, depth),
        }
    }

    fn children(&self, elements: &[Element], depth: usize) -> Vec<ViewNode> {
        elements
            .iter()
            .map(|child| self.element(child, depth + 1))
            .collect()
    }

    fn control(&self, control: &Control, depth: usize) -> ViewNode {
        let Some(name) = control.property_name() else {
            return unresolved(control, "scope must have the form #/properties/<name>", depth);
        };
        let Some(property) = self.schema.property(name) else {
            return unresolved(control, &format!("unknown property '{}'", name), depth);
        };

        let slot = Slot {
            path: name.to_string(),
            property,
            label: control
                .label
                .clone()
                .unwrap_or_else(|| property.label_or(name).to_string()),
            description: control
                .description
                .clone()
                .or_else(|| property.description.clone()),
            required: self.schema.is_required(name),
            depth,
            live: true,
            allow_repeater: true,
        };
        let mut field = self.field(slot, &control.options);
        field.show_label = control.options.show_label();
        ViewNode::Field(field)
    }

    fn field(&self, slot: Slot<'_>, options: &ControlOptions) -> FieldView {
        let submitted = if slot.live {
            self.data.and_then(|data| data.lookup(&slot.path)).cloned()
        } else {
            None
        };
        let current = submitted
            .or_else(|| slot.property.default.as_ref().and_then(FormValue::from_json));

        let error = if slot.live {
            self.errors
                .and_then(|errors| errors.get(&slot.path))
                .map(String::from)
        } else {
            None
        };

        let kind = choose_input_kind(slot.property, options, slot.allow_repeater);
        let input = self.input(kind, &slot, options, current.as_ref());

        FieldView {
            name: slot.path,
            label: slot.label,
            show_label: true,
            description: slot.description,
            required: slot.required,
            error,
            depth: slot.depth,
            input,
        }
    }

    fn input(
        &self,
        kind: InputKind,
        slot: &Slot<'_>,
        options: &ControlOptions,
        current: Option<&FormValue>,
    ) -> InputView {
        let property = slot.property;
        let value = current
            .and_then(FormValue::text)
            .map(|text| text.into_owned())
            .unwrap_or_default();
        let placeholder = options
            .placeholder
            .clone()
            .or_else(|| property.examples.first().cloned());

        match kind {
            InputKind::Select => InputView::Select {
                options: property
                    .enum_values
                    .iter()
                    .flatten()
                    .map(|candidate| SelectOption {
                        selected: *candidate == value,
                        value: candidate.clone(),
                    })
                    .collect(),
            },
            InputKind::TextArea => InputView::TextArea { value, placeholder },
            InputKind::Checkbox => InputView::Checkbox {
                checked: matches!(current, Some(FormValue::Bool(true)))
                    || matches!(value.as_str(), "on" | "true"),
            },
            InputKind::Number => InputView::Number {
                value,
                min: property.minimum,
                max: property.maximum,
                integer: property.kind == PropertyKind::Integer,
                placeholder,
            },
            InputKind::Object => InputView::Object {
                fields: self.members(&slot.path, property, slot.depth + 1, slot.live, slot.allow_repeater),
            },
            InputKind::Repeater => self.repeater(slot, current),
            text_kind => InputView::Text {
                kind: text_kind,
                value,
                placeholder,
                suggestions: options.suggestions.clone(),
            },
        }
    }

    /// One field per member of an object property
    fn members(
        &self,
        prefix: &str,
        property: &Property,
        depth: usize,
        live: bool,
        allow_repeater: bool,
    ) -> Vec<FieldView> {
        let Some(members) = &property.properties else {
            return Vec::new();
        };
        members
            .iter()
            .map(|(name, member)| {
                let slot = Slot {
                    path: format!("{}.{}", prefix, name),
                    property: member,
                    label: member.label_or(name).to_string(),
                    description: member.description.clone(),
                    required: property.required.contains(name),
                    depth,
                    live,
                    allow_repeater,
                };
                self.field(slot, &ControlOptions::default())
            })
            .collect()
    }

    fn repeater(&self, slot: &Slot<'_>, current: Option<&FormValue>) -> InputView {
        let Some(item) = slot.property.items.as_deref() else {
            return InputView::Repeater {
                template: Vec::new(),
                items: Vec::new(),
                placeholder: self.config.index_placeholder.clone(),
            };
        };

        let submitted = current
            .and_then(FormValue::as_array)
            .map(<[FormValue]>::len)
            .unwrap_or(0);
        let count = if submitted == 0 {
            self.config.empty_array_instances
        } else {
            submitted
        };

        let template = self.instance(
            slot,
            item,
            &self.config.index_placeholder,
            false,
        );
        let items = (0..count)
            .map(|index| RepeaterItem {
                index,
                fields: self.instance(slot, item, &index.to_string(), slot.live),
            })
            .collect();

        InputView::Repeater {
            template,
            items,
            placeholder: self.config.index_placeholder.clone(),
        }
    }

    /// Fields of one repeater instance at `array[index]`
    fn instance(&self, slot: &Slot<'_>, item: &Property, index: &str, live: bool) -> Vec<FieldView> {
        let path = format!("{}[{}]", slot.path, index);
        let depth = slot.depth + 1;

        if item.kind == PropertyKind::Object {
            return self.members(&path, item, depth, live, false);
        }

        let instance = Slot {
            path,
            property: item,
            label: item.title.clone().unwrap_or_else(|| slot.label.clone()),
            description: item.description.clone(),
            required: false,
            depth,
            live,
            allow_repeater: false,
        };
        vec![self.field(instance, &ControlOptions::default())]
    }
}

fn unresolved(control: &Control, message: &str, depth: usize) -> ViewNode {
    warn!(scope = %control.scope, "{}", message);
    ViewNode::Unresolved {
        scope: control.scope.clone(),
        message: message.to_string(),
        depth,
    }
}
