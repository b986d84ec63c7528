//! Form rendering: UI schema + schema + data + errors to a form view
//!
//! Rendering never fails. A control whose scope does not resolve becomes
//! an inline diagnostic node and its siblings render normally.
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

pub mod html;
pub mod renderer;
pub mod view;

pub use html::escape_html;
pub use renderer::{choose_input_kind, Renderer, RendererConfig};
pub use view::{
    Direction, FieldView, FormView, InputKind, InputView, RepeaterItem, SelectOption, ViewNode,
};

use crate::codec::FormData;
use crate::model::Schema;
use crate::ui::UiSchema;
use crate::validation::ValidationErrors;

/// Render with default settings
///
/// # Examples
///
/// ```rust
/// use formwork_schemas::model::Schema;
/// use formwork_schemas::render::{render, InputKind};
/// use formwork_schemas::ui::UiSchema;
/// use serde_json::json;
///
/// let schema = Schema::from_value(&json!({
///     "properties": {"email": {"type": "string", "format": "email", "title": "Email"}},
///     "required": ["email"]
/// })).unwrap();
/// let ui = UiSchema::from_value(&json!({
///     "type": "VerticalLayout",
///     "elements": [{"type": "Control", "scope": "#/properties/email"}]
/// })).unwrap();
///
/// let view = render(&ui, &schema, None, None);
/// let field = view.field("email").unwrap();
/// assert_eq!(field.input.kind(), InputKind::Email);
/// assert!(field.required);
/// assert!(view.to_html().contains("type=\"email\""));
/// ```
pub fn render(
    ui: &UiSchema,
    schema: &Schema,
    data: Option<&FormData>,
    errors: Option<&ValidationErrors>,
) -> FormView {
    Renderer::new(schema).render(ui, data, errors)
}
