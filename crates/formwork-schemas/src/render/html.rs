//! HTML fragment output for rendered forms
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::render::view::{Direction, FieldView, FormView, InputView, RepeaterItem, ViewNode};
use std::borrow::Cow;
use std::fmt::{self, Write};

/// Escape text for element content and double-quoted attributes
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Element id derived from a field path.
///
/// ASCII letters, digits and `_` pass through; every other byte becomes
/// `-` plus two hex digits, so distinct paths never share an id.
fn field_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len() + 8);
    id.push_str("fw-");
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' {
            id.push(byte as char);
        } else {
            id.push_str(&format!("-{:02x}", byte));
        }
    }
    id
}

impl FormView {
    /// Serialise as an HTML fragment
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self.root())
    }
}

fn write_node(out: &mut impl Write, node: &ViewNode) -> fmt::Result {
    match node {
        ViewNode::Layout {
            direction, children, ..
        } => {
            let class = match direction {
                Direction::Vertical => "fw-layout fw-vertical",
                Direction::Horizontal => "fw-layout fw-horizontal",
            };
            writeln!(out, "<div class=\"{}\">", class)?;
            for child in children {
                write_node(out, child)?;
            }
            writeln!(out, "</div>")
        }
        ViewNode::Group { title, children, .. } => {
            writeln!(out, "<fieldset class=\"fw-group\">")?;
            if let Some(title) = title {
                writeln!(out, "<legend>{}</legend>", escape_html(title))?;
            }
            for child in children {
                write_node(out, child)?;
            }
            writeln!(out, "</fieldset>")
        }
        ViewNode::Label { text, .. } => writeln!(out, "<p class=\"fw-label\">{}</p>", escape_html(text)),
        ViewNode::Field(field) => write_field(out, field),
        ViewNode::Unresolved { scope, message, .. } => writeln!(
            out,
            "<div class=\"fw-unresolved\" data-scope=\"{}\">{}</div>",
            escape_html(scope),
            escape_html(message)
        ),
    }
}

fn write_field(out: &mut impl Write, field: &FieldView) -> fmt::Result {
    let id = field_id(&field.name);
    let mut class = String::from("fw-field");
    if field.required {
        class.push_str(" fw-required");
    }
    if field.error.is_some() {
        class.push_str(" fw-invalid");
    }

    writeln!(out, "<div class=\"{}\">", class)?;
    if field.show_label {
        write!(out, "<label for=\"{}\">{}", id, escape_html(&field.label))?;
        if field.required {
            write!(out, "<span class=\"fw-required-marker\">*</span>")?;
        }
        writeln!(out, "</label>")?;
    }
    write_input(out, field, &id)?;
    if let Some(description) = &field.description {
        writeln!(out, "<small class=\"fw-description\">{}</small>", escape_html(description))?;
    }
    if let Some(error) = &field.error {
        writeln!(out, "<p class=\"fw-error\">{}</p>", escape_html(error))?;
    }
    writeln!(out, "</div>")
}

fn write_input(out: &mut impl Write, field: &FieldView, id: &str) -> fmt::Result {
    let name = escape_html(&field.name);
    let required = if field.required { " required" } else { "" };

    match &field.input {
        InputView::Select { options } => {
            writeln!(out, "<select id=\"{}\" name=\"{}\"{}>", id, name, required)?;
            writeln!(out, "<option value=\"\"></option>")?;
            for option in options {
                let value = escape_html(&option.value);
                let selected = if option.selected { " selected" } else { "" };
                writeln!(out, "<option value=\"{}\"{}>{}</option>", value, selected, value)?;
            }
            writeln!(out, "</select>")
        }
        InputView::TextArea { value, placeholder } => {
            write!(out, "<textarea id=\"{}\" name=\"{}\"", id, name)?;
            write_placeholder(out, placeholder.as_deref())?;
            writeln!(out, "{}>{}</textarea>", required, escape_html(value))
        }
        InputView::Checkbox { checked } => {
            let checked = if *checked { " checked" } else { "" };
            writeln!(
                out,
                "<input type=\"checkbox\" id=\"{}\" name=\"{}\" value=\"true\"{}>",
                id, name, checked
            )
        }
        InputView::Number {
            value,
            min,
            max,
            integer,
            placeholder,
        } => {
            write!(
                out,
                "<input type=\"number\" id=\"{}\" name=\"{}\" value=\"{}\"",
                id,
                name,
                escape_html(value)
            )?;
            if let Some(min) = min {
                write!(out, " min=\"{}\"", min)?;
            }
            if let Some(max) = max {
                write!(out, " max=\"{}\"", max)?;
            }
            write!(out, " step=\"{}\"", if *integer { "1" } else { "any" })?;
            write_placeholder(out, placeholder.as_deref())?;
            writeln!(out, "{}>", required)
        }
        InputView::Text {
            kind,
            value,
            placeholder,
            suggestions,
        } => {
            write!(
                out,
                "<input type=\"{}\" id=\"{}\" name=\"{}\" value=\"{}\"",
                kind,
                id,
                name,
                escape_html(value)
            )?;
            write_placeholder(out, placeholder.as_deref())?;
            if !suggestions.is_empty() {
                write!(out, " list=\"{}-suggestions\"", id)?;
            }
            writeln!(out, "{}>", required)?;
            if !suggestions.is_empty() {
                writeln!(out, "<datalist id=\"{}-suggestions\">", id)?;
                for suggestion in suggestions {
                    writeln!(out, "<option value=\"{}\"></option>", escape_html(suggestion))?;
                }
                writeln!(out, "</datalist>")?;
            }
            Ok(())
        }
        InputView::Object { fields } => {
            writeln!(out, "<div class=\"fw-object\" id=\"{}\">", id)?;
            for member in fields {
                write_field(out, member)?;
            }
            writeln!(out, "</div>")
        }
        InputView::Repeater {
            template,
            items,
            placeholder,
        } => {
            writeln!(
                out,
                "<div class=\"fw-repeater\" id=\"{}\" data-name=\"{}\" data-placeholder=\"{}\">",
                id,
                name,
                escape_html(placeholder)
            )?;
            for item in items {
                write_instance(out, item)?;
            }
            writeln!(out, "<template class=\"fw-repeater-template\">")?;
            writeln!(out, "<div class=\"fw-repeater-item\">")?;
            for member in template {
                write_field(out, member)?;
            }
            writeln!(out, "<button type=\"button\" class=\"fw-remove\">Remove</button>")?;
            writeln!(out, "</div>")?;
            writeln!(out, "</template>")?;
            writeln!(out, "<button type=\"button\" class=\"fw-add\">Add</button>")?;
            writeln!(out, "</div>")
        }
    }
}

fn write_instance(out: &mut impl Write, item: &RepeaterItem) -> fmt::Result {
    writeln!(out, "<div class=\"fw-repeater-item\" data-index=\"{}\">", item.index)?;
    for member in &item.fields {
        write_field(out, member)?;
    }
    writeln!(out, "<button type=\"button\" class=\"fw-remove\">Remove</button>")?;
    writeln!(out, "</div>")
}

fn write_placeholder(out: &mut impl Write, placeholder: Option<&str>) -> fmt::Result {
    match placeholder {
        Some(text) => write!(out, " placeholder=\"{}\"", escape_html(text)),
        None => Ok(()),
    }
}
