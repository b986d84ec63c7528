//! UI schema model: the layout tree a form is rendered from
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

pub mod schema;

pub use schema::{Control, ControlOptions, Element, UiSchema, SCOPE_PREFIX};
