//! Formwork Schemas - schema-driven form decoding, validation and rendering
//!
//! This crate turns a JSON-Schema-like document and a separate UI schema
//! (layout tree) into:
//! - **Decoded data**: flat form submissions (`attendees[0].email=...`)
//!   decoded into nested, typed values
//! - **Validation errors**: a field path to message map covering required
//!   fields, per-type constraints, formats, and cross-field rules
//! - **Form views**: a rendered tree (and HTML fragment) with pre-filled
//!   values and inline errors
//! - **Metadata**: a documentation summary of a raw schema document
//!
//! ## Quick Start
//!
//! ```rust
//! use formwork_schemas::{decode, render, validate, Schema, UiSchema};
//! use serde_json::json;
//! use std::collections::BTreeMap;
//!
//! let schema = Schema::from_value(&json!({
//!     "type": "object",
//!     "properties": {
//!         "start": {"type": "string", "format": "datetime-local"},
//!         "end": {"type": "string", "format": "datetime-local"}
//!     },
//!     "required": ["start"],
//!     "x-cross-field-rules": {
//!         "endAfterStart": {"fields": ["end", "start"], "message": "End must be after start"}
//!     }
//! })).unwrap();
//!
//! let mut submission = BTreeMap::new();
//! submission.insert("start", vec!["2025-10-28T11:00".to_string()]);
//! submission.insert("end", vec!["2025-10-28T10:00".to_string()]);
//!
//! let data = decode(submission);
//! let errors = validate(&data, &schema);
//! assert_eq!(errors.get("end"), Some("End must be after start"));
//!
//! let ui = UiSchema::from_value(&json!({
//!     "type": "VerticalLayout",
//!     "elements": [
//!         {"type": "Control", "scope": "#/properties/start"},
//!         {"type": "Control", "scope": "#/properties/end"}
//!     ]
//! })).unwrap();
//! let html = render(&ui, &schema, Some(&data), Some(&errors)).to_html();
//! assert!(html.contains("End must be after start"));
//! ```
//!
//! ## Loading and caching
//!
//! [`loader::SchemaRegistry`] resolves `namespace/name` identifiers to
//! JSON or YAML documents and keeps one compiled model per identifier for
//! the life of the registry. Concurrent first loads of the same
//! identifier parse the document once.
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

pub mod codec;
pub mod loader;
pub mod metadata;
pub mod model;
pub mod render;
pub mod ui;
pub mod validation;

// Re-export commonly used types for convenience
pub use codec::{decode, lookup, FieldPath, FormData, FormNumber, FormValue};
pub use loader::{DocumentKey, LoaderError, LoaderResult, SchemaRegistry};
pub use metadata::{extract_metadata, SchemaMetadata};
pub use model::{CrossFieldRule, ModelError, Property, PropertyKind, RuleKind, Schema};
pub use render::{render, FormView, Renderer, RendererConfig};
pub use ui::{Control, Element, UiSchema};
pub use validation::{validate, ValidationErrors, ValidationMode, Validator, ValidatorConfig};
