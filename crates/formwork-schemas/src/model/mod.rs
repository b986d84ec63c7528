//! Schema model: properties, required fields, and cross-field rules
//!
//! A schema document is parsed once into these types and then shared,
//! read-only, by the validator, the renderer, and the loader cache.
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod schema;

pub use error::{ModelError, ModelResult};
pub use schema::{CrossFieldRule, Property, PropertyKind, RuleKind, Schema, CROSS_FIELD_RULES_KEY};
