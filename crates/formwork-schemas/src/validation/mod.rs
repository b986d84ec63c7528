//! Validation of decoded submissions against a schema
//!
//! Validation never fails as a whole: every violation is collected into
//! a [`ValidationErrors`] map keyed by field path, so one submission can
//! report all of its problems at once.
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod formats;
pub mod rules;
pub mod validator;

pub use error::{FieldResult, ValidationErrors, REQUIRED_MESSAGE};
pub use formats::{check_format, StringFormat};
pub use rules::compare_values;
pub use validator::{
    validate_boolean, validate_number, validate_string, ValidationContext, ValidationMode,
    Validator, ValidatorConfig,
};

use crate::codec::FormData;
use crate::model::Schema;

/// Validate `data` against `schema` with the default (shallow) settings.
///
/// # Examples
///
/// ```rust
/// use formwork_schemas::codec::FormData;
/// use formwork_schemas::model::Schema;
/// use formwork_schemas::validation::validate;
/// use serde_json::json;
///
/// let schema = Schema::from_value(&json!({
///     "properties": {"title": {"type": "string"}},
///     "required": ["title"]
/// })).unwrap();
///
/// let errors = validate(&FormData::new(), &schema);
/// assert_eq!(errors.get("title"), Some("This field is required"));
/// ```
pub fn validate(data: &FormData, schema: &Schema) -> ValidationErrors {
    Validator::new(schema).validate(data)
}
