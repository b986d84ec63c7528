//! Cross-field rule evaluation
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::codec::{FormData, FormValue};
use crate::model::{CrossFieldRule, Schema};
use crate::validation::error::ValidationErrors;
use crate::validation::formats::{parse_date, parse_datetime_local, parse_time};
use chrono::DateTime;
use std::cmp::Ordering;
use tracing::trace;

/// Order two submitted values.
///
/// Numbers compare numerically, then both operands are tried as
/// RFC 3339 timestamps, local date-times, dates, and times (both must
/// parse with the same layout), and finally as plain text. Arrays and
/// objects are incomparable.
pub fn compare_values(left: &FormValue, right: &FormValue) -> Option<Ordering> {
    if !left.is_scalar() || !right.is_scalar() {
        return None;
    }

    if let (Some(a), Some(b)) = (numeric(left), numeric(right)) {
        return a.partial_cmp(&b);
    }

    let a = left.text()?;
    let b = right.text()?;
    let (a, b) = (a.trim(), b.trim());

    if let (Ok(x), Ok(y)) = (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (parse_datetime_local(a), parse_datetime_local(b)) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (parse_date(a), parse_date(b)) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (parse_time(a), parse_time(b)) {
        return Some(x.cmp(&y));
    }
    Some(a.cmp(b))
}

// Booleans are scalars but never numbers
fn numeric(value: &FormValue) -> Option<f64> {
    match value {
        FormValue::Bool(_) => None,
        other => other.as_f64(),
    }
}

/// Evaluate one rule, recording failures into `errors`.
///
/// Every listed field is looked up first. A missing or blank field that
/// is required at the top level gets the required message and the rule
/// is not compared; a missing or blank optional field skips the rule.
/// Otherwise the first two fields are compared and `rule.message` is
/// recorded against the first field on failure.
pub fn check_rule(
    name: &str,
    rule: &CrossFieldRule,
    data: &FormData,
    schema: &Schema,
    errors: &mut ValidationErrors,
) {
    let mut operands = Vec::with_capacity(rule.fields.len());
    let mut skip = false;

    for field in &rule.fields {
        match data.lookup(field) {
            Some(value) if !value.is_blank() => operands.push(value),
            _ => {
                if schema.is_required(field) {
                    errors.insert_required(field.as_str());
                }
                skip = true;
            }
        }
    }

    if skip {
        trace!(rule = %name, "cross-field rule skipped: operand missing");
        return;
    }

    let satisfied = match (operands.first(), operands.get(1)) {
        (Some(first), Some(second)) => compare_values(first, second)
            .map(|ordering| rule.kind.accepts(ordering))
            .unwrap_or(false),
        _ => true,
    };

    if !satisfied {
        trace!(rule = %name, field = %rule.target(), "cross-field rule failed");
        errors.insert(rule.target(), rule.message.as_str());
    }
}
