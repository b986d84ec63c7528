//! Path codec: flat key/value submissions to nested, typed data
//!
//! Keys follow a small path grammar evaluated left to right:
//! - `field` - top-level leaf
//! - `field.sub` - nested object member
//! - `field[n]` - array element, the array grows to make `n` addressable
//! - `field[n].sub` - member of an object stored in an array
//!
//! Leaf strings are coerced (`true`/`false` to booleans, decimal literals
//! to numbers) independently of any schema; reconciling declared types is
//! the validator's job.
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

pub mod path;
pub mod value;

pub use path::{FieldPath, PathError, PathSegment, MAX_ARRAY_INDEX, MAX_PATH_DEPTH};
pub use value::{FormData, FormNumber, FormValue};

use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Decode raw submission pairs into nested data.
///
/// Only the first value of each key is used; keys with no values are
/// skipped. Keys are applied in sorted order so the result does not
/// depend on the iteration order of the host's map.
///
/// # Examples
///
/// ```rust
/// use formwork_schemas::codec::{decode, FormValue};
/// use std::collections::HashMap;
///
/// let mut raw = HashMap::new();
/// raw.insert("attendees[1].email".to_string(), vec!["b@example.com".to_string()]);
/// raw.insert("count".to_string(), vec!["2".to_string()]);
///
/// let data = decode(&raw);
/// assert_eq!(data.lookup("count").and_then(FormValue::as_f64), Some(2.0));
/// assert_eq!(
///     data.lookup("attendees[1].email").and_then(FormValue::as_str),
///     Some("b@example.com")
/// );
/// ```
pub fn decode<I, K, V>(pairs: I) -> FormData
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[String]>,
{
    let mut entries: Vec<(String, String)> = pairs
        .into_iter()
        .filter_map(|(key, values)| {
            values
                .as_ref()
                .first()
                .map(|first| (key.as_ref().to_string(), first.clone()))
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut root = FormValue::Object(BTreeMap::new());
    for (key, raw) in &entries {
        let path = FieldPath::parse_or_literal(key);
        trace!(key = %key, path = %path, "decoding submitted field");
        place(&mut root, path.segments(), FormValue::coerce(raw));
    }

    let fields = match root {
        FormValue::Object(fields) => fields,
        _ => BTreeMap::new(),
    };
    debug!(keys = entries.len(), fields = fields.len(), "decoded submission");
    FormData::from_fields(fields)
}

/// Resolve a path against decoded data.
///
/// Absent segments, or segments that run into a value of the wrong
/// shape, resolve to `None` rather than an error.
pub fn lookup<'a>(data: &'a FormData, path: &str) -> Option<&'a FormValue> {
    data.lookup(path)
}

fn place(slot: &mut FormValue, segments: &[PathSegment], leaf: FormValue) {
    let Some((segment, rest)) = segments.split_first() else {
        *slot = leaf;
        return;
    };

    match segment {
        PathSegment::Key(key) => {
            if !matches!(slot, FormValue::Object(_)) {
                *slot = FormValue::Object(BTreeMap::new());
            }
            if let FormValue::Object(map) = slot {
                let child = map.entry(key.clone()).or_insert_with(FormValue::placeholder);
                place(child, rest, leaf);
            }
        }
        PathSegment::Index(index) => {
            if !matches!(slot, FormValue::Array(_)) {
                *slot = FormValue::Array(Vec::new());
            }
            if let FormValue::Array(items) = slot {
                if items.len() <= *index {
                    items.resize_with(index + 1, FormValue::placeholder);
                }
                place(&mut items[*index], rest, leaf);
            }
        }
    }
}
