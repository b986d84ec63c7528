//! String format checks (`email`, `uri`, `date`, `datetime-local`, `time`)
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
        )
        .expect("email pattern is valid")
    })
}

/// A string format this engine knows how to check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringFormat {
    Email,
    Uri,
    Date,
    DateTimeLocal,
    DateTime,
    Time,
}

impl StringFormat {
    /// Look up a format keyword. Unknown keywords yield `None` and are
    /// not checked.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "email" => Some(Self::Email),
            "uri" | "url" => Some(Self::Uri),
            "date" => Some(Self::Date),
            "datetime-local" => Some(Self::DateTimeLocal),
            "date-time" => Some(Self::DateTime),
            "time" => Some(Self::Time),
            _ => None,
        }
    }

    pub fn check(&self, value: &str) -> bool {
        match self {
            Self::Email => is_email(value),
            Self::Uri => is_absolute_uri(value),
            Self::Date => parse_date(value).is_some(),
            Self::DateTimeLocal => parse_datetime_local(value).is_some(),
            Self::DateTime => DateTime::parse_from_rfc3339(value).is_ok(),
            Self::Time => parse_time(value).is_some(),
        }
    }

    /// Message reported when `check` fails
    pub fn message(&self) -> &'static str {
        match self {
            Self::Email => "Must be a valid email address",
            Self::Uri => "Must be a valid URL",
            Self::Date => "Must be a valid date (YYYY-MM-DD)",
            Self::DateTimeLocal => "Must be a valid date and time (YYYY-MM-DDTHH:MM)",
            Self::DateTime => "Must be a valid RFC 3339 timestamp",
            Self::Time => "Must be a valid time (HH:MM)",
        }
    }
}

/// Check `value` against `format`; unknown formats always pass
pub fn check_format(format: &str, value: &str) -> Result<(), &'static str> {
    match StringFormat::parse(format) {
        Some(known) if !known.check(value) => Err(known.message()),
        _ => Ok(()),
    }
}

pub fn is_email(value: &str) -> bool {
    value.len() <= 254 && email_regex().is_match(value)
}

pub fn is_absolute_uri(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

/// `YYYY-MM-DD` naming a real calendar day
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if !has_shape(value, "dddd-dd-dd") {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// `YYYY-MM-DDTHH:MM`, optionally with `:SS`
pub fn parse_datetime_local(value: &str) -> Option<NaiveDateTime> {
    if has_shape(value, "dddd-dd-ddTdd:dd") {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").ok()
    } else if has_shape(value, "dddd-dd-ddTdd:dd:dd") {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok()
    } else {
        None
    }
}

/// `HH:MM`, optionally with `:SS`
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    if has_shape(value, "dd:dd") {
        NaiveTime::parse_from_str(value, "%H:%M").ok()
    } else if has_shape(value, "dd:dd:dd") {
        NaiveTime::parse_from_str(value, "%H:%M:%S").ok()
    } else {
        None
    }
}

/// Match `value` against a layout where `d` is any ASCII digit and every
/// other byte must appear literally
fn has_shape(value: &str, layout: &str) -> bool {
    value.len() == layout.len()
        && value.bytes().zip(layout.bytes()).all(|(v, l)| match l {
            b'd' => v.is_ascii_digit(),
            other => v == other,
        })
}
