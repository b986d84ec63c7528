//! Field path grammar: `name`, `a.b`, `items[2]`, `items[2].name`
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::str::FromStr;

/// Largest array index a submitted key may address.
///
/// Keys asking for more are kept as literal field names so a single
/// crafted key cannot force a huge allocation.
pub const MAX_ARRAY_INDEX: usize = 1024;

/// Largest number of segments a submitted key may have.
///
/// Deeper keys are kept as literal field names, like oversized indexes.
pub const MAX_PATH_DEPTH: usize = 32;

/// One step of a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// A parsed field path. Always starts with a key segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

/// Why a path expression was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("empty path expression")]
    Empty,
    #[error("empty segment at byte {0}")]
    EmptySegment(usize),
    #[error("unterminated index at byte {0}")]
    UnterminatedIndex(usize),
    #[error("invalid index '{0}'")]
    InvalidIndex(String),
    #[error("index {0} exceeds the limit of {MAX_ARRAY_INDEX}")]
    IndexTooLarge(usize),
    #[error("path has more than {MAX_PATH_DEPTH} segments")]
    TooDeep,
    #[error("unexpected character '{0}' at byte {1}")]
    Unexpected(char, usize),
}

impl FieldPath {
    /// Parse a path expression
    pub fn parse(expr: &str) -> Result<Self, PathError> {
        if expr.is_empty() {
            return Err(PathError::Empty);
        }

        let bytes = expr.as_bytes();
        let mut segments = Vec::new();
        let mut pos = 0;
        let mut expect_key = true;

        while pos < bytes.len() {
            if segments.len() > MAX_PATH_DEPTH {
                return Err(PathError::TooDeep);
            }
            if expect_key {
                let start = pos;
                while pos < bytes.len() && !matches!(bytes[pos], b'.' | b'[' | b']') {
                    pos += 1;
                }
                if pos == start {
                    return Err(PathError::EmptySegment(start));
                }
                segments.push(PathSegment::Key(expr[start..pos].to_string()));
                expect_key = false;
                continue;
            }

            match bytes[pos] {
                b'.' => {
                    pos += 1;
                    if pos == bytes.len() {
                        return Err(PathError::EmptySegment(pos));
                    }
                    expect_key = true;
                }
                b'[' => {
                    let start = pos + 1;
                    let end = expr[start..]
                        .find(']')
                        .map(|offset| start + offset)
                        .ok_or(PathError::UnterminatedIndex(pos))?;
                    let digits = &expr[start..end];
                    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(PathError::InvalidIndex(digits.to_string()));
                    }
                    let index: usize = digits
                        .parse()
                        .map_err(|_| PathError::InvalidIndex(digits.to_string()))?;
                    if index > MAX_ARRAY_INDEX {
                        return Err(PathError::IndexTooLarge(index));
                    }
                    segments.push(PathSegment::Index(index));
                    pos = end + 1;
                }
                _ => {
                    let found = expr[pos..].chars().next().unwrap_or_default();
                    return Err(PathError::Unexpected(found, pos));
                }
            }
        }

        if segments.len() > MAX_PATH_DEPTH {
            return Err(PathError::TooDeep);
        }
        Ok(Self { segments })
    }

    /// Parse a path, falling back to a single literal key when the
    /// expression does not follow the grammar
    pub fn parse_or_literal(expr: &str) -> Self {
        Self::parse(expr).unwrap_or_else(|_| Self::key(expr))
    }

    /// Single-segment path naming a top-level field
    pub fn key(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(name.into())],
        }
    }

    pub(crate) fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Path of a named child
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(name.into()));
        Self { segments }
    }

    /// Path of an array element
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}
