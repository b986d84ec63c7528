//! Document identifiers and the sources that resolve them to bytes
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use crate::loader::parser::Format;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

/// A document key could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid document key '{input}': {reason}")]
pub struct KeyError {
    pub input: String,
    pub reason: &'static str,
}

/// Identifier of a schema/UI schema pair, written `namespace/name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey {
    namespace: String,
    name: String,
}

impl DocumentKey {
    /// Both parts must be non-empty and free of path separators and `..`
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Result<Self, KeyError> {
        let namespace = namespace.into();
        let name = name.into();
        for part in [&namespace, &name] {
            check_part(part, &format!("{}/{}", namespace, name))?;
        }
        Ok(Self { namespace, name })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn check_part(part: &str, input: &str) -> Result<(), KeyError> {
    let reason = if part.is_empty() {
        "namespace and name must be non-empty"
    } else if part.contains(['/', '\\']) || part == ".." || part == "." {
        "parts must not contain path separators or relative segments"
    } else {
        return Ok(());
    };
    Err(KeyError {
        input: input.to_string(),
        reason,
    })
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl FromStr for DocumentKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, name) = s.split_once('/').ok_or_else(|| KeyError {
            input: s.to_string(),
            reason: "expected <namespace>/<name>",
        })?;
        Self::new(namespace, name)
    }
}

/// Which document of a pair is wanted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Schema,
    Ui,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentKind::Schema => "schema",
            DocumentKind::Ui => "ui schema",
        })
    }
}

/// Raw document text plus where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub content: String,
    pub format: Format,
    /// Used in error messages
    pub origin: PathBuf,
}

/// "Give me bytes for identifier X".
///
/// Implementations may block; the registry never calls them while
/// holding a lock shared with other keys.
pub trait DocumentSource: Send + Sync {
    fn fetch(&self, key: &DocumentKey, kind: DocumentKind) -> LoaderResult<Document>;
}

/// Resolves `<root>/<namespace>/<name>.<suffix>.<ext>` on disk, trying
/// `json`, `yaml`, then `yml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    pub root: PathBuf,
    pub schema_suffix: String,
    pub ui_suffix: String,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            schema_suffix: "schema".to_string(),
            ui_suffix: "ui".to_string(),
        }
    }

    pub fn with_suffixes(mut self, schema: impl Into<String>, ui: impl Into<String>) -> Self {
        self.schema_suffix = schema.into();
        self.ui_suffix = ui.into();
        self
    }

    /// Candidate paths for a document, in lookup order
    pub fn candidates(&self, key: &DocumentKey, kind: DocumentKind) -> Vec<(PathBuf, Format)> {
        let suffix = match kind {
            DocumentKind::Schema => &self.schema_suffix,
            DocumentKind::Ui => &self.ui_suffix,
        };
        let dir = self.root.join(key.namespace());
        Format::all()
            .into_iter()
            .flat_map(|format| {
                format.extensions().iter().map(move |ext| (ext, format))
            })
            .map(|(ext, format)| (dir.join(format!("{}.{}.{}", key.name(), suffix, ext)), format))
            .collect()
    }
}

impl DocumentSource for FileSource {
    fn fetch(&self, key: &DocumentKey, kind: DocumentKind) -> LoaderResult<Document> {
        for (path, format) in self.candidates(key, kind) {
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    trace!(key = %key, path = %path.display(), "read {}", kind);
                    return Ok(Document {
                        content,
                        format,
                        origin: path,
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(LoaderError::io(path, e)),
            }
        }
        Err(LoaderError::not_found(format!("{} ({})", key, kind)))
    }
}

/// Documents held in memory, for embedding hosts and tests
#[derive(Debug, Default)]
pub struct InMemorySource {
    documents: RwLock<HashMap<(DocumentKey, DocumentKind), Document>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document. Replacing does not affect models a
    /// registry has already cached.
    pub fn insert(&self, key: DocumentKey, kind: DocumentKind, content: impl Into<String>, format: Format) {
        let origin = PathBuf::from(format!("memory/{}.{}", key, format.extensions()[0]));
        self.documents.write().insert(
            (key, kind),
            Document {
                content: content.into(),
                format,
                origin,
            },
        );
    }
}

impl DocumentSource for InMemorySource {
    fn fetch(&self, key: &DocumentKey, kind: DocumentKind) -> LoaderResult<Document> {
        self.documents
            .read()
            .get(&(key.clone(), kind))
            .cloned()
            .ok_or_else(|| LoaderError::not_found(format!("{} ({})", key, kind)))
    }
}
