//! Schema registry: load-or-get access to compiled models
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::loader::cache::ModelCache;
use crate::loader::error::{LoaderError, LoaderResult};
use crate::loader::meta::{check_schema_document, check_ui_document};
use crate::loader::parser::DocumentParser;
use crate::loader::source::{DocumentKey, DocumentKind, DocumentSource, FileSource};
use crate::metadata::{extract_metadata, SchemaMetadata};
use crate::model::Schema;
use crate::ui::UiSchema;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns the model caches for one document source.
///
/// Construct one per process (or per tenant) and share it; it is
/// `Send + Sync` and all methods take `&self`.
pub struct SchemaRegistry {
    source: Arc<dyn DocumentSource>,
    parser: DocumentParser,
    schemas: ModelCache<DocumentKey, Schema>,
    ui_schemas: ModelCache<DocumentKey, UiSchema>,
    parses: AtomicUsize,
}

impl SchemaRegistry {
    pub fn new<S: DocumentSource + 'static>(source: S) -> Self {
        Self::from_source(Arc::new(source))
    }

    pub fn from_source(source: Arc<dyn DocumentSource>) -> Self {
        Self {
            source,
            parser: DocumentParser::new(),
            schemas: ModelCache::new(),
            ui_schemas: ModelCache::new(),
            parses: AtomicUsize::new(0),
        }
    }

    /// Registry over `<root>/<namespace>/<name>.{schema,ui}.{json,yaml,yml}`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::new(FileSource::new(root))
    }

    /// Compiled schema for `key`, parsed on first use
    pub fn load_schema(&self, key: &DocumentKey) -> LoaderResult<Arc<Schema>> {
        self.schemas.get_or_try_load(key, || {
            let document = self.read(key, DocumentKind::Schema)?;
            let schema = compile_schema(&key.to_string(), &document)?;
            self.parses.fetch_add(1, Ordering::SeqCst);
            info!(key = %key, properties = schema.properties.len(), "cached schema");
            Ok(schema)
        })
    }

    /// Compiled UI schema for `key`, parsed on first use
    pub fn load_ui_schema(&self, key: &DocumentKey) -> LoaderResult<Arc<UiSchema>> {
        self.ui_schemas.get_or_try_load(key, || {
            let document = self.read(key, DocumentKind::Ui)?;
            let ui = compile_ui_schema(&key.to_string(), &document)?;
            self.parses.fetch_add(1, Ordering::SeqCst);
            info!(key = %key, controls = ui.controls().len(), "cached UI schema");
            Ok(ui)
        })
    }

    /// Summary metadata read from the raw schema document. Not cached.
    pub fn load_metadata(&self, key: &DocumentKey) -> LoaderResult<SchemaMetadata> {
        let document = self.read(key, DocumentKind::Schema)?;
        Ok(extract_metadata(&document))
    }

    /// Number of documents successfully compiled into models
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::SeqCst)
    }

    pub fn is_schema_cached(&self, key: &DocumentKey) -> bool {
        self.schemas.contains(key)
    }

    pub fn cached_schemas(&self) -> usize {
        self.schemas.len()
    }

    pub fn cached_ui_schemas(&self) -> usize {
        self.ui_schemas.len()
    }

    fn read(&self, key: &DocumentKey, kind: DocumentKind) -> LoaderResult<Value> {
        let document = self.source.fetch(key, kind)?;
        debug!(key = %key, origin = %document.origin.display(), "parsing {}", kind);
        self.parser
            .parse_content(&document.content, document.format, &document.origin)
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schemas", &self.schemas)
            .field("ui_schemas", &self.ui_schemas)
            .field("parses", &self.parse_count())
            .finish()
    }
}

/// Check and compile a schema document; `key` names it in errors
pub fn compile_schema(key: &str, document: &Value) -> LoaderResult<Schema> {
    if let Err(problems) = check_schema_document(document) {
        warn!(key = %key, problems = problems.len(), "rejected schema document");
        return Err(LoaderError::invalid_document(key, problems.join("; ")));
    }
    Schema::from_value(document).map_err(|e| LoaderError::invalid_document(key, e.to_string()))
}

/// Check and compile a UI schema document; `key` names it in errors
pub fn compile_ui_schema(key: &str, document: &Value) -> LoaderResult<UiSchema> {
    if let Err(problems) = check_ui_document(document) {
        warn!(key = %key, problems = problems.len(), "rejected UI schema document");
        return Err(LoaderError::invalid_document(key, problems.join("; ")));
    }
    UiSchema::from_value(document).map_err(|e| LoaderError::invalid_document(key, e.to_string()))
}

/// Load a schema straight from a file, bypassing any cache
pub fn load_schema_file(path: &Path) -> LoaderResult<Schema> {
    let document = DocumentParser::new().parse_file(path)?;
    compile_schema(&path.display().to_string(), &document)
}

/// Load a UI schema straight from a file, bypassing any cache
pub fn load_ui_schema_file(path: &Path) -> LoaderResult<UiSchema> {
    let document = DocumentParser::new().parse_file(path)?;
    compile_ui_schema(&path.display().to_string(), &document)
}

pub fn load_metadata_file(path: &Path) -> LoaderResult<SchemaMetadata> {
    let document = DocumentParser::new().parse_file(path)?;
    Ok(extract_metadata(&document))
}
