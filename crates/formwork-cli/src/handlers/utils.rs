//! Shared utilities for command handlers

use crate::cli::SubmissionArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use formwork_schemas::loader::{
    load_metadata_file, load_schema_file, load_ui_schema_file, Format, LoaderResult,
};
use formwork_schemas::{decode, DocumentKey, FormData, Schema, SchemaMetadata, SchemaRegistry, UiSchema};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A document named on the command line
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentRef {
    /// A JSON or YAML file
    File(PathBuf),
    /// A `namespace/name` identifier under the schemas directory
    Key(DocumentKey),
}

impl DocumentRef {
    /// Existing paths and names with a document extension are files;
    /// anything else must be an identifier
    pub fn parse(raw: &str) -> Result<Self> {
        let path = Path::new(raw);
        if path.exists() || Format::from_path(path).is_ok() {
            return Ok(Self::File(path.to_path_buf()));
        }
        raw.parse().map(Self::Key).map_err(|e| {
            Error::invalid_args(format!(
                "'{}' is neither a document file nor a namespace/name identifier ({})",
                raw, e
            ))
        })
    }
}

/// Loads documents off the async runtime, bounded by a timeout
pub struct Loader {
    registry: Arc<SchemaRegistry>,
    timeout: Duration,
}

impl Loader {
    pub fn new(config: &Config, timeout: Duration) -> Self {
        Self {
            registry: Arc::new(SchemaRegistry::with_root(config.schemas_root())),
            timeout,
        }
    }

    pub async fn schema(&self, reference: &DocumentRef) -> Result<Arc<Schema>> {
        let registry = Arc::clone(&self.registry);
        match reference.clone() {
            DocumentRef::File(path) => self.blocking(move || load_schema_file(&path).map(Arc::new)).await,
            DocumentRef::Key(key) => self.blocking(move || registry.load_schema(&key)).await,
        }
    }

    pub async fn ui_schema(&self, reference: &DocumentRef) -> Result<Arc<UiSchema>> {
        let registry = Arc::clone(&self.registry);
        match reference.clone() {
            DocumentRef::File(path) => {
                self.blocking(move || load_ui_schema_file(&path).map(Arc::new)).await
            }
            DocumentRef::Key(key) => self.blocking(move || registry.load_ui_schema(&key)).await,
        }
    }

    pub async fn metadata(&self, reference: &DocumentRef) -> Result<SchemaMetadata> {
        let registry = Arc::clone(&self.registry);
        match reference.clone() {
            DocumentRef::File(path) => self.blocking(move || load_metadata_file(&path)).await,
            DocumentRef::Key(key) => self.blocking(move || registry.load_metadata(&key)).await,
        }
    }

    async fn blocking<T, F>(&self, load: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> LoaderResult<T> + Send + 'static,
    {
        match tokio::time::timeout(self.timeout, tokio::task::spawn_blocking(load)).await {
            Ok(Ok(loaded)) => Ok(loaded?),
            Ok(Err(join)) => Err(Error::other(format!("Document load task failed: {}", join))),
            Err(_) => Err(Error::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        }
    }
}

/// True when no data file and no fields were given
pub fn is_empty_submission(args: &SubmissionArgs) -> bool {
    args.data.is_none() && args.fields.is_empty()
}

/// Collect the submission as raw multi-valued fields.
///
/// Values from the data file come first, so a `--field` for the same
/// name only takes effect when the file does not set it.
pub fn read_submission(args: &SubmissionArgs) -> Result<BTreeMap<String, Vec<String>>> {
    let mut raw: BTreeMap<String, Vec<String>> = BTreeMap::new();

    if let Some(path) = &args.data {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound { path: path.clone() }
            } else {
                Error::Io(e)
            }
        })?;
        let document: Value = serde_json::from_str(&content)?;
        let Value::Object(entries) = document else {
            return Err(Error::invalid_args(format!(
                "{} must hold a JSON object of field names to values",
                path.display()
            )));
        };
        for (name, value) in entries {
            let values = submitted_values(&name, value)?;
            raw.entry(name).or_default().extend(values);
        }
    }

    for (name, value) in &args.fields {
        raw.entry(name.clone()).or_default().push(value.clone());
    }

    debug!(fields = raw.len(), "Read submission");
    Ok(raw)
}

/// Read and decode the submission
pub fn decode_submission(args: &SubmissionArgs) -> Result<FormData> {
    Ok(decode(&read_submission(args)?))
}

fn submitted_values(name: &str, value: Value) -> Result<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| scalar_text(name, item))
            .collect(),
        other => Ok(vec![scalar_text(name, other)?]),
    }
}

fn scalar_text(name: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::invalid_args(format!(
            "field '{}' must be a string or a list of strings; use flat names like 'a[0].b' for nesting",
            name
        ))),
    }
}
