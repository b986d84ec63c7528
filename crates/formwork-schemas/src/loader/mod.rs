//! Document loading and the shared model cache
//!
//! Documents are fetched by identifier from a [`DocumentSource`], parsed
//! from JSON or YAML, checked against an embedded meta-schema, compiled
//! into models, and kept for the life of the [`SchemaRegistry`].
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use formwork_schemas::loader::{DocumentKey, SchemaRegistry};
//!
//! let registry = SchemaRegistry::with_root("schemas");
//! let key: DocumentKey = "calendar/event".parse()?;
//! let schema = registry.load_schema(&key)?;
//! println!("{} properties", schema.properties.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

pub mod cache;
pub mod error;
pub mod meta;
pub mod parser;
pub mod registry;
pub mod source;

pub use cache::ModelCache;
pub use error::{LoaderError, LoaderResult};
pub use meta::{check_schema_document, check_ui_document};
pub use parser::{DocumentParser, Format};
pub use registry::{
    compile_schema, compile_ui_schema, load_metadata_file, load_schema_file, load_ui_schema_file,
    SchemaRegistry,
};
pub use source::{
    Document, DocumentKey, DocumentKind, DocumentSource, FileSource, InMemorySource, KeyError,
};
