//! Documentation-oriented metadata extraction
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

pub mod extractor;

pub use extractor::{extract_metadata, FieldMetadata, SchemaMetadata, TypeInfo};
