//! Schema oracle: versioned, deterministic validation of raw metadata.
//!
//! Schemas are looked up by the metadata's `schemaVersion` in an explicit
//! [`SchemaRegistry`]. Unknown versions are rejected with a single
//! `schemaVersion` error; known versions are checked field by field in
//! declaration order, so identical input always yields identical errors.
//!
//! # Example
//!
//! ```
//! use dandi::record::RecordKind;
//! use dandi::schema::{SchemaOracle, SchemaRegistry, ValidationMode};
//!
//! let registry = SchemaRegistry::builtin();
//! let errors = registry
//!     .validate(RecordKind::Asset, Some("9.9.9"), &Default::default(), ValidationMode::default())
//!     .unwrap_err();
//! assert!(errors[0].msg.starts_with("Metadata version 9.9.9 is not allowed."));
//! ```

mod definitions;
mod error;
mod field;
mod registry;

pub use definitions::{CURRENT_SCHEMA_VERSION, LICENSES};
pub use error::{ErrorCategory, FieldError, PathSegment};
pub use field::{FieldSpec, FieldType};
pub(crate) use field::check_url;
pub use registry::{
    schema_version_of, NormalizedRecord, Schema, SchemaOracle, SchemaRegistry, SchemaSet,
    ValidationMode,
};
