//! Dandi: metadata validation and DOI lifecycle for a neuroscience data archive.
//!
//! Asset and dataset-version records carry JSON metadata that is checked
//! against a versioned schema. The outcome is persisted on the record as a
//! status plus human-readable error text; schema violations never surface as
//! Rust errors. Published versions get a DOI registered with a DataCite-style
//! registry, and draft DOIs can be retracted.
//!
//! # Core Principles
//!
//! - **Deterministic**: identical metadata always yields identical error text
//! - **Explicit collaborators**: storage, schema oracle and registry transport
//!   are traits passed in, never globals
//! - **At most one DOI per version**: creation is a no-op once assigned
//!
//! # Example
//!
//! ```
//! use dandi::record::{AssetRecord, BlobDigest, RecordId, RecordStatus};
//! use dandi::store::MemoryStore;
//! use dandi::Validator;
//! use serde_json::json;
//!
//! let store = MemoryStore::new().with(AssetRecord::new(
//!     "a1",
//!     &json!({"schemaVersion": "0.6.0"}),
//!     BlobDigest::default(),
//! ));
//! let validator = Validator::new(store);
//! let settled = validator.validate_asset(&RecordId::new("a1")).unwrap();
//!
//! assert_eq!(settled.status(), RecordStatus::Invalid);
//! assert!(settled.validation_error().contains("for PublishedAsset"));
//! ```

pub mod config;
pub mod doi;
pub mod error;
pub mod manifest;
pub mod record;
pub mod schema;
pub mod store;
pub mod validation;

pub use config::{DoiSettings, Settings};
pub use doi::{DeleteOutcome, DoiPublisher, RegistrationError, RegistryClient};
pub use error::{DandiError, Result};
pub use record::{RecordId, RecordKind, RecordStatus};
pub use schema::{SchemaOracle, SchemaRegistry, ValidationMode};
pub use store::{FileStore, MemoryStore, RecordStore};
pub use validation::{ValidationReport, Validator};
