//! Schema oracle trait and the version → schema lookup table.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::record::RecordKind;

use super::definitions;
use super::error::FieldError;
use super::field::{check_fields, FieldSpec};

/// Per-call validation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationMode {
    /// Accept `localhost` and loopback URLs (development environments).
    pub allow_localhost_urls: bool,
}

impl ValidationMode {
    pub fn allowing_localhost() -> Self {
        Self {
            allow_localhost_urls: true,
        }
    }
}

/// Declared fields for one record kind at one schema version.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Model name used in report headers.
    pub model: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Check `metadata`, returning errors in declaration order.
    pub fn check(&self, metadata: &Map<String, Value>, mode: ValidationMode) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_fields(&self.fields, metadata, &mut Vec::new(), mode, &mut errors);
        errors
    }

    /// Reorder `metadata`: declared fields first, then the rest.
    fn normalize(&self, metadata: &Map<String, Value>) -> IndexMap<String, Value> {
        let mut fields = IndexMap::with_capacity(metadata.len());
        for spec in &self.fields {
            if let Some(value) = metadata.get(spec.name) {
                fields.insert(spec.name.to_string(), value.clone());
            }
        }
        for (key, value) in metadata {
            if !fields.contains_key(key) {
                fields.insert(key.clone(), value.clone());
            }
        }
        fields
    }
}

/// Asset and dandiset schemas for one version.
#[derive(Debug, Clone)]
pub struct SchemaSet {
    pub asset: Schema,
    pub dandiset: Schema,
}

impl SchemaSet {
    pub fn for_kind(&self, kind: RecordKind) -> &Schema {
        match kind {
            RecordKind::Asset => &self.asset,
            RecordKind::Version => &self.dandiset,
        }
    }
}

/// Metadata accepted by the oracle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub kind: RecordKind,
    pub schema_version: String,
    /// Fields in schema declaration order.
    pub fields: IndexMap<String, Value>,
}

impl NormalizedRecord {
    /// Convert back into a JSON object.
    pub fn into_metadata(self) -> Map<String, Value> {
        self.fields.into_iter().collect()
    }
}

/// A versioned validation capability.
///
/// Implementations must be thread-safe and deterministic: identical input
/// yields identical errors in identical order.
pub trait SchemaOracle: Send + Sync {
    /// Validate `metadata` against the schema bound to `schema_version`.
    ///
    /// An absent or unknown version yields a single `schemaVersion` error.
    fn validate(
        &self,
        kind: RecordKind,
        schema_version: Option<&str>,
        metadata: &Map<String, Value>,
        mode: ValidationMode,
    ) -> Result<NormalizedRecord, Vec<FieldError>>;

    /// Versions this oracle accepts.
    fn supported_versions(&self) -> Vec<String>;
}

/// Explicit table of known schema versions.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, SchemaSet>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in version.
    pub fn builtin() -> Self {
        definitions::builtin()
            .into_iter()
            .fold(Self::new(), |registry, (version, set)| {
                registry.with_version(version, set)
            })
    }

    /// Register (or replace) a version.
    pub fn with_version(mut self, version: impl Into<String>, set: SchemaSet) -> Self {
        self.schemas.insert(version.into(), set);
        self
    }

    pub fn get(&self, version: &str) -> Option<&SchemaSet> {
        self.schemas.get(version)
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

impl SchemaOracle for SchemaRegistry {
    fn validate(
        &self,
        kind: RecordKind,
        schema_version: Option<&str>,
        metadata: &Map<String, Value>,
        mode: ValidationMode,
    ) -> Result<NormalizedRecord, Vec<FieldError>> {
        let Some((version, set)) = schema_version.and_then(|v| self.schemas.get_key_value(v)) else {
            return Err(vec![FieldError::version_not_allowed(
                schema_version,
                &self.supported_versions(),
            )]);
        };

        let schema = set.for_kind(kind);
        let errors = schema.check(metadata, mode);
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NormalizedRecord {
            kind,
            schema_version: version.clone(),
            fields: schema.normalize(metadata),
        })
    }

    fn supported_versions(&self) -> Vec<String> {
        self.schemas.keys().cloned().collect()
    }
}

/// The `schemaVersion` token of a metadata mapping.
///
/// Non-string values are rendered as JSON so they can be echoed verbatim.
pub fn schema_version_of(metadata: &Map<String, Value>) -> Option<String> {
    match metadata.get("schemaVersion") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}
