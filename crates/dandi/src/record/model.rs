//! Record types: assets, dataset versions and their blob digests.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DandiError, Result};

use super::status::RecordStatus;

/// Opaque record identifier, owned by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The two kinds of metadata record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// A single file within a dataset.
    Asset,
    /// A dataset version (dandiset-level metadata).
    Version,
}

impl RecordKind {
    /// Model name used in validation report headers.
    pub fn model_name(&self) -> &'static str {
        match self {
            RecordKind::Asset => "PublishedAsset",
            RecordKind::Version => "PublishedDandiset",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Asset => "asset",
            RecordKind::Version => "version",
        }
    }
}

/// Content hashes of an asset's blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobDigest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Multipart "dandi-etag" checksum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl BlobDigest {
    /// Metadata key for the sha256 digest.
    pub const SHA256_KEY: &'static str = "dandi:sha2-256";
    /// Metadata key for the dandi-etag digest.
    pub const ETAG_KEY: &'static str = "dandi:dandi-etag";

    pub fn new(sha256: Option<String>, etag: Option<String>) -> Self {
        Self { sha256, etag }
    }

    /// Both digests present.
    pub fn is_complete(&self) -> bool {
        self.sha256.is_some() && self.etag.is_some()
    }

    /// The `digest` metadata field. Absent digests are left out.
    pub fn to_metadata(&self) -> Value {
        let mut digest = Map::new();
        if let Some(etag) = &self.etag {
            digest.insert(Self::ETAG_KEY.to_string(), Value::String(etag.clone()));
        }
        if let Some(sha256) = &self.sha256 {
            digest.insert(Self::SHA256_KEY.to_string(), Value::String(sha256.clone()));
        }
        Value::Object(digest)
    }
}

/// A publishable dataset version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetVersion {
    /// Stable dataset accession, e.g. `000123`.
    pub dataset_identifier: String,
    /// Semantic version label or the `draft` sentinel.
    pub version_label: String,
    /// Set once a DOI has been created; never changed afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

impl DatasetVersion {
    /// Label of the mutable, unpublished version.
    pub const DRAFT: &'static str = "draft";

    pub fn new(dataset_identifier: impl Into<String>, version_label: impl Into<String>) -> Self {
        Self {
            dataset_identifier: dataset_identifier.into(),
            version_label: version_label.into(),
            doi: None,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.version_label == Self::DRAFT
    }
}

/// Asset-level metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: RecordId,
    /// Raw metadata as stored, parsed only when validated.
    pub raw_metadata: String,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub validation_error: String,
    #[serde(default)]
    pub digest: BlobDigest,
}

impl AssetRecord {
    /// Create a pending record from a metadata value.
    pub fn new(id: impl Into<RecordId>, metadata: &Value, digest: BlobDigest) -> Self {
        Self::from_raw(id, metadata.to_string(), digest)
    }

    /// Create a pending record from raw metadata text.
    pub fn from_raw(
        id: impl Into<RecordId>,
        raw_metadata: impl Into<String>,
        digest: BlobDigest,
    ) -> Self {
        Self {
            id: id.into(),
            raw_metadata: raw_metadata.into(),
            status: RecordStatus::Pending,
            validation_error: String::new(),
            digest,
        }
    }

    /// Parse the raw metadata into a mapping.
    pub fn metadata(&self) -> Result<Map<String, Value>> {
        parse_metadata(&self.id, &self.raw_metadata)
    }

    /// Raw metadata with the blob digest merged in under `digest`.
    pub fn full_metadata(&self) -> Result<Map<String, Value>> {
        let mut metadata = self.metadata()?;
        metadata.insert("digest".to_string(), self.digest.to_metadata());
        Ok(metadata)
    }
}

/// Version-level (dandiset) metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: RecordId,
    pub raw_metadata: String,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub validation_error: String,
    pub dataset: DatasetVersion,
    /// Child assets in order.
    #[serde(default)]
    pub assets: Vec<RecordId>,
}

impl VersionRecord {
    pub fn new(id: impl Into<RecordId>, metadata: &Value, dataset: DatasetVersion) -> Self {
        Self::from_raw(id, metadata.to_string(), dataset)
    }

    pub fn from_raw(
        id: impl Into<RecordId>,
        raw_metadata: impl Into<String>,
        dataset: DatasetVersion,
    ) -> Self {
        Self {
            id: id.into(),
            raw_metadata: raw_metadata.into(),
            status: RecordStatus::Pending,
            validation_error: String::new(),
            dataset,
            assets: Vec::new(),
        }
    }

    /// Add child assets.
    pub fn with_assets<I, T>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RecordId>,
    {
        self.assets.extend(assets.into_iter().map(Into::into));
        self
    }

    pub fn metadata(&self) -> Result<Map<String, Value>> {
        parse_metadata(&self.id, &self.raw_metadata)
    }
}

/// A record as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoredRecord {
    Asset(AssetRecord),
    Version(VersionRecord),
}

impl StoredRecord {
    pub fn id(&self) -> &RecordId {
        match self {
            StoredRecord::Asset(a) => &a.id,
            StoredRecord::Version(v) => &v.id,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            StoredRecord::Asset(_) => RecordKind::Asset,
            StoredRecord::Version(_) => RecordKind::Version,
        }
    }

    pub fn status(&self) -> RecordStatus {
        match self {
            StoredRecord::Asset(a) => a.status,
            StoredRecord::Version(v) => v.status,
        }
    }

    pub fn validation_error(&self) -> &str {
        match self {
            StoredRecord::Asset(a) => &a.validation_error,
            StoredRecord::Version(v) => &v.validation_error,
        }
    }

    pub fn into_asset(self) -> Result<AssetRecord> {
        match self {
            StoredRecord::Asset(a) => Ok(a),
            other => Err(DandiError::wrong_kind(other.id(), "asset")),
        }
    }

    pub fn into_version(self) -> Result<VersionRecord> {
        match self {
            StoredRecord::Version(v) => Ok(v),
            other => Err(DandiError::wrong_kind(other.id(), "version")),
        }
    }
}

impl From<AssetRecord> for StoredRecord {
    fn from(a: AssetRecord) -> Self {
        StoredRecord::Asset(a)
    }
}

impl From<VersionRecord> for StoredRecord {
    fn from(v: VersionRecord) -> Self {
        StoredRecord::Version(v)
    }
}

/// Reference to a child asset with its current status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub id: RecordId,
    pub status: RecordStatus,
}

fn parse_metadata(id: &RecordId, raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DandiError::storage(
            id,
            format!("metadata is not a JSON object (found {})", json_type_name(&other)),
        )),
        Err(e) => Err(DandiError::storage(id, format!("malformed metadata: {}", e))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_digest_metadata_omits_missing_keys() {
        let digest = BlobDigest::new(None, Some("abc-1".to_string()));
        assert_eq!(digest.to_metadata(), json!({"dandi:dandi-etag": "abc-1"}));
        assert!(!digest.is_complete());

        assert_eq!(BlobDigest::default().to_metadata(), json!({}));
    }

    #[test]
    fn test_full_metadata_merges_digest() {
        let asset = AssetRecord::new(
            "a1",
            &json!({"path": "sub-01/file.nwb", "digest": {"stale": true}}),
            BlobDigest::new(Some("f00".to_string()), Some("e-1".to_string())),
        );
        let metadata = asset.full_metadata().unwrap();
        assert_eq!(
            metadata["digest"],
            json!({"dandi:dandi-etag": "e-1", "dandi:sha2-256": "f00"})
        );
    }

    #[test]
    fn test_malformed_metadata_is_storage_error() {
        let asset = AssetRecord::from_raw("a1", "{not json", BlobDigest::default());
        assert!(matches!(asset.metadata(), Err(DandiError::Storage { .. })));

        let asset = AssetRecord::from_raw("a2", "[1, 2]", BlobDigest::default());
        let err = asset.metadata().unwrap_err();
        assert!(err.to_string().contains("not a JSON object (found array)"));
    }

    #[test]
    fn test_stored_record_kind_checks() {
        let version = VersionRecord::new("v1", &json!({}), DatasetVersion::new("000123", "draft"));
        let stored = StoredRecord::from(version);
        assert_eq!(stored.kind(), RecordKind::Version);
        assert!(matches!(
            stored.into_asset(),
            Err(DandiError::WrongKind { expected: "asset", .. })
        ));
    }

    #[test]
    fn test_draft_sentinel() {
        assert!(DatasetVersion::new("000123", "draft").is_draft());
        assert!(!DatasetVersion::new("000123", "0.230101.1200").is_draft());
    }
}
