//! DOI string construction and registration payloads.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{DoiSettings, DEFAULT_DOI_PREFIX};
use crate::error::Result;
use crate::record::DatasetVersion;
use crate::schema::ValidationMode;

use super::datacite::{DataciteTransform, MetadataTransform};

/// `{prefix}/dandi.{dataset_identifier}/{version_label}`.
pub fn doi_string(prefix: &str, dataset_identifier: &str, version_label: &str) -> String {
    format!("{}/dandi.{}/{}", prefix, dataset_identifier, version_label)
}

/// A DOI together with its registration payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoiData {
    pub doi: String,
    pub payload: Value,
}

/// Builds [`DoiData`] for dataset versions.
#[derive(Debug, Clone)]
pub struct DoiDataBuilder<M = DataciteTransform> {
    prefix: String,
    publish: bool,
    mode: ValidationMode,
    transform: M,
}

impl Default for DoiDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DoiDataBuilder {
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_DOI_PREFIX.to_string(),
            publish: false,
            mode: ValidationMode::default(),
            transform: DataciteTransform::default(),
        }
    }

    pub fn from_settings(settings: &DoiSettings) -> Self {
        Self::new()
            .with_prefix(settings.prefix())
            .with_publish(settings.publish)
    }
}

impl<M: MetadataTransform> DoiDataBuilder<M> {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Request findable rather than draft registration.
    pub fn with_publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_transform<N: MetadataTransform>(self, transform: N) -> DoiDataBuilder<N> {
        DoiDataBuilder {
            prefix: self.prefix,
            publish: self.publish,
            mode: self.mode,
            transform,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn publish(&self) -> bool {
        self.publish
    }

    /// DOI the given version would be registered under.
    pub fn doi_for(&self, version: &DatasetVersion) -> String {
        doi_string(&self.prefix, &version.dataset_identifier, &version.version_label)
    }

    /// Compute the DOI, write it into `metadata` under `doi`, and convert
    /// the result into a registration payload.
    pub fn build(
        &self,
        dataset_identifier: &str,
        version_label: &str,
        metadata: &mut Map<String, Value>,
    ) -> Result<DoiData> {
        let doi = doi_string(&self.prefix, dataset_identifier, version_label);
        metadata.insert("doi".to_string(), Value::String(doi.clone()));
        let payload = self.transform.to_payload(metadata, self.publish, self.mode)?;
        Ok(DoiData { doi, payload })
    }
}
