//! DOI lifecycle for dataset versions.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{DandiError, Result};
use crate::record::{DatasetVersion, RecordId, RecordStatus};
use crate::store::RecordStore;

use super::builder::DoiDataBuilder;
use super::client::{DeleteOutcome, RegistryClient};
use super::datacite::{DataciteTransform, MetadataTransform};
use super::transport::{HttpTransport, RegistryTransport};

/// Creates and retracts DOIs for dataset versions.
///
/// A version gets at most one DOI: once `doi` is set, creation returns it
/// without contacting the registry.
pub struct DoiPublisher<T = HttpTransport, M = DataciteTransform> {
    builder: DoiDataBuilder<M>,
    client: RegistryClient<T>,
}

impl DoiPublisher {
    /// Publisher talking HTTP to the configured registry.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let builder =
            DoiDataBuilder::from_settings(&settings.doi).with_mode(settings.validation_mode());
        let client = RegistryClient::from_settings(&settings.doi)?;
        Ok(Self::new(builder, client))
    }
}

impl<T: RegistryTransport, M: MetadataTransform> DoiPublisher<T, M> {
    pub fn new(builder: DoiDataBuilder<M>, client: RegistryClient<T>) -> Self {
        Self { builder, client }
    }

    pub fn builder(&self) -> &DoiDataBuilder<M> {
        &self.builder
    }

    pub fn client(&self) -> &RegistryClient<T> {
        &self.client
    }

    /// Create the DOI for `version` from its metadata and record it on the
    /// version.
    ///
    /// With registration disabled the DOI is still computed and recorded.
    pub fn create(
        &self,
        version: &mut DatasetVersion,
        mut metadata: Map<String, Value>,
    ) -> Result<String> {
        if let Some(doi) = &version.doi {
            debug!(doi = %doi, "version already has a DOI");
            return Ok(doi.clone());
        }

        let data = self
            .builder
            .build(&version.dataset_identifier, &version.version_label, &mut metadata)?;
        self.client.create(&data.doi, &data.payload)?;

        version.doi = Some(data.doi.clone());
        Ok(data.doi)
    }

    /// Delete the version's DOI if the registry still holds it as a draft.
    ///
    /// Returns `None` when the version never had a DOI.
    pub fn delete(&self, version: &DatasetVersion) -> Result<Option<DeleteOutcome>> {
        let Some(doi) = &version.doi else {
            debug!(
                dataset = %version.dataset_identifier,
                version = %version.version_label,
                "version has no DOI to delete"
            );
            return Ok(None);
        };
        Ok(Some(self.client.delete(doi)?))
    }

    /// Create the DOI for a stored version record and persist it.
    ///
    /// Only a `VALID` version can be given a new DOI.
    pub fn create_for_record<S: RecordStore>(&self, store: &S, id: &RecordId) -> Result<String> {
        let record = store.get_record(id)?.into_version()?;
        let already_assigned = record.dataset.doi.is_some();
        if !already_assigned && record.status != RecordStatus::Valid {
            warn!(record = %id, status = %record.status, "refusing DOI for unvalidated version");
            return Err(DandiError::NotValid {
                id: id.clone(),
                status: record.status,
            });
        }

        let metadata = record.metadata()?;
        let mut dataset = record.dataset;
        let doi = self.create(&mut dataset, metadata)?;
        if !already_assigned {
            store.save_doi(id, &doi)?;
            info!(record = %id, doi = %doi, "DOI assigned");
        }
        Ok(doi)
    }

    /// Delete the DOI of a stored version record.
    pub fn delete_for_record<S: RecordStore>(
        &self,
        store: &S,
        id: &RecordId,
    ) -> Result<Option<DeleteOutcome>> {
        let record = store.get_record(id)?.into_version()?;
        self.delete(&record.dataset)
    }
}
