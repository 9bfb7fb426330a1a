//! Storage collaborator interface and two implementations.
//!
//! The validator and DOI publisher only ever talk to [`RecordStore`]; the
//! in-memory store suits tests and embedding, the file store backs the CLI.

mod file;
mod memory;

use std::sync::Arc;

use crate::error::{DandiError, Result};
use crate::record::{AssetRef, BlobDigest, RecordId, Settled, StoredRecord};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Persistent storage of metadata records.
///
/// Implementations must give read-your-writes consistency within one call
/// sequence. Writes of a settled status are single read-modify-write
/// operations; no locking beyond that is assumed.
pub trait RecordStore: Send + Sync {
    /// Fetch a record.
    fn get_record(&self, id: &RecordId) -> Result<StoredRecord>;

    /// Persist a settled validation outcome.
    fn save_status(&self, id: &RecordId, settled: &Settled) -> Result<()>;

    /// Record the DOI created for a version. A different DOI than the one
    /// already stored is rejected.
    fn save_doi(&self, version_id: &RecordId, doi: &str) -> Result<()>;

    /// Replace an asset's blob digest.
    fn save_digest(&self, asset_id: &RecordId, digest: &BlobDigest) -> Result<()>;

    /// Child assets of a version, in order, with their current status.
    fn get_children(&self, version_id: &RecordId) -> Result<Vec<AssetRef>> {
        let version = self.get_record(version_id)?.into_version()?;
        version
            .assets
            .iter()
            .map(|id| {
                let asset = self.get_record(id)?.into_asset()?;
                Ok(AssetRef {
                    id: asset.id,
                    status: asset.status,
                })
            })
            .collect()
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn get_record(&self, id: &RecordId) -> Result<StoredRecord> {
        (**self).get_record(id)
    }

    fn save_status(&self, id: &RecordId, settled: &Settled) -> Result<()> {
        (**self).save_status(id, settled)
    }

    fn save_doi(&self, version_id: &RecordId, doi: &str) -> Result<()> {
        (**self).save_doi(version_id, doi)
    }

    fn save_digest(&self, asset_id: &RecordId, digest: &BlobDigest) -> Result<()> {
        (**self).save_digest(asset_id, digest)
    }

    fn get_children(&self, version_id: &RecordId) -> Result<Vec<AssetRef>> {
        (**self).get_children(version_id)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn get_record(&self, id: &RecordId) -> Result<StoredRecord> {
        (**self).get_record(id)
    }

    fn save_status(&self, id: &RecordId, settled: &Settled) -> Result<()> {
        (**self).save_status(id, settled)
    }

    fn save_doi(&self, version_id: &RecordId, doi: &str) -> Result<()> {
        (**self).save_doi(version_id, doi)
    }

    fn save_digest(&self, asset_id: &RecordId, digest: &BlobDigest) -> Result<()> {
        (**self).save_digest(asset_id, digest)
    }

    fn get_children(&self, version_id: &RecordId) -> Result<Vec<AssetRef>> {
        (**self).get_children(version_id)
    }
}

/// Apply a settled outcome to a stored record.
pub(crate) fn apply_status(record: &mut StoredRecord, settled: &Settled) {
    let (status, error) = match record {
        StoredRecord::Asset(a) => (&mut a.status, &mut a.validation_error),
        StoredRecord::Version(v) => (&mut v.status, &mut v.validation_error),
    };
    *status = settled.status();
    *error = settled.validation_error().to_string();
}

/// Set a version's DOI unless a different one is already assigned.
pub(crate) fn apply_doi(record: StoredRecord, doi: &str) -> Result<StoredRecord> {
    let mut version = record.into_version()?;
    if let Some(existing) = &version.dataset.doi {
        if existing != doi {
            return Err(DandiError::storage(
                &version.id,
                format!("DOI already assigned: {}", existing),
            ));
        }
    }
    version.dataset.doi = Some(doi.to_string());
    Ok(version.into())
}

/// Replace an asset's digest.
pub(crate) fn apply_digest(record: StoredRecord, digest: &BlobDigest) -> Result<StoredRecord> {
    let mut asset = record.into_asset()?;
    asset.digest = digest.clone();
    Ok(asset.into())
}
