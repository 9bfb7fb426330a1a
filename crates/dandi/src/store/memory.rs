//! In-memory record store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::{DandiError, Result};
use crate::record::{BlobDigest, RecordId, Settled, StoredRecord};

use super::{apply_digest, apply_doi, apply_status, RecordStore};

/// Thread-safe store holding records in a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<RecordId, StoredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    pub fn insert(&self, record: impl Into<StoredRecord>) {
        let record = record.into();
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.id().clone(), record);
    }

    /// Add records, builder style.
    pub fn with(self, record: impl Into<StoredRecord>) -> Self {
        self.insert(record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn update<F>(&self, id: &RecordId, f: F) -> Result<()>
    where
        F: FnOnce(StoredRecord) -> Result<StoredRecord>,
    {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let record = records
            .get(id)
            .cloned()
            .ok_or_else(|| DandiError::NotFound(id.clone()))?;
        let updated = f(record)?;
        records.insert(id.clone(), updated);
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn get_record(&self, id: &RecordId) -> Result<StoredRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| DandiError::NotFound(id.clone()))
    }

    fn save_status(&self, id: &RecordId, settled: &Settled) -> Result<()> {
        self.update(id, |mut record| {
            apply_status(&mut record, settled);
            Ok(record)
        })
    }

    fn save_doi(&self, version_id: &RecordId, doi: &str) -> Result<()> {
        self.update(version_id, |record| apply_doi(record, doi))
    }

    fn save_digest(&self, asset_id: &RecordId, digest: &BlobDigest) -> Result<()> {
        self.update(asset_id, |record| apply_digest(record, digest))
    }
}
