//! Directory-backed record store: one JSON file per record.
//!
//! ```text
//! store/
//! ├── assets/
//! │   └── {asset_id}.json
//! └── versions/
//!     └── {version_id}.json
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use crate::error::{DandiError, Result};
use crate::record::{
    AssetRecord, BlobDigest, RecordId, RecordKind, Settled, StoredRecord, VersionRecord,
};

use super::{apply_digest, apply_doi, apply_status, RecordStore};

/// Record store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store, creating its directories if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        for kind in [RecordKind::Asset, RecordKind::Version] {
            fs::create_dir_all(root.join(kind_dir(kind)))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a record, replacing any existing one with the same id.
    pub fn insert(&self, record: impl Into<StoredRecord>) -> Result<()> {
        let record = record.into();
        let path = self.record_path(record.id(), record.kind())?;
        let file = File::create(&path).map_err(|e| {
            DandiError::storage(
                record.id(),
                format!("Failed to create file '{}': {}", path.display(), e),
            )
        })?;
        let writer = BufWriter::new(file);
        match &record {
            StoredRecord::Asset(a) => serde_json::to_writer_pretty(writer, a)?,
            StoredRecord::Version(v) => serde_json::to_writer_pretty(writer, v)?,
        }
        Ok(())
    }

    fn record_path(&self, id: &RecordId, kind: RecordKind) -> Result<PathBuf> {
        let name = id.as_str();
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(DandiError::storage(id, "record id is not a valid file name"));
        }
        Ok(self.root.join(kind_dir(kind)).join(format!("{}.json", name)))
    }

    fn load(&self, id: &RecordId, kind: RecordKind) -> Result<Option<StoredRecord>> {
        let path = self.record_path(id, kind)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DandiError::storage(
                    id,
                    format!("Failed to open file '{}': {}", path.display(), e),
                ));
            }
        };

        let reader = BufReader::new(file);
        let parse_error = |e: serde_json::Error| {
            DandiError::storage(id, format!("Failed to parse record '{}': {}", path.display(), e))
        };
        let record = match kind {
            RecordKind::Asset => StoredRecord::Asset(
                serde_json::from_reader::<_, AssetRecord>(reader).map_err(parse_error)?,
            ),
            RecordKind::Version => StoredRecord::Version(
                serde_json::from_reader::<_, VersionRecord>(reader).map_err(parse_error)?,
            ),
        };

        if record.id() != id {
            return Err(DandiError::storage(
                id,
                format!("file '{}' holds record '{}'", path.display(), record.id()),
            ));
        }
        Ok(Some(record))
    }

    fn update<F>(&self, id: &RecordId, f: F) -> Result<()>
    where
        F: FnOnce(StoredRecord) -> Result<StoredRecord>,
    {
        let record = self.get_record(id)?;
        self.insert(f(record)?)
    }
}

impl RecordStore for FileStore {
    fn get_record(&self, id: &RecordId) -> Result<StoredRecord> {
        if let Some(record) = self.load(id, RecordKind::Asset)? {
            return Ok(record);
        }
        self.load(id, RecordKind::Version)?
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

fn kind_dir(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Asset => "assets",
        RecordKind::Version => "versions",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DatasetVersion, RecordStatus};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let asset = AssetRecord::new(
            "a1",
            &json!({"path": "sub-01/x.nwb"}),
            BlobDigest::new(Some("f00".into()), None),
        );
        store.insert(asset.clone()).unwrap();

        let loaded = store.get_record(&RecordId::from("a1")).unwrap();
        assert_eq!(loaded, StoredRecord::Asset(asset));
        assert!(dir.path().join("assets/a1.json").exists());
    }

    #[test]
    fn test_version_lookup_falls_through_assets() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store
            .insert(VersionRecord::new("v1", &json!({}), DatasetVersion::new("000123", "draft")))
            .unwrap();

        let loaded = store.get_record(&RecordId::from("v1")).unwrap();
        assert_eq!(loaded.kind(), RecordKind::Version);
        assert!(matches!(
            store.get_record(&RecordId::from("v2")),
            Err(DandiError::NotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("assets/a1.json"), "{ nope").unwrap();

        let err = store.get_record(&RecordId::from("a1")).unwrap_err();
        assert!(matches!(err, DandiError::Storage { .. }));
    }

    #[test]
    fn test_path_traversal_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.get_record(&RecordId::from("../etc")).is_err());
    }

    #[test]
    fn test_save_status_persists() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store
            .insert(AssetRecord::new("a1", &json!({}), BlobDigest::default()))
            .unwrap();
        let settled = RecordStatus::Pending.begin_validation().unwrap().settle("");
        store.save_status(&RecordId::from("a1"), &settled).unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get_record(&RecordId::from("a1")).unwrap().status(),
            RecordStatus::Valid
        );
    }
}
