//! File-backed store used end to end: validate, digest, manifest.

use std::fs;
use std::io::Write;

use serde_json::{json, Value};
use tempfile::{NamedTempFile, TempDir};

use dandi::manifest::write_manifests;
use dandi::record::{
    compute_digest, AssetRecord, BlobDigest, DatasetVersion, RecordId, RecordStatus, VersionRecord,
};
use dandi::store::{FileStore, RecordStore};
use dandi::Validator;

fn asset_metadata(path: &str) -> Value {
    json!({
        "schemaVersion": "0.5.1",
        "identifier": path,
        "contentSize": 11,
        "encodingFormat": "application/x-nwb",
        "path": path,
        "contentUrl": ["https://dandiarchive.s3.amazonaws.com/blobs/abc/"]
    })
}

fn dandiset_metadata() -> Value {
    json!({
        "schemaVersion": "0.5.1",
        "identifier": "DANDI:000042",
        "name": "Hippocampal place cells",
        "description": "Tetrode recordings from CA1 during linear track running.",
        "contributor": [{"name": "Roe, Rick"}],
        "license": ["spdx:CC0-1.0"],
        "citation": "Roe, Rick (2022) Hippocampal place cells.",
        "version": "draft"
    })
}

fn blob(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content).expect("Failed to write to temp file");
    file
}

#[test]
fn test_digest_then_validate_through_file_store() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    store
        .insert(AssetRecord::new("a1", &asset_metadata("sub-01/a.nwb"), BlobDigest::default()))
        .unwrap();

    let validator = Validator::new(&store);
    let id = RecordId::new("a1");
    let first = validator.validate_asset(&id).unwrap();
    assert_eq!(first.status(), RecordStatus::Invalid);
    assert!(first.validation_error().contains("Digest is missing dandi-etag or sha256 keys."));

    let file = blob(b"hello world");
    let digest = compute_digest(fs::File::open(file.path()).unwrap(), 11).unwrap();
    store.save_digest(&id, &digest).unwrap();

    let second = validator.validate_asset(&id).unwrap();
    assert_eq!(second.status(), RecordStatus::Valid);

    let reopened = FileStore::open(dir.path()).unwrap();
    let stored = reopened.get_record(&id).unwrap().into_asset().unwrap();
    assert_eq!(stored.status, RecordStatus::Valid);
    assert_eq!(stored.validation_error, "");
    assert_eq!(stored.digest, digest);
}

#[test]
fn test_version_validation_and_manifest() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path().join("store")).unwrap();
    let digest = BlobDigest::new(Some("f00".into()), Some("e1-1".into()));
    for id in ["a1", "a2"] {
        let metadata = asset_metadata(&format!("sub-01/{}.nwb", id));
        store
            .insert(AssetRecord::new(id, &metadata, digest.clone()))
            .unwrap();
    }
    store
        .insert(
            VersionRecord::new("v1", &dandiset_metadata(), DatasetVersion::new("000042", "draft"))
                .with_assets(["a1", "a2"]),
        )
        .unwrap();

    let validator = Validator::new(&store);
    let pending = validator.validate_version(&RecordId::new("v1")).unwrap();
    assert_eq!(
        pending.validation_error(),
        "1 validation error for PublishedDandiset\n\
         assets\n  2 of 2 assets are not valid: a1 (PENDING), a2 (PENDING) (type=value_error.child_invalid)"
    );

    validator.validate_asset(&RecordId::new("a1")).unwrap();
    validator.validate_asset(&RecordId::new("a2")).unwrap();
    let settled = validator.validate_version(&RecordId::new("v1")).unwrap();
    assert_eq!(settled.status(), RecordStatus::Valid);

    let out = dir.path().join("out");
    let paths = write_manifests(&store, &RecordId::new("v1"), &out).unwrap();
    assert!(paths.dandiset.ends_with("dandisets/000042/draft/dandiset.yaml"));
    assert!(paths.assets_jsonld.ends_with("dandisets/000042/draft/assets.jsonld"));

    let assets: Vec<Value> =
        serde_yaml::from_str(&fs::read_to_string(&paths.assets).unwrap()).unwrap();
    let paths_listed: Vec<&str> = assets.iter().filter_map(|a| a["path"].as_str()).collect();
    assert_eq!(paths_listed, vec!["sub-01/a1.nwb", "sub-01/a2.nwb"]);
    assert_eq!(assets[1]["digest"]["dandi:dandi-etag"], "e1-1");
}

#[test]
fn test_doi_assignment_persists() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let dataset = DatasetVersion::new("000042", "1.0.0");
    store
        .insert(VersionRecord::new("v1", &dandiset_metadata(), dataset))
        .unwrap();

    let id = RecordId::new("v1");
    store.save_doi(&id, "10.80507/dandi.000042/1.0.0").unwrap();
    store.save_doi(&id, "10.80507/dandi.000042/1.0.0").unwrap();
    assert!(store.save_doi(&id, "10.80507/dandi.000042/2.0.0").is_err());

    let version = store.get_record(&id).unwrap().into_version().unwrap();
    assert_eq!(version.dataset.doi.as_deref(), Some("10.80507/dandi.000042/1.0.0"));
}
