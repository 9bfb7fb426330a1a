//! Fuzz target for record validation.
//!
//! Feeds arbitrary bytes as raw stored metadata and checks that validation
//! either settles the record or reports a storage error, never panics, and
//! never leaves the record VALIDATING.

#![no_main]

use dandi::record::{AssetRecord, BlobDigest, RecordId, RecordStatus};
use dandi::store::{MemoryStore, RecordStore};
use dandi::Validator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    if let Ok(raw) = std::str::from_utf8(data) {
        let asset = AssetRecord::from_raw("a1", raw, BlobDigest::default());
        let store = MemoryStore::new().with(asset);
        let validator = Validator::new(store);
        let id = RecordId::new("a1");

        if let Ok(settled) = validator.validate_asset(&id) {
            assert_eq!(settled.is_valid(), settled.validation_error().is_empty());
        }
        if let Ok(record) = validator.store().get_record(&id) {
            assert_ne!(record.status(), RecordStatus::Validating);
        }
    }
});
