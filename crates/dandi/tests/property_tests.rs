//! Property-based tests for validation, status and digests.
//!
//! ```bash
//! cargo test -p dandi --test property_tests
//! PROPTEST_CASES=10000 cargo test -p dandi --test property_tests
//! ```

use std::io::Cursor;

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use dandi::doi::doi_string;
use dandi::record::{
    compute_digest, part_size_for, AssetRecord, BlobDigest, RecordId, RecordKind, RecordStatus,
    MAX_PARTS,
};
use dandi::schema::{SchemaOracle, SchemaRegistry, ValidationMode};
use dandi::store::MemoryStore;
use dandi::Validator;

// =============================================================================
// Test Strategies
// =============================================================================

/// Arbitrary JSON values of bounded depth.
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9:/._ -]{0,30}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z]{1,12}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Metadata objects that mix known field names with random ones.
fn metadata() -> impl Strategy<Value = Map<String, Value>> {
    let key = prop_oneof![
        Just("schemaVersion".to_string()),
        Just("identifier".to_string()),
        Just("contentSize".to_string()),
        Just("encodingFormat".to_string()),
        Just("digest".to_string()),
        Just("path".to_string()),
        Just("keywords".to_string()),
        Just("contentUrl".to_string()),
        Just("name".to_string()),
        Just("contributor".to_string()),
        Just("license".to_string()),
        "[a-zA-Z]{1,12}",
    ];
    prop::collection::btree_map(key, json_value(), 0..10).prop_map(|m| m.into_iter().collect())
}

fn status() -> impl Strategy<Value = RecordStatus> {
    prop_oneof![
        Just(RecordStatus::Pending),
        Just(RecordStatus::Validating),
        Just(RecordStatus::Valid),
        Just(RecordStatus::Invalid),
    ]
}

// =============================================================================
// Oracle Properties
// =============================================================================

proptest! {
    /// The oracle never panics and always returns the same errors for the same input.
    #[test]
    fn oracle_is_deterministic(
        metadata in metadata(),
        version in prop::option::of("0\\.[4-6]\\.[0-4]"),
    ) {
        let registry = SchemaRegistry::builtin();
        let mode = ValidationMode::default();
        for kind in [RecordKind::Asset, RecordKind::Version] {
            let first = registry.validate(kind, version.as_deref(), &metadata, mode);
            let second = registry.validate(kind, version.as_deref(), &metadata, mode);
            prop_assert_eq!(first.err(), second.err());
        }
    }

    /// Error text does not depend on the order keys were inserted in.
    #[test]
    fn errors_ignore_key_order(metadata in metadata()) {
        let registry = SchemaRegistry::builtin();
        let reversed: Map<String, Value> = metadata
            .iter()
            .rev()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let mode = ValidationMode::default();
        for kind in [RecordKind::Asset, RecordKind::Version] {
            let forward = registry.validate(kind, Some("0.6.0"), &metadata, mode);
            let backward = registry.validate(kind, Some("0.6.0"), &reversed, mode);
            prop_assert_eq!(forward.err(), backward.err());
        }
    }

    /// Unknown versions always produce exactly one error.
    #[test]
    fn unknown_version_is_single_error(metadata in metadata(), version in "[a-z]{1,8}") {
        let registry = SchemaRegistry::builtin();
        let errors = registry
            .validate(RecordKind::Asset, Some(&version), &metadata, ValidationMode::default())
            .unwrap_err();
        prop_assert_eq!(errors.len(), 1);
        let expected = format!("Metadata version {} is not allowed.", version);
        prop_assert!(errors[0].msg.starts_with(&expected));
    }
}

// =============================================================================
// Status Properties
// =============================================================================

proptest! {
    /// INVALID exactly when the error text is non-empty.
    #[test]
    fn settled_status_matches_error_text(prior in status(), text in ".{0,40}") {
        if let Ok(run) = prior.begin_validation() {
            let settled = run.settle(text.clone());
            prop_assert_eq!(settled.status() == RecordStatus::Invalid, !text.is_empty());
            prop_assert!(settled.status().is_settled());
        } else {
            prop_assert_eq!(prior, RecordStatus::Validating);
        }
    }

    /// A stored asset never ends up VALIDATING, whatever its metadata.
    #[test]
    fn validation_never_persists_validating(metadata in metadata()) {
        let store = MemoryStore::new().with(AssetRecord::new(
            "a1",
            &Value::Object(metadata),
            BlobDigest::default(),
        ));
        let validator = Validator::new(store);
        let settled = validator.validate_asset(&RecordId::new("a1")).unwrap();
        prop_assert!(settled.status().is_settled());
        prop_assert_eq!(settled.is_valid(), settled.validation_error().is_empty());
    }
}

// =============================================================================
// Digest and DOI Properties
// =============================================================================

proptest! {
    /// Part counts stay within the multipart limit.
    #[test]
    fn part_size_respects_limit(size in 0u64..(1u64 << 45)) {
        let part = part_size_for(size);
        prop_assert!(part > 0);
        prop_assert!(size.div_ceil(part) <= MAX_PARTS);
    }

    /// Small blobs, empty ones included, are a single part.
    #[test]
    fn small_blob_is_single_part(data in prop::collection::vec(any::<u8>(), 0..2048)) {
        let digest = compute_digest(Cursor::new(&data), data.len() as u64).unwrap();
        let etag = digest.etag.unwrap();
        prop_assert!(etag.ends_with("-1"));
        prop_assert_eq!(digest.sha256.unwrap().len(), 64);
    }

    /// DOIs embed their parts verbatim.
    #[test]
    fn doi_layout(
        prefix in "10\\.[0-9]{4,5}",
        id in "[0-9]{6}",
        version in "[0-9]\\.[0-9]{1,2}\\.[0-9]{1,2}",
    ) {
        let doi = doi_string(&prefix, &id, &version);
        prop_assert_eq!(doi, format!("{}/dandi.{}/{}", prefix, id, version));
    }
}
