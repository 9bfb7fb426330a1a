//! Fuzz target for schema version lookup.
//!
//! Any version token the registry does not know must produce exactly one
//! error that echoes the token.

#![no_main]

use dandi::record::RecordKind;
use dandi::schema::{SchemaOracle, SchemaRegistry, ValidationMode};
use libfuzzer_sys::fuzz_target;
use serde_json::Map;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1_000 {
        return;
    }

    if let Ok(version) = std::str::from_utf8(data) {
        let registry = SchemaRegistry::builtin();
        let known = registry.versions().any(|v| v == version);
        let mode = ValidationMode::default();
        let result = registry.validate(RecordKind::Version, Some(version), &Map::new(), mode);

        if !known {
            let errors = result.expect_err("unknown version accepted");
            assert_eq!(errors.len(), 1);
            assert!(errors[0].msg.contains(version));
        }
    }
});
