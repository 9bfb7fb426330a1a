//! Fuzz target for checksum calculation.
//!
//! Both digests must come back for any input whose size is declared
//! correctly, and a wrong declared size must be rejected.

#![no_main]

use dandi::record::compute_digest;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let size = data.len() as u64;
    if let Ok(digest) = compute_digest(data, size) {
        assert!(digest.is_complete());
    }
    assert!(compute_digest(data, size + 1).is_err());
});
