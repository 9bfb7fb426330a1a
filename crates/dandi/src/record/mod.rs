//! Metadata records, dataset versions and the validation status machine.

mod digest;
mod model;
mod status;

pub use digest::{compute_digest, part_size_for, DEFAULT_PART_SIZE, MAX_PARTS};
pub use model::{
    AssetRecord, AssetRef, BlobDigest, DatasetVersion, RecordId, RecordKind, StoredRecord,
    VersionRecord,
};
pub use status::{RecordStatus, Settled, ValidationRun};
