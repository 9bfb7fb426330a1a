//! Blob checksum calculation (sha256 and dandi-etag).
//!
//! The dandi-etag matches an S3 multipart upload etag: the md5 of the
//! concatenated per-part md5 digests, suffixed with `-{parts}`.

use std::io::{self, Read};

use sha2::{Digest, Sha256};

use super::model::BlobDigest;

/// Smallest part size used for the dandi-etag.
pub const DEFAULT_PART_SIZE: u64 = 64 * 1024 * 1024;

/// Maximum number of parts in a multipart upload.
pub const MAX_PARTS: u64 = 10_000;

const READ_BUFFER: usize = 64 * 1024;

/// Part size for a blob of `size` bytes.
pub fn part_size_for(size: u64) -> u64 {
    let mut part_size = DEFAULT_PART_SIZE;
    while size.div_ceil(part_size) > MAX_PARTS {
        part_size *= 2;
    }
    part_size
}

/// Compute both digests of a blob in one pass.
///
/// `size` must be the exact blob length; it fixes the part size.
pub fn compute_digest<R: Read>(reader: R, size: u64) -> io::Result<BlobDigest> {
    compute_digest_with_part_size(reader, size, part_size_for(size))
}

pub(crate) fn compute_digest_with_part_size<R: Read>(
    mut reader: R,
    size: u64,
    part_size: u64,
) -> io::Result<BlobDigest> {
    let mut sha = Sha256::new();
    let mut part = md5::Context::new();
    let mut part_filled = 0u64;
    let mut part_digests = Vec::new();
    let mut parts = 0u64;
    let mut total = 0u64;
    let mut buf = vec![0u8; READ_BUFFER];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        let mut chunk = &buf[..n];
        sha.update(chunk);
        total += n as u64;

        while !chunk.is_empty() {
            let take = ((part_size - part_filled) as usize).min(chunk.len());
            part.consume(&chunk[..take]);
            part_filled += take as u64;
            chunk = &chunk[take..];

            if part_filled == part_size {
                let finished = std::mem::replace(&mut part, md5::Context::new());
                part_digests.extend_from_slice(&finished.compute().0);
                parts += 1;
                part_filled = 0;
            }
        }
    }

    if part_filled > 0 || parts == 0 {
        part_digests.extend_from_slice(&part.compute().0);
        parts += 1;
    }

    if total != size {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("expected {} bytes, read {}", size, total),
        ));
    }

    Ok(BlobDigest {
        sha256: Some(format!("{:x}", sha.finalize())),
        etag: Some(format!("{:x}-{}", md5::compute(&part_digests), parts)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_of_known_input() {
        let digest = compute_digest(&b"hello"[..], 5).unwrap();
        assert_eq!(
            digest.sha256.as_deref(),
            Some("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
        );
    }

    #[test]
    fn test_single_part_etag() {
        let digest = compute_digest(&b"hello"[..], 5).unwrap();
        let inner = md5::compute(b"hello");
        let expected = format!("{:x}-1", md5::compute(inner.0));
        assert_eq!(digest.etag.as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn test_multipart_etag() {
        let data = b"abcdefghij";
        let digest = compute_digest_with_part_size(&data[..], 10, 4).unwrap();

        let mut concatenated = Vec::new();
        for part in [&data[0..4], &data[4..8], &data[8..10]] {
            concatenated.extend_from_slice(&md5::compute(part).0);
        }
        let expected = format!("{:x}-3", md5::compute(&concatenated));
        assert_eq!(digest.etag.as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn test_empty_blob_has_one_part() {
        let digest = compute_digest(&b""[..], 0).unwrap();
        assert!(digest.etag.unwrap().ends_with("-1"));
    }

    #[test]
    fn test_size_mismatch_is_error() {
        let err = compute_digest(&b"hello"[..], 4).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_part_size_grows_for_large_blobs() {
        assert_eq!(part_size_for(0), DEFAULT_PART_SIZE);
        assert_eq!(part_size_for(DEFAULT_PART_SIZE * MAX_PARTS), DEFAULT_PART_SIZE);
        assert_eq!(
            part_size_for(DEFAULT_PART_SIZE * MAX_PARTS + 1),
            DEFAULT_PART_SIZE * 2
        );
    }
}
