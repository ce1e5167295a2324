//! Checksum verification - digest reference parsing and streaming SHA-256
//!
//! Accepts either a raw hex digest or the standard `sha256sum` listing
//! format (`<digest> <filename>`). Files are hashed in fixed-size chunks
//! to bound memory use on large artifacts.

use crate::errors::UpdateError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const HASH_CHUNK_SIZE: usize = 8192;

/// Extract the expected digest from a downloaded checksum payload.
///
/// Takes the first whitespace-separated token; everything else
/// (filenames, trailing lines) is ignored.
pub fn parse_digest_reference(bytes: &[u8]) -> Result<String, UpdateError> {
    let text = String::from_utf8_lossy(bytes);
    text.split_whitespace()
        .next()
        .map(|token| token.to_string())
        .ok_or(UpdateError::MalformedReference)
}

/// Compute the SHA-256 digest of a file as lowercase hex
pub fn compute_digest(path: &Path) -> Result<String, UpdateError> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; HASH_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Case-insensitive digest comparison.
/// Checksum files in the wild do not use consistent casing.
pub fn digests_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
