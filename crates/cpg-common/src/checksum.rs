//! SHA-256 fingerprints for input data files
//!
//! The dashboard reports the digest of the file it was built from so that two
//! deployments can be compared without diffing spreadsheets. Callers hash the
//! same buffer they parse, so the digest always describes the loaded data.

use crate::error::{CpgError, Result};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `bytes`
pub fn sha256_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Check `bytes` against a pinned digest, returning the actual digest on success.
///
/// The comparison ignores ASCII case so digests copied from tools that print
/// upper-case hex still match.
pub fn verify_sha256(bytes: &[u8], expected: &str) -> Result<String> {
    let actual = sha256_bytes(bytes);
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(actual)
    } else {
        Err(CpgError::ChecksumMismatch {
            expected: expected.trim().to_string(),
            actual,
        })
    }
}
