// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document integrity — SHA-256 hashing of input documents.

use pagearmor_core::error::ArmorError;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Raw SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Verify that the SHA-256 hex digest of `data` starts with `expected_prefix`.
///
/// Fingerprints carry a truncated digest, so a prefix match is what callers
/// need. An empty prefix never matches.
pub fn verify_hash(data: &[u8], expected_prefix: &str) -> Result<(), ArmorError> {
    let actual = hash_bytes(data);
    if !expected_prefix.is_empty() && actual.starts_with(&expected_prefix.to_ascii_lowercase()) {
        Ok(())
    } else {
        Err(ArmorError::IntegrityMismatch {
            expected: expected_prefix.to_owned(),
            actual,
        })
    }
}
