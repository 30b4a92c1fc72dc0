// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! pagearmor-security — identity primitives for hardened documents.
//!
//! Computes the per-document fingerprint (content hash plus run entropy),
//! derives the per-page steganographic payload and mosaic seed from it, and
//! provides the SHA-256 helpers both rely on.

pub mod derive;
pub mod fingerprint;
pub mod integrity;

pub use derive::{mosaic_seed, page_digest, payload_for_page};
pub use fingerprint::{
    EntropySource, FingerprintGenerator, FixedEntropy, OsEntropy, SeededEntropy,
    generate_fingerprint, matches_content,
};
pub use integrity::{hash_bytes, verify_hash};
