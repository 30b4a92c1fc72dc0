// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fingerprint generation — one identifier per hardening request, combining a
// truncated SHA-256 of the input with run-scoped random bytes.

use pagearmor_core::Fingerprint;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, instrument};

use crate::integrity::{hash_bytes, verify_hash};

/// Hex characters kept from the content digest.
pub const CONTENT_HEX_LEN: usize = 16;

/// Random bytes drawn per fingerprint (rendered as twice as many hex chars).
pub const RANDOM_BYTES: usize = 8;

/// Source of the run-scoped component of a fingerprint.
pub trait EntropySource {
    /// Fill `dest` with entropy.
    fn fill(&mut self, dest: &mut [u8]);
}

/// Process-local thread RNG. Fingerprints differ on every run.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, dest: &mut [u8]) {
        rand::thread_rng().fill_bytes(dest);
    }
}

/// Deterministic RNG for reproducible runs and tests.
#[derive(Debug, Clone)]
pub struct SeededEntropy(StdRng);

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl EntropySource for SeededEntropy {
    fn fill(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest);
    }
}

/// Repeats a constant byte, making the fingerprint a pure function of the
/// input content.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedEntropy(pub u8);

impl EntropySource for FixedEntropy {
    fn fill(&mut self, dest: &mut [u8]) {
        dest.fill(self.0);
    }
}

/// Compute the fingerprint of `input`, drawing the random component from
/// `entropy`.
#[instrument(skip_all, fields(input_len = input.len()))]
pub fn generate_fingerprint(input: &[u8], entropy: &mut dyn EntropySource) -> Fingerprint {
    let digest = hash_bytes(input);
    let mut random = [0u8; RANDOM_BYTES];
    entropy.fill(&mut random);

    let fingerprint = Fingerprint::new(&digest[..CONTENT_HEX_LEN], hex::encode(random));
    debug!(fingerprint = %fingerprint, "Fingerprint generated");
    fingerprint
}

/// Re-check that `fingerprint` was derived from `input`.
pub fn matches_content(fingerprint: &Fingerprint, input: &[u8]) -> bool {
    verify_hash(input, fingerprint.content_component()).is_ok()
}

/// Owns an entropy source and hands out fingerprints.
pub struct FingerprintGenerator {
    entropy: Box<dyn EntropySource + Send>,
}

impl FingerprintGenerator {
    pub fn new(entropy: impl EntropySource + Send + 'static) -> Self {
        Self {
            entropy: Box::new(entropy),
        }
    }

    /// Generator backed by the thread RNG.
    pub fn os() -> Self {
        Self::new(OsEntropy)
    }

    /// Generator whose output is reproducible for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SeededEntropy::new(seed))
    }

    pub fn generate(&mut self, input: &[u8]) -> Fingerprint {
        generate_fingerprint(input, self.entropy.as_mut())
    }
}

impl Default for FingerprintGenerator {
    fn default() -> Self {
        Self::os()
    }
}
