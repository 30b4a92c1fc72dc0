// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-page values derived from the document fingerprint: the steganographic
// payload and the mosaic permutation seed.

use pagearmor_core::{Fingerprint, Payload};

use crate::integrity::sha256;

/// Mosaic seeds are reduced into `0..MOSAIC_SEED_MODULUS`.
pub const MOSAIC_SEED_MODULUS: u64 = 100_000_000;

/// SHA-256 of the fingerprint string immediately followed by the decimal page
/// index.
pub fn page_digest(fingerprint: &Fingerprint, page_index: usize) -> [u8; 32] {
    let material = format!("{fingerprint}{page_index}");
    sha256(material.as_bytes())
}

/// Payload embedded into page `page_index`. Every page carries its own value.
pub fn payload_for_page(fingerprint: &Fingerprint, page_index: usize) -> Payload {
    Payload(page_digest(fingerprint, page_index))
}

/// Seed for the tile permutation of page `page_index`: the page digest read
/// as a big-endian integer, modulo 10^8.
pub fn mosaic_seed(fingerprint: &Fingerprint, page_index: usize) -> u64 {
    page_digest(fingerprint, page_index)
        .iter()
        .fold(0u64, |acc, byte| (acc * 256 + u64::from(*byte)) % MOSAIC_SEED_MODULUS)
}
