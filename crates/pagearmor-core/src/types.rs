// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the PageArmor hardening pipeline.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::{ArmorError, Result};

/// Number of bytes in a steganographic payload.
pub const PAYLOAD_BYTES: usize = 32;

/// Number of bits in a steganographic payload.
pub const PAYLOAD_BITS: usize = PAYLOAD_BYTES * 8;

/// RGB, 8 bits per channel.
pub type PageBitmap = RgbImage;

/// One rasterized page with its stable 0-based index.
#[derive(Debug, Clone)]
pub struct Page {
    pub index: usize,
    pub bitmap: PageBitmap,
}

impl Page {
    pub fn new(index: usize, bitmap: PageBitmap) -> Self {
        Self { index, bitmap }
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    /// Fail with `InvalidGeometry` when either dimension is zero.
    pub fn ensure_geometry(&self) -> Result<()> {
        ensure_geometry(&self.bitmap, self.index)
    }
}

/// Fail with `InvalidGeometry` when either dimension of `bitmap` is zero.
pub fn ensure_geometry(bitmap: &PageBitmap, page_index: usize) -> Result<()> {
    let (width, height) = bitmap.dimensions();
    if width == 0 || height == 0 {
        return Err(ArmorError::InvalidGeometry {
            page_index,
            width,
            height,
        });
    }
    Ok(())
}

/// Per-document identifier: a content hash joined to run entropy.
///
/// Rendered as `<content>-<random>`, both parts lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    content: String,
    random: String,
}

impl Fingerprint {
    pub const SEPARATOR: char = '-';

    pub fn new(content: impl Into<String>, random: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            random: random.into(),
        }
    }

    /// Hex digest derived from the input bytes; reproducible.
    pub fn content_component(&self) -> &str {
        &self.content
    }

    /// Hex digest of run entropy; differs between runs unless the entropy
    /// source is seeded.
    pub fn random_component(&self) -> &str {
        &self.random
    }

    /// First eight characters, used where a compact tag is needed.
    pub fn short(&self) -> &str {
        match self.content.char_indices().nth(8) {
            Some((end, _)) => &self.content[..end],
            None => &self.content,
        }
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.content, Self::SEPARATOR, self.random)
    }
}

/// 256-bit sequence embedded into the reserved band of a hardened page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Payload(pub [u8; PAYLOAD_BYTES]);

impl Payload {
    /// Bit `index` of the payload, most significant bit of each byte first.
    pub fn bit(&self, index: usize) -> bool {
        let byte = self.0[index / 8];
        (byte >> (7 - (index % 8))) & 1 == 1
    }

    /// Iterate over all bits in embedding order.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..PAYLOAD_BITS).map(|index| self.bit(index))
    }

    /// Rebuild a payload from bits in embedding order. Missing trailing bits
    /// are zero.
    pub fn from_bits(bits: &[bool]) -> Self {
        let mut bytes = [0u8; PAYLOAD_BYTES];
        for (index, bit) in bits.iter().take(PAYLOAD_BITS).enumerate() {
            if *bit {
                bytes[index / 8] |= 1 << (7 - (index % 8));
            }
        }
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Final artifact of one hardening request.
#[derive(Debug, Clone)]
pub struct HardenedDocument {
    /// The flattened (or, with flattening disabled, assembled) PDF bytes.
    pub bytes: Vec<u8>,
    pub fingerprint: Fingerprint,
    pub page_count: usize,
}
