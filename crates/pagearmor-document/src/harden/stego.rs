// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Steganographic payload — writes payload bits into the least significant bit
// of the red channel across a reserved top band, scanning row-major.
//
// The signal is fragile: any lossy re-encoding between embedding and reading
// destroys it.

use pagearmor_core::{PAYLOAD_BITS, PageBitmap, Payload};
use tracing::{debug, warn};

/// Number of pixels available in the top `band_rows` rows of a page.
pub fn band_capacity(width: u32, height: u32, band_rows: u32) -> usize {
    width as usize * band_rows.min(height) as usize
}

/// Pixel coordinates of the band in scan order.
fn band_positions(width: u32, height: u32, band_rows: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..band_rows.min(height)).flat_map(move |y| (0..width).map(move |x| (x, y)))
}

/// Embed `payload` into `page`, returning the page and the number of bits
/// written.
///
/// When the band holds fewer than 256 pixels only that many leading bits are
/// written; the rest of the payload is dropped.
pub fn embed_payload(mut page: PageBitmap, payload: &Payload, band_rows: u32) -> (PageBitmap, usize) {
    let (width, height) = page.dimensions();
    let mut written = 0;

    for ((x, y), bit) in band_positions(width, height, band_rows).zip(payload.bits()) {
        let pixel = page.get_pixel_mut(x, y);
        pixel.0[0] = (pixel.0[0] & !1) | u8::from(bit);
        written += 1;
    }

    if written < PAYLOAD_BITS {
        warn!(
            written,
            capacity = band_capacity(width, height, band_rows),
            "Reserved band too small; payload truncated"
        );
    } else {
        debug!(written, "Payload embedded");
    }
    (page, written)
}

/// Read a payload back from the reserved band.
///
/// Returns the payload (unreadable trailing bits are zero) and how many bits
/// were actually available.
pub fn extract_payload(page: &PageBitmap, band_rows: u32) -> (Payload, usize) {
    let (width, height) = page.dimensions();
    let bits: Vec<bool> = band_positions(width, height, band_rows)
        .take(PAYLOAD_BITS)
        .map(|(x, y)| page.get_pixel(x, y).0[0] & 1 == 1)
        .collect();
    (Payload::from_bits(&bits), bits.len())
}
