// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hardening transform chain — the fixed per-page sequence of resample,
// contrast/brightness perturbation, watermark, mosaic, and payload embedding.

pub mod mosaic;
pub mod stego;
pub mod watermark;

use pagearmor_core::error::Result;
use pagearmor_core::{Fingerprint, HardenConfig, PageBitmap, ensure_geometry};
use pagearmor_security::{mosaic_seed, payload_for_page};
use tracing::{debug, instrument};

use crate::image::processor::ImageProcessor;

/// Applies the transform chain for one document.
///
/// Holds only shared, read-only state (configuration and fingerprint), so a
/// single hardener can be used from several threads at once.
#[derive(Debug, Clone, Copy)]
pub struct PageHardener<'a> {
    config: &'a HardenConfig,
    fingerprint: &'a Fingerprint,
}

impl<'a> PageHardener<'a> {
    /// Fails with `InvalidConfig` when `config` is out of range.
    pub fn new(config: &'a HardenConfig, fingerprint: &'a Fingerprint) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fingerprint,
        })
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        self.fingerprint
    }

    /// Harden one page bitmap. Output dimensions equal input dimensions.
    ///
    /// Fails with `InvalidGeometry` for a zero-width or zero-height bitmap.
    #[instrument(skip(self, bitmap), fields(width = bitmap.width(), height = bitmap.height()))]
    pub fn harden(&self, bitmap: PageBitmap, page_index: usize) -> Result<PageBitmap> {
        ensure_geometry(&bitmap, page_index)?;
        let config = self.config;

        let perturbed = ImageProcessor::from_bitmap(bitmap)
            .double_resample(config.resample_factor)
            .adjust_contrast(config.contrast_factor)
            .scale_brightness(config.brightness_factor)
            .into_bitmap();

        let text = watermark::watermark_text(
            &config.watermark.owner_tag,
            page_index,
            self.fingerprint,
        );
        let marked = watermark::apply_watermark(perturbed, &text, &config.watermark);

        let seed = mosaic_seed(self.fingerprint, page_index);
        let tiled = mosaic::apply_mosaic(&marked, config.grid_size, seed, config.tile_blur_sigma);
        drop(marked);

        let payload = payload_for_page(self.fingerprint, page_index);
        let (hardened, bits) = stego::embed_payload(tiled, &payload, config.stego_band_rows);

        debug!(page_index, seed, payload_bits = bits, "Page hardened");
        Ok(hardened)
    }
}

/// Harden a single page with the given fingerprint and configuration.
pub fn harden(
    bitmap: PageBitmap,
    page_index: usize,
    fingerprint: &Fingerprint,
    config: &HardenConfig,
) -> Result<PageBitmap> {
    PageHardener::new(config, fingerprint)?.harden(bitmap, page_index)
}
