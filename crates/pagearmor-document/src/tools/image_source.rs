// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process rasterizer for inputs that are already raster images.

use pagearmor_core::PageBitmap;
use pagearmor_core::error::{ArmorError, Result};
use tracing::instrument;

use crate::image::processor::ImageProcessor;
use crate::tools::traits::Rasterizer;

/// Treats a single PNG, JPEG, or TIFF image as a one-page document.
///
/// The image is already a raster, so it is used at its native resolution and
/// `scale` is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageRasterizer;

impl Rasterizer for ImageRasterizer {
    fn page_count(&self, input: &[u8]) -> Result<usize> {
        image::guess_format(input)
            .map(|_| 1)
            .map_err(|err| ArmorError::RenderFailure(format!("unrecognised image: {err}")))
    }

    #[instrument(skip(self, input), fields(bytes_len = input.len()))]
    fn render(&self, input: &[u8], page_index: usize, _scale: f32) -> Result<PageBitmap> {
        if page_index != 0 {
            return Err(ArmorError::RenderFailure(format!(
                "page {page_index} out of range (image inputs have one page)"
            )));
        }
        ImageProcessor::from_bytes(input)
            .map(ImageProcessor::into_bitmap)
            .map_err(|err| ArmorError::RenderFailure(err.to_string()))
    }
}
