// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — double resample, contrast and brightness perturbation on
// RGB page bitmaps. Operates on in-memory images using the `image` crate.

use image::imageops::{self, FilterType};
use image::ImageFormat;
use pagearmor_core::PageBitmap;
use pagearmor_core::error::ArmorError;
use tracing::{debug, instrument};

/// Pixel-level processing pipeline operating on a single page bitmap.
///
/// All operations consume `self` and return a new `ImageProcessor` wrapping
/// the transformed bitmap, enabling method chaining.
///
/// ```ignore
/// let page = ImageProcessor::from_bitmap(bitmap)
///     .double_resample(0.975)
///     .adjust_contrast(0.965)
///     .scale_brightness(1.01)
///     .into_bitmap();
/// ```
pub struct ImageProcessor {
    /// The current working bitmap.
    image: PageBitmap,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode encoded image bytes (PNG, JPEG, TIFF) into an RGB bitmap.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, ArmorError> {
        let img = image::load_from_memory(data).map_err(|err| {
            ArmorError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self {
            image: img.to_rgb8(),
        })
    }

    /// Wrap an already-decoded bitmap.
    pub fn from_bitmap(image: PageBitmap) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_bitmap(&self) -> &PageBitmap {
        &self.image
    }

    pub fn into_bitmap(self) -> PageBitmap {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Resize to exactly `width` x `height` with Lanczos3 filtering.
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        if (width, height) == self.image.dimensions() {
            return self;
        }
        let resized = imageops::resize(&self.image, width, height, FilterType::Lanczos3);
        Self { image: resized }
    }

    /// Shrink by `factor` then scale back up to the original size with a
    /// smoothing (triangle) filter.
    ///
    /// `factor` is clamped to (0, 1]; both intermediate dimensions are kept at
    /// one pixel or more. The output always has the input's dimensions.
    #[instrument(skip(self))]
    pub fn double_resample(self, factor: f32) -> Self {
        let (width, height) = self.image.dimensions();
        let factor = factor.clamp(f32::MIN_POSITIVE, 1.0);
        let small_w = ((width as f32 * factor).round() as u32).max(1);
        let small_h = ((height as f32 * factor).round() as u32).max(1);

        debug!(width, height, small_w, small_h, "Double resample");

        let shrunk = imageops::resize(&self.image, small_w, small_h, FilterType::Triangle);
        let restored = imageops::resize(&shrunk, width, height, FilterType::Triangle);
        Self { image: restored }
    }

    /// Adjust contrast by a factor around mid-grey. Values < 1.0 flatten the
    /// image towards grey; 1.0 is a no-op.
    #[instrument(skip(self))]
    pub fn adjust_contrast(mut self, factor: f32) -> Self {
        for pixel in self.image.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                let val = factor * (*channel as f32 - 128.0) + 128.0;
                *channel = val.clamp(0.0, 255.0) as u8;
            }
        }
        self
    }

    /// Multiply every channel by `factor`, clamping to the 8-bit range.
    #[instrument(skip(self))]
    pub fn scale_brightness(mut self, factor: f32) -> Self {
        if (factor - 1.0).abs() < f32::EPSILON {
            return self;
        }
        for pixel in self.image.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                let val = (*channel as f32 * factor).round();
                *channel = val.clamp(0.0, 255.0) as u8;
            }
        }
        self
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current bitmap as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, ArmorError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| ArmorError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}
