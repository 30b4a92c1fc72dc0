// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability traits for the two native tools the pipeline drives but does not
// implement.

use pagearmor_core::error::Result;
use pagearmor_core::{FlattenConfig, PageBitmap};

/// Turns pages of an input document into RGB bitmaps.
pub trait Rasterizer {
    /// Number of pages in `input`.
    ///
    /// Fails with `RenderFailure` if `input` is not a paginated document.
    fn page_count(&self, input: &[u8]) -> Result<usize>;

    /// Render page `page_index` (0-based) of `input`.
    ///
    /// `scale` multiplies a 72 DPI baseline, so 150 DPI is `150.0 / 72.0`.
    /// Fails with `RenderFailure` when the input cannot be parsed or the
    /// index is out of range.
    fn render(&self, input: &[u8], page_index: usize, scale: f32) -> Result<PageBitmap>;

    /// Prepare `input` once for rendering many of its pages.
    ///
    /// The default session forwards to [`Rasterizer::page_count`] and
    /// [`Rasterizer::render`]. Tools that need the input on disk override this
    /// to stage it a single time per document.
    fn open<'a>(&'a self, input: &'a [u8]) -> Result<Box<dyn RasterSession + 'a>> {
        let page_count = self.page_count(input)?;
        Ok(Box::new(DirectSession {
            rasterizer: self,
            input,
            page_count,
        }))
    }
}

/// One input document opened for rasterization.
///
/// Resources held by the session (staged files, scratch directories) are
/// released when it is dropped.
pub trait RasterSession {
    fn page_count(&self) -> usize;

    /// Render page `page_index` at `scale`; same contract as
    /// [`Rasterizer::render`].
    fn render(&mut self, page_index: usize, scale: f32) -> Result<PageBitmap>;
}

/// Session that keeps a borrowed input and renders through its rasterizer.
struct DirectSession<'a, R: ?Sized> {
    rasterizer: &'a R,
    input: &'a [u8],
    page_count: usize,
}

impl<R: Rasterizer + ?Sized> RasterSession for DirectSession<'_, R> {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render(&mut self, page_index: usize, scale: f32) -> Result<PageBitmap> {
        self.rasterizer.render(self.input, page_index, scale)
    }
}

/// Rewrites an image-only PDF: strips metadata, downsamples, and optionally
/// coerces it to an archival profile.
pub trait Flattener {
    /// Fails with `FlattenFailure` carrying the tool's diagnostics.
    fn flatten(&self, document: &[u8], config: &FlattenConfig) -> Result<Vec<u8>>;
}
