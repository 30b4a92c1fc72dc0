// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub collaborators for tests, benchmarks, and runs without Ghostscript.
//
// `StubRasterizer` serves pre-rendered bitmaps; `PassthroughFlattener` returns
// the assembled PDF unchanged.

use image::Rgb;
use pagearmor_core::error::{ArmorError, Result};
use pagearmor_core::{FlattenConfig, PageBitmap};

use crate::tools::traits::{Flattener, Rasterizer};

/// Rasterizer that ignores its input and serves a fixed list of pages.
#[derive(Debug, Clone, Default)]
pub struct StubRasterizer {
    pages: Vec<PageBitmap>,
}

impl StubRasterizer {
    pub fn new(pages: Vec<PageBitmap>) -> Self {
        Self { pages }
    }

    /// `count` identical pages of a single colour.
    pub fn uniform(count: usize, width: u32, height: u32, color: [u8; 3]) -> Self {
        Self::new(vec![PageBitmap::from_pixel(width, height, Rgb(color)); count])
    }

    pub fn pages(&self) -> &[PageBitmap] {
        &self.pages
    }
}

impl Rasterizer for StubRasterizer {
    fn page_count(&self, _input: &[u8]) -> Result<usize> {
        Ok(self.pages.len())
    }

    fn render(&self, _input: &[u8], page_index: usize, _scale: f32) -> Result<PageBitmap> {
        self.pages.get(page_index).cloned().ok_or_else(|| {
            ArmorError::RenderFailure(format!(
                "page {} out of range (document has {} pages)",
                page_index,
                self.pages.len()
            ))
        })
    }
}

/// Flattener that performs no rewriting.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughFlattener;

impl Flattener for PassthroughFlattener {
    fn flatten(&self, document: &[u8], _config: &FlattenConfig) -> Result<Vec<u8>> {
        tracing::debug!("Flattening skipped (passthrough)");
        Ok(document.to_vec())
    }
}
