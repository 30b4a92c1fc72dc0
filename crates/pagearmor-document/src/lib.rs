// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagearmor-document — Document hardening for PageArmor.
//
// Provides the per-page transform chain (resample, contrast, watermark,
// mosaic, steganographic payload), the block scheduler that bounds memory
// across long documents, image-only PDF assembly, and the rasterizer and
// flattener collaborators.

pub mod harden;
pub mod image;
pub mod pdf;
pub mod pipeline;
pub mod tools;

// Re-export the primary structs so callers can use `pagearmor_document::HardeningPipeline` etc.
pub use harden::{PageHardener, harden};
pub use crate::image::processor::ImageProcessor;
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfAssembler;
pub use pipeline::{BlockScheduler, CancellationToken, HardeningPipeline, schedule};
pub use tools::{
    Flattener, GhostscriptFlattener, GhostscriptRasterizer, GhostscriptSession, ImageRasterizer,
    PassthroughFlattener, RasterSession, Rasterizer, ScratchDir, StubRasterizer,
};
