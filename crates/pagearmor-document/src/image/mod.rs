// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — resampling, contrast/brightness perturbation, and the bitmap
// glyphs used to draw watermark text.

pub mod glyphs;
pub mod processor;

pub use processor::ImageProcessor;
