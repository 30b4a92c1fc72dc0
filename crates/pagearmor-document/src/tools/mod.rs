// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// External collaborators — rasterizing input documents and flattening the
// assembled output. Capability traits live in `traits`; Ghostscript-backed,
// in-process, and stub implementations sit beside them.

pub mod ghostscript;
pub mod image_source;
pub mod scratch;
pub mod stub;
pub mod traits;

pub use ghostscript::{GhostscriptFlattener, GhostscriptRasterizer, GhostscriptSession};
pub use image_source::ImageRasterizer;
pub use scratch::ScratchDir;
pub use stub::{PassthroughFlattener, StubRasterizer};
pub use traits::{Flattener, RasterSession, Rasterizer};
