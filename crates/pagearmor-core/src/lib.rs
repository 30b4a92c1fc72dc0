// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PageArmor — Core types, configuration, and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::{FlattenConfig, HardenConfig, PipelineConfig, WatermarkConfig, WatermarkPlacement};
pub use error::ArmorError;
pub use types::*;
