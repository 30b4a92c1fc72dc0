// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hardening, flattening, and pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ArmorError, Result};

/// Compatibility levels the flattening backend understands.
const COMPATIBILITY_LEVELS: [&str; 5] = ["1.3", "1.4", "1.5", "1.6", "1.7"];

/// Upper bound on the reserved payload band, in rows.
pub const MAX_STEGO_BAND_ROWS: u32 = 20;

/// Where the watermark text is drawn on each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkPlacement {
    /// Repeat the text horizontally across a band through the vertical centre.
    Band,
    /// Draw the text once, centred on the page.
    Centered,
}

/// Watermark overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Owner tag printed before the page number and fingerprint fragment.
    pub owner_tag: String,
    /// Overlay alpha (0-255). Low values keep the page legible.
    pub alpha: u8,
    pub placement: WatermarkPlacement,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            owner_tag: "PROTECTED".to_string(),
            alpha: 18,
            placement: WatermarkPlacement::Band,
        }
    }
}

/// Parameters of the per-page transform chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardenConfig {
    /// Shrink factor for the double resample, in (0, 1].
    pub resample_factor: f32,
    /// Contrast multiplier, in (0, 1].
    pub contrast_factor: f32,
    /// Brightness multiplier applied after contrast.
    pub brightness_factor: f32,
    /// Mosaic grid is `grid_size` x `grid_size` tiles.
    pub grid_size: u32,
    /// Gaussian sigma applied to each mosaic tile.
    pub tile_blur_sigma: f32,
    /// Height of the reserved top band carrying the payload.
    pub stego_band_rows: u32,
    pub watermark: WatermarkConfig,
}

impl Default for HardenConfig {
    fn default() -> Self {
        Self {
            resample_factor: 0.975,
            contrast_factor: 0.965,
            brightness_factor: 1.01,
            grid_size: 10,
            tile_blur_sigma: 0.6,
            stego_band_rows: 20,
            watermark: WatermarkConfig::default(),
        }
    }
}

impl HardenConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.resample_factor > 0.0 && self.resample_factor <= 1.0) {
            return Err(ArmorError::InvalidConfig(format!(
                "resample_factor must be in (0, 1], got {}",
                self.resample_factor
            )));
        }
        if !(self.contrast_factor > 0.0 && self.contrast_factor <= 1.0) {
            return Err(ArmorError::InvalidConfig(format!(
                "contrast_factor must be in (0, 1], got {}",
                self.contrast_factor
            )));
        }
        if !(self.brightness_factor > 0.0 && self.brightness_factor.is_finite()) {
            return Err(ArmorError::InvalidConfig(format!(
                "brightness_factor must be positive, got {}",
                self.brightness_factor
            )));
        }
        if self.grid_size == 0 {
            return Err(ArmorError::InvalidConfig("grid_size must be at least 1".into()));
        }
        if !(self.tile_blur_sigma > 0.0 && self.tile_blur_sigma.is_finite()) {
            return Err(ArmorError::InvalidConfig(format!(
                "tile_blur_sigma must be positive, got {}",
                self.tile_blur_sigma
            )));
        }
        if !(1..=MAX_STEGO_BAND_ROWS).contains(&self.stego_band_rows) {
            return Err(ArmorError::InvalidConfig(format!(
                "stego_band_rows must be in 1..={MAX_STEGO_BAND_ROWS}, got {}",
                self.stego_band_rows
            )));
        }
        Ok(())
    }
}

/// Settings passed to the external flattening tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Target PDF version, e.g. "1.4".
    pub compatibility_level: String,
    /// Colour image DPI after downsampling.
    pub color_image_resolution: u32,
    /// Coerce the output to an archival (PDF/A) profile.
    pub archival_profile: bool,
    /// Name or path of the Ghostscript executable.
    pub ghostscript_binary: String,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            compatibility_level: "1.4".to_string(),
            color_image_resolution: 120,
            archival_profile: false,
            ghostscript_binary: "gs".to_string(),
        }
    }
}

impl FlattenConfig {
    pub fn validate(&self) -> Result<()> {
        if !COMPATIBILITY_LEVELS.contains(&self.compatibility_level.as_str()) {
            return Err(ArmorError::InvalidConfig(format!(
                "unsupported compatibility level {:?}",
                self.compatibility_level
            )));
        }
        if self.color_image_resolution == 0 {
            return Err(ArmorError::InvalidConfig(
                "color_image_resolution must be at least 1".into(),
            ));
        }
        if self.ghostscript_binary.trim().is_empty() {
            return Err(ArmorError::InvalidConfig(
                "ghostscript_binary must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// End-to-end settings for one hardening request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of full-resolution pages held in memory at once.
    pub block_size: usize,
    /// Rasterization resolution; the rasterizer receives `render_dpi / 72`.
    pub render_dpi: f32,
    /// Run the flattening stage after assembly.
    pub flatten_enabled: bool,
    /// Harden the pages of a block on the rayon thread pool.
    pub parallel_pages: bool,
    pub harden: HardenConfig,
    pub flatten: FlattenConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            block_size: 25,
            render_dpi: 150.0,
            flatten_enabled: true,
            parallel_pages: true,
            harden: HardenConfig::default(),
            flatten: FlattenConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Rasterizer scale relative to the 72 DPI baseline.
    pub fn render_scale(&self) -> f32 {
        self.render_dpi / 72.0
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(ArmorError::InvalidConfig("block_size must be at least 1".into()));
        }
        if !(self.render_dpi > 0.0 && self.render_dpi.is_finite()) {
            return Err(ArmorError::InvalidConfig(format!(
                "render_dpi must be positive, got {}",
                self.render_dpi
            )));
        }
        self.harden.validate()?;
        self.flatten.validate()
    }
}
