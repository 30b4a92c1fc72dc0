// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Watermark compositing — draws identifying text at low alpha on a
// transparent overlay and blends it over the page.

use image::{DynamicImage, Rgba, RgbaImage, imageops};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use pagearmor_core::{Fingerprint, PageBitmap, WatermarkConfig, WatermarkPlacement};
use tracing::{debug, instrument};

use crate::image::glyphs::{self, GLYPH_ADVANCE, GLYPH_HEIGHT};

/// Ink colour of the watermark before alpha is applied.
const INK: [u8; 3] = [96, 96, 96];

/// Blank characters inserted between repetitions in band placement.
const BAND_GAP_CHARS: u32 = 3;

/// Text drawn on page `page_index`: owner tag, 1-based page number, and the
/// short fingerprint fragment.
pub fn watermark_text(owner_tag: &str, page_index: usize, fingerprint: &Fingerprint) -> String {
    format!(
        "{} P{} {}",
        owner_tag.trim().to_uppercase(),
        page_index + 1,
        fingerprint.short().to_uppercase()
    )
}

/// Pixel size of one glyph cell for a page of the given dimensions.
pub fn cell_size(width: u32, height: u32) -> u32 {
    (width.min(height) / 150).max(1)
}

/// Render `text` onto a transparent overlay the size of the page.
pub fn render_overlay(width: u32, height: u32, text: &str, config: &WatermarkConfig) -> RgbaImage {
    let mut overlay = RgbaImage::new(width, height);
    if config.alpha == 0 || text.is_empty() {
        return overlay;
    }

    let cell = cell_size(width, height);
    let text_w = glyphs::text_width_cells(text) * cell;
    let text_h = GLYPH_HEIGHT * cell;
    let y = height.saturating_sub(text_h) / 2;
    let ink = Rgba([INK[0], INK[1], INK[2], config.alpha]);

    match config.placement {
        WatermarkPlacement::Centered => {
            let x = width.saturating_sub(text_w) / 2;
            draw_text(&mut overlay, text, x, y, cell, ink);
        }
        WatermarkPlacement::Band => {
            let step = text_w + (BAND_GAP_CHARS * GLYPH_ADVANCE + 1) * cell;
            let mut x = 0;
            while x < width {
                draw_text(&mut overlay, text, x, y, cell, ink);
                x += step;
            }
        }
    }

    overlay
}

/// Blend the watermark for `text` over `page`.
#[instrument(skip(page, config), fields(width = page.width(), height = page.height()))]
pub fn apply_watermark(page: PageBitmap, text: &str, config: &WatermarkConfig) -> PageBitmap {
    let (width, height) = page.dimensions();
    let overlay = render_overlay(width, height, text, config);

    let mut base = DynamicImage::ImageRgb8(page).to_rgba8();
    imageops::overlay(&mut base, &overlay, 0, 0);
    debug!(alpha = config.alpha, placement = ?config.placement, "Watermark composited");

    DynamicImage::ImageRgba8(base).to_rgb8()
}

fn draw_text(canvas: &mut RgbaImage, text: &str, x: u32, y: u32, cell: u32, ink: Rgba<u8>) {
    for (position, c) in text.chars().enumerate() {
        let origin_x = x as i64 + position as i64 * (GLYPH_ADVANCE * cell) as i64;
        if origin_x >= canvas.width() as i64 {
            break;
        }
        for (col, row) in glyphs::lit_cells(c) {
            let rect = Rect::at(
                (origin_x + (col * cell) as i64) as i32,
                (y + row * cell) as i32,
            )
            .of_size(cell, cell);
            draw_filled_rect_mut(canvas, rect, ink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn fingerprint() -> Fingerprint {
        Fingerprint::new("a1b2c3d4e5f60718", "0000000000000000")
    }

    #[test]
    fn text_carries_owner_page_and_fragment() {
        let text = watermark_text("acme", 0, &fingerprint());
        assert_eq!(text, "ACME P1 A1B2C3D4");
    }

    #[test]
    fn overlay_uses_configured_alpha_only() {
        let config = WatermarkConfig::default();
        let overlay = render_overlay(200, 300, "PROTECTED P1 A1B2C3D4", &config);
        let alphas: std::collections::BTreeSet<u8> = overlay.pixels().map(|p| p.0[3]).collect();
        assert_eq!(alphas.into_iter().collect::<Vec<_>>(), vec![0, 18]);
    }

    #[test]
    fn band_repeats_across_the_width() {
        let config = WatermarkConfig::default();
        let overlay = render_overlay(600, 200, "AB", &config);
        let lit_columns = (0..600)
            .filter(|x| (0..200).any(|y| overlay.get_pixel(*x, y).0[3] > 0))
            .count();
        // "AB" is 11 cells wide; a single copy cannot light more than that.
        assert!(lit_columns > 11 * cell_size(600, 200) as usize);
    }

    #[test]
    fn centered_draws_a_single_copy() {
        let config = WatermarkConfig {
            placement: WatermarkPlacement::Centered,
            ..WatermarkConfig::default()
        };
        let overlay = render_overlay(600, 200, "AB", &config);
        let lit: Vec<u32> = (0..600)
            .filter(|x| (0..200).any(|y| overlay.get_pixel(*x, y).0[3] > 0))
            .collect();
        let span = lit.last().unwrap() - lit.first().unwrap() + 1;
        assert!(span <= 11 * cell_size(600, 200));
    }

    #[test]
    fn watermark_marks_a_white_page() {
        let page = PageBitmap::from_pixel(200, 300, Rgb([255, 255, 255]));
        let marked = apply_watermark(page.clone(), "PROTECTED P1 A1B2C3D4", &WatermarkConfig::default());
        assert_eq!(marked.dimensions(), (200, 300));
        assert_ne!(marked.as_raw(), page.as_raw());
        // Low alpha keeps marked pixels light.
        assert!(marked.pixels().all(|p| p.0[0] > 200));
    }

    #[test]
    fn zero_alpha_leaves_page_untouched() {
        let page = PageBitmap::from_pixel(50, 50, Rgb([10, 200, 30]));
        let config = WatermarkConfig {
            alpha: 0,
            ..WatermarkConfig::default()
        };
        let marked = apply_watermark(page.clone(), "TEXT", &config);
        assert_eq!(marked.as_raw(), page.as_raw());
    }
}
