// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mosaic fragmentation — cuts the page into a grid of tiles, blurs each tile,
// and reassembles them in a seeded permutation.

use image::imageops;
use imageproc::filter::gaussian_blur_f32;
use pagearmor_core::PageBitmap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use crate::image::processor::ImageProcessor;

/// One cell of the grid partition, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Row-major position in the grid.
    pub index: usize,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Grid size actually used for a page: never more tiles per axis than pixels,
/// so every tile is at least one pixel wide and tall.
pub fn effective_grid(width: u32, height: u32, grid_size: u32) -> u32 {
    grid_size.min(width).min(height).max(1)
}

/// Partition a `width` x `height` page into `grid_size` x `grid_size` tiles,
/// enumerated row-major.
///
/// Cell edges sit at `i * len / grid_size`, so tiles differ in size by at most
/// one pixel and exactly cover the page without overlap.
pub fn tile_layout(width: u32, height: u32, grid_size: u32) -> Vec<Tile> {
    let grid = effective_grid(width, height, grid_size);
    let edge = |len: u32, i: u32| (u64::from(len) * u64::from(i) / u64::from(grid)) as u32;

    let mut tiles = Vec::with_capacity((grid * grid) as usize);
    for row in 0..grid {
        let (y0, y1) = (edge(height, row), edge(height, row + 1));
        for col in 0..grid {
            let (x0, x1) = (edge(width, col), edge(width, col + 1));
            tiles.push(Tile {
                index: tiles.len(),
                x: x0,
                y: y0,
                width: x1 - x0,
                height: y1 - y0,
            });
        }
    }
    tiles
}

/// Seeded shuffle of `0..count`. Entry `slot` names the source tile placed
/// at destination `slot`.
pub fn permutation(seed: u64, count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..count).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    order
}

/// Blur every tile of `page` and place it according to the permutation
/// derived from `seed`.
///
/// Identical `(page, grid_size, seed, blur_sigma)` always produce identical
/// output. A source tile whose size differs from its destination slot is
/// resized to fit.
#[instrument(skip(page), fields(width = page.width(), height = page.height()))]
pub fn apply_mosaic(page: &PageBitmap, grid_size: u32, seed: u64, blur_sigma: f32) -> PageBitmap {
    let (width, height) = page.dimensions();
    let tiles = tile_layout(width, height, grid_size);
    let order = permutation(seed, tiles.len());

    let mut output = PageBitmap::new(width, height);
    for (slot, source_index) in order.iter().enumerate() {
        let source = tiles[*source_index];
        let dest = tiles[slot];

        let cut = imageops::crop_imm(page, source.x, source.y, source.width, source.height)
            .to_image();
        let blurred = gaussian_blur_f32(&cut, blur_sigma);
        let fitted = ImageProcessor::from_bitmap(blurred)
            .resize_exact(dest.width, dest.height)
            .into_bitmap();

        imageops::replace(&mut output, &fitted, i64::from(dest.x), i64::from(dest.y));
    }

    debug!(tiles = tiles.len(), seed, "Mosaic applied");
    output
}
