// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Block scheduler — walks the page range in fixed-size windows so only one
// block of full-resolution rasters is in flight at a time.

use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pagearmor_core::error::{ArmorError, Result};
use pagearmor_core::{Page, PageBitmap};
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::harden::PageHardener;

/// Split `0..total_pages` into ascending, contiguous, non-overlapping ranges of
/// at most `block_size` pages.
///
/// Fails with `EmptyDocument` for zero pages and `InvalidConfig` for a zero
/// block size.
pub fn schedule(total_pages: usize, block_size: usize) -> Result<Vec<Range<usize>>> {
    if block_size == 0 {
        return Err(ArmorError::InvalidConfig("block_size must be at least 1".into()));
    }
    if total_pages == 0 {
        return Err(ArmorError::EmptyDocument);
    }
    Ok((0..total_pages)
        .step_by(block_size)
        .map(|start| start..(start + block_size).min(total_pages))
        .collect())
}

/// Cooperative cancellation flag shared between a run and its controller.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once `cancel` has been called.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ArmorError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Drives the transform chain over a document block by block.
pub struct BlockScheduler<'a> {
    hardener: PageHardener<'a>,
    block_size: usize,
    parallel: bool,
    cancel: CancellationToken,
}

impl<'a> BlockScheduler<'a> {
    pub fn new(hardener: PageHardener<'a>, block_size: usize) -> Self {
        Self {
            hardener,
            block_size,
            parallel: true,
            cancel: CancellationToken::new(),
        }
    }

    /// Harden the pages of a block on the rayon pool (default) or one by one.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Render and harden all `total_pages` pages, returning them in original
    /// page order.
    ///
    /// `render` is called once per page index, sequentially and in ascending
    /// order. On error or cancellation nothing is returned and all pages
    /// accumulated so far are dropped.
    #[instrument(skip(self, render), fields(block_size = self.block_size, parallel = self.parallel))]
    pub fn run<F>(&self, total_pages: usize, mut render: F) -> Result<Vec<PageBitmap>>
    where
        F: FnMut(usize) -> Result<PageBitmap>,
    {
        let blocks = schedule(total_pages, self.block_size)?;
        info!(total_pages, blocks = blocks.len(), "Hardening document");

        let mut hardened: Vec<PageBitmap> = Vec::with_capacity(total_pages);
        for (block_number, block) in blocks.into_iter().enumerate() {
            self.cancel.check()?;
            debug!(block_number, start = block.start, end = block.end, "Processing block");

            let pages = block
                .map(|index| render(index).map(|bitmap| Page::new(index, bitmap)))
                .collect::<Result<Vec<Page>>>()?;

            let done = self.harden_block(pages)?;
            hardened.extend(done);
        }

        self.cancel.check()?;
        info!(pages = hardened.len(), "All blocks hardened");
        Ok(hardened)
    }

    /// Harden one block, preserving the order of `pages`.
    fn harden_block(&self, pages: Vec<Page>) -> Result<Vec<PageBitmap>> {
        let hardener = self.hardener;
        if self.parallel {
            pages
                .into_par_iter()
                .map(|page| hardener.harden(page.bitmap, page.index))
                .collect()
        } else {
            pages
                .into_iter()
                .map(|page| hardener.harden(page.bitmap, page.index))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use pagearmor_core::{Fingerprint, HardenConfig};

    #[test]
    fn fifty_seven_pages_in_blocks_of_twenty_five() {
        assert_eq!(schedule(57, 25).unwrap(), vec![0..25, 25..50, 50..57]);
    }

    #[test]
    fn zero_pages_is_an_empty_document() {
        assert!(matches!(schedule(0, 25), Err(ArmorError::EmptyDocument)));
    }

    #[test]
    fn zero_block_size_is_rejected() {
        assert!(matches!(schedule(10, 0), Err(ArmorError::InvalidConfig(_))));
    }

    #[test]
    fn blocks_cover_every_index_exactly_once() {
        for total in 1..60 {
            for block_size in [1, 2, 7, 25, 100] {
                let blocks = schedule(total, block_size).unwrap();
                let flattened: Vec<usize> = blocks.iter().cloned().flatten().collect();
                assert_eq!(flattened, (0..total).collect::<Vec<_>>());
                assert!(blocks.iter().all(|b| !b.is_empty() && b.len() <= block_size));
            }
        }
    }

    fn fingerprint() -> Fingerprint {
        Fingerprint::new("feedfacecafebeef", "0123456789abcdef")
    }

    fn hardener<'a>(config: &'a HardenConfig, fp: &'a Fingerprint) -> PageHardener<'a> {
        PageHardener::new(config, fp).unwrap()
    }

    /// Pages of distinct widths so their order is visible after hardening.
    fn render_by_width(index: usize) -> Result<PageBitmap> {
        Ok(PageBitmap::from_pixel(20 + index as u32, 30, Rgb([255, 255, 255])))
    }

    #[test]
    fn pages_come_back_in_original_order() {
        let config = HardenConfig::default();
        let fp = fingerprint();
        for parallel in [true, false] {
            let scheduler =
                BlockScheduler::new(hardener(&config, &fp), 2).with_parallel(parallel);
            let pages = scheduler.run(5, render_by_width).unwrap();
            let widths: Vec<u32> = pages.iter().map(|p| p.width()).collect();
            assert_eq!(widths, vec![20, 21, 22, 23, 24]);
        }
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let config = HardenConfig::default();
        let fp = fingerprint();
        let hardener = hardener(&config, &fp);
        let a = BlockScheduler::new(hardener, 3).with_parallel(true).run(4, render_by_width).unwrap();
        let b = BlockScheduler::new(hardener, 3).with_parallel(false).run(4, render_by_width).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn render_is_called_once_per_page_in_order() {
        let config = HardenConfig::default();
        let fp = fingerprint();
        let mut calls = Vec::new();
        BlockScheduler::new(hardener(&config, &fp), 3)
            .run(7, |index| {
                calls.push(index);
                render_by_width(index)
            })
            .unwrap();
        assert_eq!(calls, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn render_failure_stops_the_run() {
        let config = HardenConfig::default();
        let fp = fingerprint();
        let result = BlockScheduler::new(hardener(&config, &fp), 2).run(5, |index| {
            if index == 3 {
                Err(ArmorError::RenderFailure("corrupt page".into()))
            } else {
                render_by_width(index)
            }
        });
        assert!(matches!(result, Err(ArmorError::RenderFailure(_))));
    }

    #[test]
    fn invalid_page_fails_with_its_index() {
        let config = HardenConfig::default();
        let fp = fingerprint();
        let result = BlockScheduler::new(hardener(&config, &fp), 25).run(3, |index| {
            if index == 1 {
                Ok(PageBitmap::new(0, 0))
            } else {
                render_by_width(index)
            }
        });
        assert!(matches!(
            result,
            Err(ArmorError::InvalidGeometry { page_index: 1, .. })
        ));
    }

    #[test]
    fn cancellation_between_blocks_discards_everything() {
        let config = HardenConfig::default();
        let fp = fingerprint();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let result = BlockScheduler::new(hardener(&config, &fp), 2)
            .with_cancellation(cancel)
            .run(6, |index| {
                if index == 2 {
                    trigger.cancel();
                }
                render_by_width(index)
            });
        assert!(matches!(result, Err(ArmorError::Cancelled)));
    }
}
