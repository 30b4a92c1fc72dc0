// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end hardening pipeline: rasterize, fingerprint, harden block by
// block, assemble, flatten.

pub mod scheduler;

pub use scheduler::{BlockScheduler, CancellationToken, schedule};

use pagearmor_core::error::{ArmorError, Result};
use pagearmor_core::{Fingerprint, HardenedDocument, PageBitmap, PipelineConfig};
use pagearmor_security::{EntropySource, generate_fingerprint};
use tracing::{info, instrument};

use crate::harden::PageHardener;
use crate::pdf::writer::PdfAssembler;
use crate::tools::traits::{Flattener, RasterSession, Rasterizer};

/// One configured pipeline, reusable across requests.
///
/// No state is shared between runs; each call to [`HardeningPipeline::run`]
/// owns its pages, fingerprint, and scratch files.
pub struct HardeningPipeline {
    config: PipelineConfig,
    rasterizer: Box<dyn Rasterizer>,
    flattener: Box<dyn Flattener>,
    cancel: CancellationToken,
}

impl HardeningPipeline {
    /// Build a pipeline after validating `config`.
    pub fn new(
        config: PipelineConfig,
        rasterizer: Box<dyn Rasterizer>,
        flattener: Box<dyn Flattener>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rasterizer,
            flattener,
            cancel: CancellationToken::new(),
        })
    }

    /// Abort runs of this pipeline when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Rasterize and harden every page of `input`.
    ///
    /// Returns the document fingerprint and the hardened pages in original
    /// order. Fails with `EmptyDocument` when the input has no pages.
    #[instrument(skip_all, fields(input_len = input.len()))]
    pub fn harden_pages(
        &self,
        input: &[u8],
        entropy: &mut dyn EntropySource,
    ) -> Result<(Fingerprint, Vec<PageBitmap>)> {
        let mut session = self.rasterizer.open(input)?;
        let total_pages = session.page_count();
        if total_pages == 0 {
            return Err(ArmorError::EmptyDocument);
        }

        let fingerprint = generate_fingerprint(input, entropy);
        info!(total_pages, fingerprint = %fingerprint, "Starting hardening run");

        let hardener = PageHardener::new(&self.config.harden, &fingerprint)?;
        let scale = self.config.render_scale();
        let pages = BlockScheduler::new(hardener, self.config.block_size)
            .with_parallel(self.config.parallel_pages)
            .with_cancellation(self.cancel.clone())
            .run(total_pages, |index| session.render(index, scale))?;

        Ok((fingerprint, pages))
    }

    /// Produce the final hardened document for `input`.
    #[instrument(skip_all, fields(input_len = input.len()))]
    pub fn run(&self, input: &[u8], entropy: &mut dyn EntropySource) -> Result<HardenedDocument> {
        let (fingerprint, pages) = self.harden_pages(input, entropy)?;
        let page_count = pages.len();

        let mut assembler = PdfAssembler::new();
        assembler.set_title(format!("Protected {}", fingerprint.short()));
        let assembled = assembler.assemble(pages)?;
        self.cancel.check()?;

        let bytes = if self.config.flatten_enabled {
            self.flattener.flatten(&assembled, &self.config.flatten)?
        } else {
            assembled
        };

        info!(page_count, output_bytes = bytes.len(), "Hardening run complete");
        Ok(HardenedDocument {
            bytes,
            fingerprint,
            page_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harden::stego::extract_payload;
    use crate::pdf::reader::PdfReader;
    use crate::tools::stub::{PassthroughFlattener, StubRasterizer};
    use pagearmor_core::FlattenConfig;
    use pagearmor_security::{FixedEntropy, SeededEntropy, payload_for_page};

    fn pipeline(rasterizer: StubRasterizer) -> HardeningPipeline {
        let mut config = PipelineConfig::default();
        config.harden.grid_size = 10;
        config.block_size = 25;
        HardeningPipeline::new(config, Box::new(rasterizer), Box::new(PassthroughFlattener))
            .unwrap()
    }

    #[test]
    fn three_white_pages_end_to_end() {
        let rasterizer = StubRasterizer::uniform(3, 200, 300, [255, 255, 255]);
        let originals = rasterizer.pages().to_vec();
        let pipeline = pipeline(rasterizer);

        let (_, pages) = pipeline
            .harden_pages(b"input", &mut SeededEntropy::new(1))
            .unwrap();
        assert_eq!(pages.len(), 3);
        for (hardened, original) in pages.iter().zip(&originals) {
            assert_eq!(hardened.dimensions(), (200, 300));
            assert_ne!(hardened.as_raw(), original.as_raw());
        }

        let document = pipeline.run(b"input", &mut SeededEntropy::new(1)).unwrap();
        assert_eq!(document.page_count, 3);
        let reader = PdfReader::from_bytes(&document.bytes).unwrap();
        assert_eq!(reader.page_count(), 3);
        for (w, h) in reader.page_sizes().unwrap() {
            assert!((w - 200.0).abs() < 0.5 && (h - 300.0).abs() < 0.5);
        }
    }

    #[test]
    fn input_is_opened_once_per_run() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct CountingRasterizer {
            inner: StubRasterizer,
            counts: Rc<Cell<(usize, usize)>>,
        }
        impl Rasterizer for CountingRasterizer {
            fn page_count(&self, input: &[u8]) -> Result<usize> {
                let (page_counts, renders) = self.counts.get();
                self.counts.set((page_counts + 1, renders));
                self.inner.page_count(input)
            }
            fn render(&self, input: &[u8], page_index: usize, scale: f32) -> Result<PageBitmap> {
                let (page_counts, renders) = self.counts.get();
                self.counts.set((page_counts, renders + 1));
                self.inner.render(input, page_index, scale)
            }
        }

        let counts = Rc::new(Cell::new((0, 0)));
        let rasterizer = CountingRasterizer {
            inner: StubRasterizer::uniform(4, 30, 30, [255, 255, 255]),
            counts: Rc::clone(&counts),
        };
        let config = PipelineConfig {
            block_size: 3,
            ..PipelineConfig::default()
        };
        let pipeline =
            HardeningPipeline::new(config, Box::new(rasterizer), Box::new(PassthroughFlattener))
                .unwrap();
        pipeline.run(b"doc", &mut SeededEntropy::new(1)).unwrap();
        assert_eq!(counts.get(), (1, 4));
    }

    #[test]
    fn empty_document_is_rejected() {
        let pipeline = pipeline(StubRasterizer::default());
        let result = pipeline.run(b"input", &mut SeededEntropy::new(1));
        assert!(matches!(result, Err(ArmorError::EmptyDocument)));
    }

    #[test]
    fn seeded_entropy_reproduces_the_whole_run() {
        let pipeline = pipeline(StubRasterizer::uniform(2, 60, 80, [200, 180, 160]));
        let (fp_a, a) = pipeline.harden_pages(b"doc", &mut SeededEntropy::new(9)).unwrap();
        let (fp_b, b) = pipeline.harden_pages(b"doc", &mut SeededEntropy::new(9)).unwrap();
        assert_eq!(fp_a, fp_b);
        assert_eq!(a, b);
    }

    #[test]
    fn each_page_carries_its_own_payload() {
        let pipeline = pipeline(StubRasterizer::uniform(3, 100, 100, [255, 255, 255]));
        let (fingerprint, pages) = pipeline.harden_pages(b"doc", &mut FixedEntropy(7)).unwrap();
        for (index, page) in pages.iter().enumerate() {
            let (payload, _) = extract_payload(page, 20);
            assert_eq!(payload, payload_for_page(&fingerprint, index));
        }
    }

    #[test]
    fn cancelled_run_returns_no_output() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let pipeline =
            pipeline(StubRasterizer::uniform(2, 40, 40, [0, 0, 0])).with_cancellation(cancel);
        let result = pipeline.run(b"doc", &mut SeededEntropy::new(1));
        assert!(matches!(result, Err(ArmorError::Cancelled)));
    }

    #[test]
    fn flatten_failure_is_surfaced() {
        struct FailingFlattener;
        impl Flattener for FailingFlattener {
            fn flatten(&self, _document: &[u8], _config: &FlattenConfig) -> Result<Vec<u8>> {
                Err(ArmorError::FlattenFailure("gs: exit 1".into()))
            }
        }

        let pipeline = HardeningPipeline::new(
            PipelineConfig::default(),
            Box::new(StubRasterizer::uniform(1, 30, 30, [255, 255, 255])),
            Box::new(FailingFlattener),
        )
        .unwrap();
        let result = pipeline.run(b"doc", &mut SeededEntropy::new(1));
        assert!(matches!(result, Err(ArmorError::FlattenFailure(_))));
    }

    #[test]
    fn disabled_flattening_skips_the_flattener() {
        struct PanickingFlattener;
        impl Flattener for PanickingFlattener {
            fn flatten(&self, _document: &[u8], _config: &FlattenConfig) -> Result<Vec<u8>> {
                panic!("flattener must not run");
            }
        }

        let config = PipelineConfig {
            flatten_enabled: false,
            ..PipelineConfig::default()
        };
        let pipeline = HardeningPipeline::new(
            config,
            Box::new(StubRasterizer::uniform(1, 30, 30, [255, 255, 255])),
            Box::new(PanickingFlattener),
        )
        .unwrap();
        let document = pipeline.run(b"doc", &mut SeededEntropy::new(1)).unwrap();
        assert!(document.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = PipelineConfig {
            block_size: 0,
            ..PipelineConfig::default()
        };
        let result = HardeningPipeline::new(
            config,
            Box::new(StubRasterizer::default()),
            Box::new(PassthroughFlattener),
        );
        assert!(matches!(result, Err(ArmorError::InvalidConfig(_))));
    }
}
