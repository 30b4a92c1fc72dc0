// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document assembler — joins hardened page bitmaps into a single image-only
// PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use pagearmor_core::PageBitmap;
use pagearmor_core::error::{ArmorError, Result};
use printpdf::{
    ImageCompression, ImageOptimizationOptions, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Pt, RawImage, RawImageData, RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

/// Pages are placed at this resolution, so one pixel becomes one point.
const PLACEMENT_DPI: f32 = 72.0;

/// Millimetres per PDF point.
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Save options that embed every bitmap pixel for pixel: Flate only, no
/// size cap, no greyscale conversion. The red-channel LSBs carry the
/// payload and must reach the flattener unchanged.
pub fn lossless_save_options() -> PdfSaveOptions {
    PdfSaveOptions {
        image_optimization: Some(ImageOptimizationOptions {
            quality: None,
            max_image_size: None,
            dither_greyscale: Some(false),
            convert_to_greyscale: Some(false),
            auto_optimize: Some(false),
            format: Some(ImageCompression::Flate),
        }),
        ..PdfSaveOptions::default()
    }
}

/// Builds image-only PDFs where each page is exactly one bitmap.
pub struct PdfAssembler {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: String,
}

impl PdfAssembler {
    pub fn new() -> Self {
        Self {
            title: "Protected Document".to_string(),
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Assemble `pages` in order into one PDF.
    ///
    /// The first page becomes the base document and every further page is
    /// appended after it. A W x H pixel bitmap yields a W x H point page with
    /// the image covering it edge to edge. Fails with `EmptyInput` when
    /// `pages` is empty and `InvalidGeometry` for a zero-sized page.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn assemble(&self, pages: Vec<PageBitmap>) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(ArmorError::EmptyInput);
        }

        info!(pages = pages.len(), title = %self.title, "Assembling image-only PDF");

        let mut doc = PdfDocument::new(&self.title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

        for (index, bitmap) in pages.into_iter().enumerate() {
            pagearmor_core::ensure_geometry(&bitmap, index)?;
            let (width, height) = bitmap.dimensions();

            let raw = RawImage {
                pixels: RawImageData::U8(bitmap.into_raw()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(PLACEMENT_DPI),
                    rotate: None,
                },
            }];

            let page_w = Mm(width as f32 * MM_PER_PT);
            let page_h = Mm(height as f32 * MM_PER_PT);
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));

            debug!(index, width, height, "Page placed");
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&lossless_save_options(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "PDF serialisation reported warnings");
        }

        debug!(output_bytes = output.len(), "Assembly complete");
        Ok(output)
    }
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new()
    }
}
