// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ghostscript integration — flattening the assembled PDF through the
// `pdfwrite` device and rasterizing input pages through `png16m`.
//
// Both run `gs` as a blocking child process on files inside a `ScratchDir`,
// which is removed on every exit path.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pagearmor_core::error::{ArmorError, Result};
use pagearmor_core::{FlattenConfig, PageBitmap};
use tracing::{debug, info, instrument, warn};

use crate::pdf::reader::PdfReader;
use crate::tools::scratch::ScratchDir;
use crate::tools::traits::{Flattener, RasterSession, Rasterizer};

/// Longest diagnostic excerpt carried in an error.
const MAX_DIAGNOSTIC_CHARS: usize = 2000;

/// Arguments for one flattening run, in invocation order.
///
/// Fixed flag set: `pdfwrite` device, the configured compatibility level, the
/// `/screen` preset, forced colour downsampling to the configured resolution,
/// optional PDF/A coercion, and non-interactive batch execution.
pub fn ghostscript_flatten_args(config: &FlattenConfig, input: &Path, output: &Path) -> Vec<String> {
    let mut args = vec![
        "-sDEVICE=pdfwrite".to_string(),
        format!("-dCompatibilityLevel={}", config.compatibility_level),
        "-dPDFSETTINGS=/screen".to_string(),
        "-dDownsampleColorImages=true".to_string(),
        format!("-dColorImageResolution={}", config.color_image_resolution),
    ];
    if config.archival_profile {
        args.push("-dPDFA=2".to_string());
        args.push("-dPDFACompatibilityPolicy=1".to_string());
        args.push("-sColorConversionStrategy=RGB".to_string());
    }
    args.extend([
        "-dNOPAUSE".to_string(),
        "-dQUIET".to_string(),
        "-dBATCH".to_string(),
        format!("-sOutputFile={}", output.display()),
        input.display().to_string(),
    ]);
    args
}

/// Arguments for rendering one page (0-based `page_index`) to a PNG.
pub fn ghostscript_render_args(page_index: usize, dpi: f32, input: &Path, output: &Path) -> Vec<String> {
    let page_number = page_index + 1;
    vec![
        "-dSAFER".to_string(),
        "-dBATCH".to_string(),
        "-dNOPAUSE".to_string(),
        "-dQUIET".to_string(),
        "-sDEVICE=png16m".to_string(),
        format!("-r{}", dpi.round().max(1.0)),
        format!("-dFirstPage={page_number}"),
        format!("-dLastPage={page_number}"),
        format!("-sOutputFile={}", output.display()),
        input.display().to_string(),
    ]
}

/// Run `binary` with `args`, waiting for it to exit.
///
/// Spawn failures and nonzero exits are reported through `wrap`, which picks
/// the error variant for the calling stage.
fn run_tool(binary: &str, args: &[String], wrap: fn(String) -> ArmorError) -> Result<Output> {
    debug!(binary, ?args, "Invoking external tool");
    let output = Command::new(binary)
        .args(args)
        .output()
        .map_err(|err| wrap(format!("failed to launch {binary}: {err}")))?;

    if !output.status.success() {
        return Err(wrap(format!(
            "{binary} exited with {}: {}",
            output.status,
            diagnostics(&output)
        )));
    }
    Ok(output)
}

/// Combined, truncated stderr and stdout of a finished tool.
fn diagnostics(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(stdout.trim());
    }
    if text.is_empty() {
        return "no diagnostic output".to_string();
    }
    text.chars().take(MAX_DIAGNOSTIC_CHARS).collect()
}

// -- Flattening ----------------------------------------------------------------

/// Flattens through Ghostscript's `pdfwrite` device.
#[derive(Debug, Default, Clone, Copy)]
pub struct GhostscriptFlattener;

impl Flattener for GhostscriptFlattener {
    #[instrument(skip_all, fields(bytes_len = document.len(), binary = %config.ghostscript_binary))]
    fn flatten(&self, document: &[u8], config: &FlattenConfig) -> Result<Vec<u8>> {
        let scratch = ScratchDir::new("pagearmor-flatten-")?;
        let input = scratch.write("input.pdf", document)?;
        let output = scratch.file("output.pdf");

        let args = ghostscript_flatten_args(config, &input, &output);
        let finished = run_tool(&config.ghostscript_binary, &args, ArmorError::FlattenFailure)?;

        if !output.exists() {
            return Err(ArmorError::FlattenFailure(format!(
                "{} produced no output file: {}",
                config.ghostscript_binary,
                diagnostics(&finished)
            )));
        }

        let flattened = std::fs::read(&output)?;
        info!(
            input_bytes = document.len(),
            output_bytes = flattened.len(),
            archival = config.archival_profile,
            "Document flattened"
        );
        Ok(flattened)
    }
}

// -- Rasterizing ---------------------------------------------------------------

/// Renders PDF pages through Ghostscript's `png16m` device.
#[derive(Debug, Clone)]
pub struct GhostscriptRasterizer {
    binary: String,
}

impl GhostscriptRasterizer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Stage `input` in a fresh scratch directory for rendering.
    #[instrument(skip_all, fields(bytes_len = input.len(), binary = %self.binary))]
    pub fn session(&self, input: &[u8]) -> Result<GhostscriptSession<'_>> {
        let page_count = self.page_count(input)?;
        let scratch = ScratchDir::new("pagearmor-render-")?;
        let staged = scratch.write("input.pdf", input)?;
        debug!(page_count, staged = %staged.display(), "Input staged for rendering");
        Ok(GhostscriptSession {
            binary: &self.binary,
            scratch,
            input: staged,
            page_count,
        })
    }
}

impl Default for GhostscriptRasterizer {
    fn default() -> Self {
        Self::new("gs")
    }
}

impl Rasterizer for GhostscriptRasterizer {
    fn page_count(&self, input: &[u8]) -> Result<usize> {
        let reader = PdfReader::from_bytes(input)
            .map_err(|err| ArmorError::RenderFailure(err.to_string()))?;
        Ok(reader.page_count())
    }

    fn render(&self, input: &[u8], page_index: usize, scale: f32) -> Result<PageBitmap> {
        self.session(input)?.render(page_index, scale)
    }

    fn open<'a>(&'a self, input: &'a [u8]) -> Result<Box<dyn RasterSession + 'a>> {
        Ok(Box::new(self.session(input)?))
    }
}

/// One input PDF written to disk once and rendered page by page.
///
/// The staged copy and any leftover page images are removed with the
/// session's scratch directory.
pub struct GhostscriptSession<'a> {
    binary: &'a str,
    scratch: ScratchDir,
    input: PathBuf,
    page_count: usize,
}

impl GhostscriptSession<'_> {
    /// Location of the staged input document.
    pub fn input_path(&self) -> &Path {
        &self.input
    }
}

impl RasterSession for GhostscriptSession<'_> {
    fn page_count(&self) -> usize {
        self.page_count
    }

    #[instrument(skip(self), fields(binary = %self.binary))]
    fn render(&mut self, page_index: usize, scale: f32) -> Result<PageBitmap> {
        if page_index >= self.page_count {
            return Err(ArmorError::RenderFailure(format!(
                "page {page_index} out of range (document has {} pages)",
                self.page_count
            )));
        }
        let target = self.scratch.file(&format!("page-{page_index}.png"));

        let args = ghostscript_render_args(page_index, scale * 72.0, &self.input, &target);
        let finished = run_tool(self.binary, &args, ArmorError::RenderFailure)?;

        // Ghostscript silently renders nothing for an out-of-range page.
        if !target.exists() {
            return Err(ArmorError::RenderFailure(format!(
                "page {} was not rendered: {}",
                page_index,
                diagnostics(&finished)
            )));
        }

        let bitmap = image::open(&target)
            .map_err(|err| ArmorError::RenderFailure(format!("unreadable page image: {err}")))?
            .to_rgb8();
        if let Err(err) = std::fs::remove_file(&target) {
            warn!(path = %target.display(), %err, "Failed to remove rendered page");
        }
        debug!(
            page_index,
            width = bitmap.width(),
            height = bitmap.height(),
            "Page rasterized"
        );
        Ok(bitmap)
    }
}
