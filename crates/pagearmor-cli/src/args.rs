// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pagearmor_core::PipelineConfig;
use pagearmor_core::error::Result;

#[derive(Debug, Parser)]
#[command(
    name = "pagearmor",
    version,
    about = "Convert documents into pixel-only, watermarked, fingerprinted PDFs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Harden a document into a protected PDF
    Harden(HardenArgs),
    /// Liveness check; prints {"status":"ok"}
    Health,
}

#[derive(Debug, Args)]
pub struct HardenArgs {
    /// Source document (PDF, or a raster image with --image)
    pub input: PathBuf,

    /// Where to write the hardened PDF (or the JSON envelope with --envelope)
    #[arg(short, long)]
    pub output: PathBuf,

    /// JSON pipeline configuration; flags below override its values
    #[arg(long, env = "PAGEARMOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Owner tag printed in the watermark
    #[arg(long)]
    pub owner: Option<String>,

    /// Mosaic grid size (tiles per axis)
    #[arg(long)]
    pub grid_size: Option<u32>,

    /// Pages held in memory per block
    #[arg(long)]
    pub block_size: Option<usize>,

    /// Rasterization resolution
    #[arg(long)]
    pub dpi: Option<f32>,

    /// Seed the fingerprint's random component for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the Ghostscript flattening stage
    #[arg(long)]
    pub no_flatten: bool,

    /// Ask the flattener for PDF/A-2 output
    #[arg(long)]
    pub pdfa: bool,

    /// Write a JSON envelope with the base64 PDF instead of raw PDF bytes
    #[arg(long)]
    pub envelope: bool,

    /// Treat the input as a single raster image instead of a PDF
    #[arg(long)]
    pub image: bool,
}

impl HardenArgs {
    /// Load the base configuration (file or defaults) and apply flag overrides.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let base = match &self.config {
            Some(path) => PipelineConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => PipelineConfig::default(),
        };
        let config = self.apply_overrides(base);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(owner) = &self.owner {
            config.harden.watermark.owner_tag = owner.clone();
        }
        if let Some(grid_size) = self.grid_size {
            config.harden.grid_size = grid_size;
        }
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        }
        if let Some(dpi) = self.dpi {
            config.render_dpi = dpi;
        }
        if self.no_flatten {
            config.flatten_enabled = false;
        }
        if self.pdfa {
            config.flatten.archival_profile = true;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagearmor_core::ArmorError;

    fn parse(args: &[&str]) -> HardenArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.cmd {
            Command::Harden(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn defaults_without_flags() {
        let args = parse(&["pagearmor", "harden", "in.pdf", "-o", "out.pdf"]);
        assert_eq!(args.pipeline_config().unwrap(), PipelineConfig::default());
        assert!(!args.envelope && !args.image);
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "pagearmor", "harden", "in.pdf", "--output", "out.pdf", "--owner", "ACME",
            "--grid-size", "6", "--block-size", "5", "--dpi", "96", "--no-flatten", "--pdfa",
        ]);
        let config = args.pipeline_config().unwrap();
        assert_eq!(config.harden.watermark.owner_tag, "ACME");
        assert_eq!(config.harden.grid_size, 6);
        assert_eq!(config.block_size, 5);
        assert_eq!(config.render_dpi, 96.0);
        assert!(!config.flatten_enabled);
        assert!(config.flatten.archival_profile);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("armor.json");
        std::fs::write(&path, r#"{"block_size": 10, "harden": {"grid_size": 8}}"#).unwrap();

        let config_arg = path.to_string_lossy().into_owned();
        let args = parse(&[
            "pagearmor", "harden", "in.pdf", "-o", "out.pdf", "--config", &config_arg,
            "--grid-size", "4",
        ]);
        let config = args.pipeline_config().unwrap();
        assert_eq!(config.block_size, 10);
        assert_eq!(config.harden.grid_size, 4);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = parse(&["pagearmor", "harden", "in.pdf", "-o", "out.pdf", "--block-size", "0"]);
        assert!(matches!(args.pipeline_config(), Err(ArmorError::InvalidConfig(_))));
    }

    #[test]
    fn output_is_required() {
        assert!(Cli::try_parse_from(["pagearmor", "harden", "in.pdf"]).is_err());
    }

    #[test]
    fn health_takes_no_arguments() {
        let cli = Cli::try_parse_from(["pagearmor", "health"]).unwrap();
        assert!(matches!(cli.cmd, Command::Health));
    }
}
