// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PageArmor — pixel-only document hardening
//
// Entry point. Initialises logging, parses the command line, and drives the
// hardening pipeline.

mod args;
mod envelope;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use pagearmor_core::error::Result;
use pagearmor_core::{ArmorError, PipelineConfig};
use pagearmor_document::{
    Flattener, GhostscriptFlattener, GhostscriptRasterizer, HardeningPipeline, ImageRasterizer,
    PassthroughFlattener, Rasterizer,
};
use pagearmor_security::{EntropySource, OsEntropy, SeededEntropy};
use tracing::{info, info_span};

use args::{Cli, Command, HardenArgs};
use envelope::{Envelope, protected_filename};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let request_id = uuid::Uuid::new_v4();
    let _span = info_span!("request", %request_id).entered();

    let outcome = match cli.cmd {
        Command::Harden(args) => harden(&args),
        Command::Health => health(),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(kind = err.kind(), error = %err, "Request failed");
            eprintln!("error[{}]: {err}", err.kind());
            ExitCode::FAILURE
        }
    }
}

fn health() -> Result<()> {
    println!("{}", serde_json::json!({ "status": "ok" }));
    Ok(())
}

fn harden(args: &HardenArgs) -> Result<()> {
    let config = args.pipeline_config()?;
    let input = std::fs::read(&args.input)?;
    info!(input = %args.input.display(), bytes = input.len(), "PageArmor hardening");

    let rasterizer = rasterizer_for(args, &config);
    let flattener = flattener_for(&config);
    let pipeline = HardeningPipeline::new(config, rasterizer, flattener)?;

    let mut entropy: Box<dyn EntropySource> = match args.seed {
        Some(seed) => Box::new(SeededEntropy::new(seed)),
        None => Box::new(OsEntropy),
    };
    let document = pipeline.run(&input, entropy.as_mut())?;

    let bytes = if args.envelope {
        let filename = protected_filename(&file_name(&args.input)?);
        Envelope::new(filename, &document).to_json()?.into_bytes()
    } else {
        document.bytes.clone()
    };
    std::fs::write(&args.output, bytes)?;

    info!(
        output = %args.output.display(),
        fingerprint = %document.fingerprint,
        pages = document.page_count,
        "Protected document written"
    );
    println!("{}", document.fingerprint);
    Ok(())
}

fn rasterizer_for(args: &HardenArgs, config: &PipelineConfig) -> Box<dyn Rasterizer> {
    if args.image {
        Box::new(ImageRasterizer)
    } else {
        Box::new(GhostscriptRasterizer::new(
            config.flatten.ghostscript_binary.clone(),
        ))
    }
}

fn flattener_for(config: &PipelineConfig) -> Box<dyn Flattener> {
    if config.flatten_enabled {
        Box::new(GhostscriptFlattener)
    } else {
        Box::new(PassthroughFlattener)
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ArmorError::InvalidConfig(format!("input path has no file name: {}", path.display()))
        })
}
