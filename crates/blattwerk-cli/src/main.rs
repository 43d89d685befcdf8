// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blattwerk — local PDF recompression and PDF-to-DOCX reconstruction.
//
// Entry point. Initialises logging, reads the source PDF, runs one conversion,
// and writes the artifact next to the source (or into --out-dir).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use blattwerk_core::error::Result;
use blattwerk_core::human_errors::humanize_error;
use blattwerk_core::{
    CompressRequest, ConversionMode, ConversionRequest, ExtractImageRequest, ExtractTextRequest,
    HeadingPolicy, PageRange, PipelineConfig,
};
use blattwerk_document::{Pipeline, SourceDocument};
use clap::Parser;
use tracing::{error, info, warn};

/// Quality used when --quality is not given.
const DEFAULT_QUALITY: f32 = 0.7;

/// Compress a PDF, or rebuild it as a DOCX from its text or page images.
#[derive(Parser, Debug)]
#[command(name = "blattwerk")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the source PDF
    input: PathBuf,

    /// compress, extract-text or extract-image
    #[arg(short, long, default_value = "compress")]
    mode: ConversionMode,

    /// JPEG quality for compression, in (0, 1]
    #[arg(short, long)]
    quality: Option<f32>,

    /// Pages to convert, e.g. "3" or "2-5" (default: all)
    #[arg(short, long)]
    pages: Option<PageRange>,

    /// Render scale (default: 1.5 for compress, 2.0 for extract-image)
    #[arg(short, long)]
    scale: Option<f32>,

    /// Put a page break between pages of extracted text
    #[arg(long)]
    page_breaks: bool,

    /// Heading detection for extract-text: observed or page-baseline
    #[arg(long)]
    heading_policy: Option<HeadingPolicy>,

    /// JSON pipeline configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the output file (default: next to the input)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Print a JSON conversion report to stdout
    #[arg(long)]
    report: bool,
}

impl Args {
    fn request(&self) -> ConversionRequest {
        if self.mode != ConversionMode::Compress && self.quality.is_some() {
            warn!(mode = %self.mode, "--quality only applies to compress, ignoring");
        }
        if self.mode == ConversionMode::ExtractText && self.scale.is_some() {
            warn!("--scale does not apply to extract-text, ignoring");
        }
        match self.mode {
            ConversionMode::Compress => ConversionRequest::Compress(CompressRequest {
                quality: self.quality.unwrap_or(DEFAULT_QUALITY),
                page_range: self.pages,
                scale: self.scale,
            }),
            ConversionMode::ExtractText => ConversionRequest::ExtractText(ExtractTextRequest {
                page_range: self.pages,
                page_breaks: self.page_breaks,
                heading_policy: self.heading_policy,
            }),
            ConversionMode::ExtractImage => ConversionRequest::ExtractImage(ExtractImageRequest {
                page_range: self.pages,
                scale: self.scale,
            }),
        }
    }

    fn output_dir(&self) -> PathBuf {
        self.out_dir
            .clone()
            .or_else(|| self.input.parent().map(Path::to_path_buf))
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(kind = err.kind(), error = %err, "Conversion failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    let request = args.request();

    let bytes = tokio::fs::read(&args.input).await?;
    let source = SourceDocument::from_bytes(bytes)?;
    let source_name = args.input.file_name().and_then(|name| name.to_str());

    let pipeline = Pipeline::new(config)?;
    let cancel = pipeline.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current page");
            cancel.cancel();
        }
    });

    let (artifact, report) = pipeline.convert(&source, &request, source_name).await?;
    let path = artifact.write_to_dir(args.output_dir())?;
    info!(path = %path.display(), media_type = artifact.media_type(), "Output written");

    println!("{}", path.display());
    if args.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
