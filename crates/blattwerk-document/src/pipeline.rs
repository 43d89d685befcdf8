// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion pipeline — runs one request against one source document, a page
// at a time, through compression or one of the two extraction paths.
//
// Parameters are validated before the first page. The first failing page
// ends the run and nothing assembled so far is returned.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::{ConversionReport, ConversionRequest, PipelineConfig, RunId};
use chrono::Utc;
use tokio::task::yield_now;
use tracing::{debug, info, instrument};

use crate::assemble::{CompressedDocument, CompressionAssembler, DocumentAssembler, OutputDocument};
use crate::docx::DocxWriter;
use crate::export::{Artifact, export_compressed, export_document};
use crate::pdf::SourceDocument;
use crate::render::{PageRenderer, Rasterizer, RenderSurface};
use crate::text::TextReconstructor;

/// Cooperative cancellation, checked between pages.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The assembled result of a run, before serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutput {
    Compressed(CompressedDocument),
    Document(OutputDocument),
}

impl ConversionOutput {
    /// Pages (compression) or content blocks (extraction).
    pub fn item_count(&self) -> usize {
        match self {
            Self::Compressed(doc) => doc.len(),
            Self::Document(doc) => doc.content_blocks(),
        }
    }
}

pub struct Pipeline<R = Rasterizer> {
    config: PipelineConfig,
    renderer: R,
    cancel: CancelFlag,
}

impl Pipeline<Rasterizer> {
    /// A pipeline drawing pages with pdfium, or with the software renderer
    /// when the pdfium library cannot be bound.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let renderer = Rasterizer::detect(config.pdfium_library_dir.as_deref());
        info!(renderer = renderer.name(), "Renderer selected");
        Self::with_renderer(config, renderer)
    }
}

impl<R: PageRenderer> Pipeline<R> {
    pub fn with_renderer(config: PipelineConfig, renderer: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            renderer,
            cancel: CancelFlag::new(),
        })
    }

    /// Observe `flag` instead of the pipeline's own.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = flag;
        self
    }

    /// A handle that cancels runs on this pipeline.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn check_cancelled(&self, page: u32) -> Result<()> {
        if self.cancel.is_cancelled() {
            info!(page, "Run cancelled");
            return Err(BlattwerkError::Cancelled);
        }
        Ok(())
    }

    // -- Run ------------------------------------------------------------------

    /// Process every requested page and return the assembled output.
    #[instrument(skip_all, fields(mode = %request.mode(), source_pages = source.page_count()))]
    pub async fn run(
        &self,
        source: &SourceDocument,
        request: &ConversionRequest,
    ) -> Result<ConversionOutput> {
        let pages = request.plan(source.page_count())?;
        info!(pages = pages.len(), "Run started");

        let output = match request {
            ConversionRequest::Compress(req) => {
                let scale = req.scale.unwrap_or(self.config.compress_scale);
                let document = self.compress(source, &pages, req.quality, scale).await?;
                ConversionOutput::Compressed(document)
            }
            ConversionRequest::ExtractText(req) => {
                let reconstructor = TextReconstructor::from_config(&self.config, req.heading_policy);
                let document = self
                    .extract_text(source, &pages, &reconstructor, req.page_breaks)
                    .await?;
                ConversionOutput::Document(document)
            }
            ConversionRequest::ExtractImage(req) => {
                let scale = req.scale.unwrap_or(self.config.image_scale);
                ConversionOutput::Document(self.extract_images(source, &pages, scale).await?)
            }
        };

        info!(items = output.item_count(), "Run finished");
        Ok(output)
    }

    async fn compress(
        &self,
        source: &SourceDocument,
        pages: &[u32],
        quality: f32,
        scale: f32,
    ) -> Result<CompressedDocument> {
        let mut surface = RenderSurface::new(self.config.max_surface_pixels);
        let mut assembler = CompressionAssembler::new(quality, self.config.nominal_page_width);
        debug!(jpeg_quality = assembler.jpeg_quality(), scale, "Compressing");

        for &number in pages {
            self.check_cancelled(number)?;
            let page = source.page(number)?;
            let bitmap = self.renderer.render(source, &page, scale, &mut surface)?;
            yield_now().await;
            assembler.push(&bitmap)?;
            drop(bitmap);
            yield_now().await;
        }
        Ok(assembler.finish())
    }

    async fn extract_text(
        &self,
        source: &SourceDocument,
        pages: &[u32],
        reconstructor: &TextReconstructor,
        page_breaks: bool,
    ) -> Result<OutputDocument> {
        let mut assembler = DocumentAssembler::new(page_breaks);
        debug!(policy = ?reconstructor.policy(), page_breaks, "Extracting text");

        for &number in pages {
            self.check_cancelled(number)?;
            let page = source.page(number)?;
            assembler.push_paragraphs(reconstructor.reconstruct(&page));
            yield_now().await;
        }
        Ok(assembler.finish())
    }

    async fn extract_images(
        &self,
        source: &SourceDocument,
        pages: &[u32],
        scale: f32,
    ) -> Result<OutputDocument> {
        let mut surface = RenderSurface::new(self.config.max_surface_pixels);
        let mut assembler = DocumentAssembler::new(false);
        debug!(scale, "Extracting page images");

        for &number in pages {
            self.check_cancelled(number)?;
            let page = source.page(number)?;
            let bitmap = self.renderer.render(source, &page, scale, &mut surface)?;
            yield_now().await;
            assembler.push_bitmap(&bitmap)?;
            drop(bitmap);
            yield_now().await;
        }
        Ok(assembler.finish())
    }

    // -- Convert --------------------------------------------------------------

    /// Run `request`, serialize the result, and describe the run.
    ///
    /// `source_name` is the original file name, used to derive the artifact's.
    #[instrument(skip_all, fields(mode = %request.mode()))]
    pub async fn convert(
        &self,
        source: &SourceDocument,
        request: &ConversionRequest,
        source_name: Option<&str>,
    ) -> Result<(Artifact, ConversionReport)> {
        let run_id = RunId::new();
        let started_at = Utc::now();
        let mode = request.mode();
        info!(%run_id, source = source_name.unwrap_or("<memory>"), "Conversion started");

        let pages_processed = request.plan(source.page_count())?.len();
        let output = self.run(source, request).await?;
        let output_items = output.item_count();

        let artifact = match output {
            ConversionOutput::Compressed(document) => export_compressed(document, source_name)?,
            ConversionOutput::Document(document) => export_document(
                &document,
                mode,
                source_name,
                &DocxWriter::new(self.config.fallback_font_size),
            )?,
        };
        yield_now().await;

        let report = ConversionReport {
            run_id,
            mode,
            source_digest: source.digest().to_string(),
            source_pages: source.page_count(),
            pages_processed,
            output_items,
            output_bytes: artifact.len(),
            file_name: artifact.file_name.clone(),
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            %run_id,
            file_name = %report.file_name,
            bytes = report.output_bytes,
            "Conversion finished"
        );
        Ok((artifact, report))
    }
}

/// Convenience entry point: default renderer, given config, one request.
pub async fn convert_bytes(
    bytes: Vec<u8>,
    request: &ConversionRequest,
    source_name: Option<&str>,
    config: PipelineConfig,
) -> Result<(Artifact, ConversionReport)> {
    let source = SourceDocument::from_bytes(bytes)?;
    Pipeline::new(config)?.convert(&source, request, source_name).await
}
