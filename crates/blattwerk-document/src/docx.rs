// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX writer — serializes an `OutputDocument` as an OOXML word-processing
// package using `docx-rs`.

use std::io::Cursor;

use blattwerk_core::error::{BlattwerkError, Result};
use docx_rs::{BreakType, Docx, Paragraph, Pic, Run, RunFonts, Style, StyleType};
use tracing::{debug, info, instrument};

use crate::assemble::{Block, ImageBlock, OutputDocument};
use crate::text::ParagraphBlock;

/// English Metric Units per pixel at 96 DPI.
const EMU_PER_PIXEL: u32 = 9525;

/// Widest image placed in the document body, in pixels at 96 DPI (about
/// 6.5 inches). Larger page images are scaled down to fit.
const MAX_IMAGE_WIDTH_PX: u32 = 624;

const HEADING_STYLE: &str = "Heading1";

/// Builds `.docx` bytes from reconstructed blocks.
#[derive(Debug, Clone)]
pub struct DocxWriter {
    fallback_font_size: f32,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new(11.0)
    }
}

impl DocxWriter {
    /// `fallback_font_size` (pt) applies to runs without a usable size.
    pub fn new(fallback_font_size: f32) -> Self {
        Self { fallback_font_size }
    }

    #[instrument(skip_all, fields(blocks = document.len()))]
    pub fn write(&self, document: &OutputDocument) -> Result<Vec<u8>> {
        let mut docx = Docx::new().add_style(
            Style::new(HEADING_STYLE, StyleType::Paragraph)
                .name("Heading 1")
                .bold()
                .size(32),
        );

        for block in document.blocks() {
            docx = match block {
                Block::Paragraph(paragraph) => docx.add_paragraph(self.paragraph(paragraph)),
                Block::Image(image) => docx.add_paragraph(image_paragraph(image)),
                Block::PageBreak => {
                    docx.add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)))
                }
            };
        }

        let mut out = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut out)
            .map_err(|err| BlattwerkError::Assembly(format!("DOCX packaging failed: {err}")))?;
        let bytes = out.into_inner();

        info!(bytes = bytes.len(), "DOCX written");
        Ok(bytes)
    }

    fn paragraph(&self, block: &ParagraphBlock) -> Paragraph {
        let size = if block.font_size.is_finite() && block.font_size > 0.0 {
            block.font_size
        } else {
            self.fallback_font_size
        };
        // Run sizes are in half-points.
        let half_points = (size * 2.0).round().max(1.0) as usize;

        let mut run = Run::new().add_text(&block.text).size(half_points);
        if !block.font_family.is_empty() {
            run = run.fonts(
                RunFonts::new()
                    .ascii(&block.font_family)
                    .hi_ansi(&block.font_family),
            );
        }
        if block.bold {
            run = run.bold();
        }
        if block.italic {
            run = run.italic();
        }

        let paragraph = Paragraph::new().add_run(run);
        if block.is_heading() {
            paragraph.style(HEADING_STYLE)
        } else {
            paragraph
        }
    }
}

fn image_paragraph(image: &ImageBlock) -> Paragraph {
    let (width, height) = display_size(image.width, image.height);
    debug!(
        pixel_width = image.width,
        pixel_height = image.height,
        width,
        height,
        "Placing page image"
    );
    let pic = Pic::new(&image.png).size(width * EMU_PER_PIXEL, height * EMU_PER_PIXEL);
    Paragraph::new().add_run(Run::new().add_image(pic))
}

/// Display size in pixels: native, or scaled down to the body width.
fn display_size(width: u32, height: u32) -> (u32, u32) {
    if width <= MAX_IMAGE_WIDTH_PX || width == 0 {
        return (width, height);
    }
    let scaled = (u64::from(height) * u64::from(MAX_IMAGE_WIDTH_PX) / u64::from(width)) as u32;
    (MAX_IMAGE_WIDTH_PX, scaled.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::DocumentAssembler;
    use crate::text::BlockKind;

    fn block(text: &str, kind: BlockKind) -> ParagraphBlock {
        ParagraphBlock {
            text: text.into(),
            kind,
            bold: true,
            italic: false,
            font_family: "Arial".into(),
            font_size: 12.0,
        }
    }

    #[test]
    fn output_is_a_zip_package() {
        let mut assembler = DocumentAssembler::new(true);
        assembler.push_paragraphs(vec![block("Title", BlockKind::Heading)]);
        assembler.push_paragraphs(vec![block("Body text", BlockKind::Body)]);
        let bytes = DocxWriter::default().write(&assembler.finish()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn empty_document_still_packs() {
        let bytes = DocxWriter::default().write(&OutputDocument::default()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn wide_images_scale_to_body_width() {
        assert_eq!(display_size(300, 200), (300, 200));
        assert_eq!(display_size(1248, 1000), (624, 500));
    }
}
