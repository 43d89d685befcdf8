// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document assembler — collects paragraph blocks or page images, page by
// page, into the block sequence the word-processor writer serializes.

use blattwerk_core::error::Result;
use tracing::{debug, instrument};

use crate::encode::encode_png;
use crate::render::Bitmap;
use crate::text::ParagraphBlock;

/// A page image at its rendered pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(ParagraphBlock),
    Image(ImageBlock),
    PageBreak,
}

/// Ordered blocks of an extraction run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputDocument {
    blocks: Vec<Block>,
}

impl OutputDocument {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &ParagraphBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Image(i) => Some(i),
            _ => None,
        })
    }

    /// Blocks that carry content (page breaks excluded).
    pub fn content_blocks(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| !matches!(b, Block::PageBreak))
            .count()
    }
}

/// Appends one page's worth of blocks at a time.
#[derive(Debug, Default)]
pub struct DocumentAssembler {
    page_breaks: bool,
    pages: usize,
    document: OutputDocument,
}

impl DocumentAssembler {
    /// With `page_breaks`, a break is placed between consecutive pages.
    pub fn new(page_breaks: bool) -> Self {
        Self {
            page_breaks,
            ..Self::default()
        }
    }

    fn start_page(&mut self) {
        if self.page_breaks && self.pages > 0 {
            self.document.blocks.push(Block::PageBreak);
        }
        self.pages += 1;
    }

    /// Append one page's reconstructed paragraphs (possibly none).
    pub fn push_paragraphs(&mut self, blocks: Vec<ParagraphBlock>) {
        self.start_page();
        self.document
            .blocks
            .extend(blocks.into_iter().map(Block::Paragraph));
    }

    /// Encode `bitmap` losslessly at its native size and append it.
    #[instrument(skip_all, fields(page = self.pages + 1))]
    pub fn push_bitmap(&mut self, bitmap: &Bitmap<'_>) -> Result<()> {
        bitmap.ensure_current()?;
        let png = encode_png(bitmap.pixels())?;
        debug!(
            width = bitmap.width(),
            height = bitmap.height(),
            bytes = png.len(),
            "Page image captured"
        );
        self.start_page();
        self.document.blocks.push(Block::Image(ImageBlock {
            png,
            width: bitmap.width(),
            height: bitmap.height(),
        }));
        Ok(())
    }

    pub fn finish(self) -> OutputDocument {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderSurface;
    use crate::text::BlockKind;

    fn body(text: &str) -> ParagraphBlock {
        ParagraphBlock {
            text: text.into(),
            kind: BlockKind::Body,
            bold: false,
            italic: false,
            font_family: "Arial".into(),
            font_size: 11.0,
        }
    }

    #[test]
    fn page_breaks_only_between_pages() {
        let mut assembler = DocumentAssembler::new(true);
        assembler.push_paragraphs(vec![body("a")]);
        assembler.push_paragraphs(Vec::new());
        assembler.push_paragraphs(vec![body("b"), body("c")]);
        let doc = assembler.finish();
        assert_eq!(
            doc.blocks(),
            [
                Block::Paragraph(body("a")),
                Block::PageBreak,
                Block::PageBreak,
                Block::Paragraph(body("b")),
                Block::Paragraph(body("c")),
            ]
        );
        assert_eq!(doc.content_blocks(), 3);
    }

    #[test]
    fn without_breaks_blocks_concatenate() {
        let mut assembler = DocumentAssembler::new(false);
        assembler.push_paragraphs(vec![body("a")]);
        assembler.push_paragraphs(vec![body("b")]);
        let doc = assembler.finish();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.paragraphs().map(|p| p.text.as_str()).collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn bitmap_becomes_png_at_native_size() {
        let mut surface = RenderSurface::new(1 << 20);
        let mut assembler = DocumentAssembler::new(false);
        let bitmap = surface.resize(64, 48).unwrap();
        assembler.push_bitmap(&bitmap).unwrap();
        drop(bitmap);

        let doc = assembler.finish();
        let image = doc.images().next().unwrap();
        assert_eq!((image.width, image.height), (64, 48));
        let decoded = image::load_from_memory(&image.png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }
}
