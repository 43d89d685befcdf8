// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compression assembler — re-encodes rendered pages as JPEG and lays each one
// out as a full page of fixed nominal width.

use blattwerk_core::error::{BlattwerkError, Result};
use tracing::{debug, instrument};

use crate::encode::{encode_jpeg, jpeg_quality};
use crate::pdf::Rect;
use crate::render::Bitmap;

/// One output page: a JPEG stream and the rectangle it fills.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedPage {
    pub jpeg: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Page box in points; the image covers all of it.
    pub placement: Rect,
}

/// Recompressed pages in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompressedDocument {
    pages: Vec<CompressedPage>,
}

impl CompressedDocument {
    pub fn pages(&self) -> &[CompressedPage] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<CompressedPage> {
        self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total size of the encoded page images.
    pub fn image_bytes(&self) -> usize {
        self.pages.iter().map(|p| p.jpeg.len()).sum()
    }
}

/// Builds a [`CompressedDocument`] one bitmap at a time.
#[derive(Debug)]
pub struct CompressionAssembler {
    quality: u8,
    nominal_width: f32,
    document: CompressedDocument,
}

impl CompressionAssembler {
    /// `quality` in (0, 1]; validated by the caller before the run starts.
    pub fn new(quality: f32, nominal_width: f32) -> Self {
        Self {
            quality: jpeg_quality(quality),
            nominal_width,
            document: CompressedDocument::default(),
        }
    }

    /// JPEG quality on the encoder's 1..=100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        self.quality
    }

    /// Encode `bitmap` and append it as the next page.
    #[instrument(skip_all, fields(page = self.document.len() + 1))]
    pub fn push(&mut self, bitmap: &Bitmap<'_>) -> Result<()> {
        bitmap.ensure_current()?;
        let (width, height) = (bitmap.width(), bitmap.height());
        if width == 0 || height == 0 {
            return Err(BlattwerkError::Encode(format!(
                "bitmap of {width}x{height} pixels cannot become a page"
            )));
        }

        let jpeg = encode_jpeg(bitmap.pixels(), self.quality)?;
        let page_height = self.nominal_width * height as f32 / width as f32;
        debug!(
            width,
            height,
            page_height,
            bytes = jpeg.len(),
            "Page recompressed"
        );

        self.document.pages.push(CompressedPage {
            jpeg,
            pixel_width: width,
            pixel_height: height,
            placement: Rect::new(0.0, 0.0, self.nominal_width, page_height),
        });
        Ok(())
    }

    pub fn finish(self) -> CompressedDocument {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderSurface;

    #[test]
    fn page_height_follows_bitmap_aspect_ratio() {
        let mut surface = RenderSurface::new(1 << 20);
        let mut assembler = CompressionAssembler::new(0.5, 595.28);
        assert_eq!(assembler.jpeg_quality(), 50);

        let bitmap = surface.resize(200, 100).unwrap();
        assembler.push(&bitmap).unwrap();
        drop(bitmap);
        let bitmap = surface.resize(100, 300).unwrap();
        assembler.push(&bitmap).unwrap();
        drop(bitmap);

        let document = assembler.finish();
        assert_eq!(document.len(), 2);
        let [first, second] = document.pages() else {
            panic!("expected two pages");
        };
        assert_eq!(first.placement.width, 595.28);
        assert!((first.placement.height - 297.64).abs() < 0.01);
        assert!((second.placement.height - 1785.84).abs() < 0.01);
        assert_eq!((second.pixel_width, second.pixel_height), (100, 300));
        assert!(first.jpeg.starts_with(&[0xFF, 0xD8]));
    }

    #[test]
    fn empty_assembler_yields_empty_document() {
        let document = CompressionAssembler::new(1.0, 595.28).finish();
        assert!(document.is_empty());
        assert_eq!(document.image_bytes(), 0);
    }
}
