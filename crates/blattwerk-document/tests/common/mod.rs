// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixture PDFs built in memory with lopdf, and a call-counting renderer.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use blattwerk_core::BlattwerkError;
use blattwerk_core::error::Result;
use blattwerk_document::pdf::{Page, SourceDocument};
use blattwerk_document::{Bitmap, CancelFlag, PageRenderer, RenderSurface, SoftwareRenderer};
use lopdf::{Document, Object, Stream, dictionary};

/// One page of a fixture document.
#[derive(Debug, Clone)]
pub struct FixturePage {
    pub width: f32,
    pub height: f32,
    pub content: String,
    /// Raw RGB image drawn by the content as `/Im1`.
    pub image: Option<(u32, u32)>,
    /// Width and height written into `/Im1`'s dictionary instead of the
    /// real ones.
    pub declared_image_size: Option<(i64, i64)>,
}

impl FixturePage {
    pub fn blank(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            content: String::new(),
            image: None,
            declared_image_size: None,
        }
    }

    /// A page showing `text` in F1 at `size` points, at (72, 700).
    pub fn text(text: &str, size: f32) -> Self {
        Self {
            content: format!("BT /F1 {size} Tf 72 700 Td ({text}) Tj ET"),
            ..Self::blank(612.0, 792.0)
        }
    }

    /// A page covered by a noisy `w`x`h` image.
    pub fn image(width: f32, height: f32, pixels: (u32, u32)) -> Self {
        Self {
            width,
            height,
            content: format!("q {width} 0 0 {height} 0 0 cm /Im1 Do Q"),
            image: Some(pixels),
            declared_image_size: None,
        }
    }
}

/// Deterministic noise so JPEG quality visibly changes the output size.
fn noise(width: u32, height: u32) -> Vec<u8> {
    let mut state = 0x2545_F491_u32;
    (0..width * height * 3)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

/// Serialize `pages` into a PDF. Every page declares Helvetica as /F1.
pub fn build_pdf(pages: &[FixturePage]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            page.content.clone().into_bytes(),
        ));
        let mut resources = dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        };
        if let Some((w, h)) = page.image {
            let (declared_w, declared_h) = page
                .declared_image_size
                .unwrap_or((i64::from(w), i64::from(h)));
            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => declared_w,
                    "Height" => declared_h,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                },
                noise(w, h),
            ));
            resources.set("XObject", dictionary! { "Im1" => image_id });
        }
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page.width.into(), page.height.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("fixture PDF serializes");
    out
}

/// Wraps the software renderer: counts calls, optionally fails on one page
/// or raises a cancel flag after rendering.
#[derive(Debug, Clone, Default)]
pub struct CountingRenderer {
    pub calls: Arc<AtomicUsize>,
    pub fail_on: Option<u32>,
    pub cancel_after: Option<CancelFlag>,
}

impl CountingRenderer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PageRenderer for CountingRenderer {
    fn render<'s>(
        &self,
        source: &SourceDocument,
        page: &Page,
        scale: f32,
        surface: &'s mut RenderSurface,
    ) -> Result<Bitmap<'s>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on == Some(page.index) {
            return Err(BlattwerkError::Render(format!("page {} refused", page.index)));
        }
        let bitmap = SoftwareRenderer.render(source, page, scale, surface)?;
        if let Some(flag) = &self.cancel_after {
            flag.cancel();
        }
        Ok(bitmap)
    }
}
