// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — serializes recompressed pages as a new PDF using `lopdf`.
//
// Each page is one DCTDecode image XObject drawn over the full media box, so
// the JPEG bytes pass through untouched.

use blattwerk_core::error::{BlattwerkError, Result};
use lopdf::{Document, Object, Stream, dictionary};
use tracing::{debug, info, instrument};

use crate::assemble::{CompressedDocument, CompressedPage};

const IMAGE_NAME: &str = "Im0";

/// Writes a [`CompressedDocument`] to PDF bytes.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    #[instrument(skip_all, fields(pages = document.len()))]
    pub fn write(&self, document: CompressedDocument) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(document.len());
        for (i, page) in document.into_pages().into_iter().enumerate() {
            let page_id = add_page(&mut doc, pages_id, page);
            debug!(page = i + 1, ?page_id, "Page object written");
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

        let mut info = dictionary! {
            "Producer" => Object::string_literal("Blattwerk"),
        };
        if let Some(title) = &self.title {
            info.set("Title", Object::string_literal(title.as_str()));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|err| BlattwerkError::Assembly(format!("PDF serialization failed: {err}")))?;

        info!(pages = count, bytes = bytes.len(), "PDF written");
        Ok(bytes)
    }
}

fn add_page(doc: &mut Document, pages_id: lopdf::ObjectId, page: CompressedPage) -> lopdf::ObjectId {
    let CompressedPage {
        jpeg,
        pixel_width,
        pixel_height,
        placement,
    } = page;

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(pixel_width),
            "Height" => i64::from(pixel_height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));

    let content = format!(
        "q {w:.4} 0 0 {h:.4} {x:.4} {y:.4} cm /{IMAGE_NAME} Do Q",
        w = placement.width,
        h = placement.height,
        x = placement.x,
        y = placement.y,
    );
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            placement.x.into(),
            placement.y.into(),
            placement.right().into(),
            placement.top().into(),
        ],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { IMAGE_NAME => image_id },
        },
    })
}
