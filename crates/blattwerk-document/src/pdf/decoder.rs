// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF decoder — turns a byte buffer into pages with geometry, positioned text
// runs, and a paint list, using the `lopdf` crate.
//
// Pages are decoded on demand so a run only ever holds one decoded page (and
// its images) at a time.

use std::sync::Arc;

use blattwerk_core::error::{BlattwerkError, Result};
use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, ObjectId};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use super::content::{PageInterpreter, Resources};
use super::geometry::{Matrix, Rect};

/// US Letter, used when a page carries no usable /MediaBox.
const DEFAULT_MEDIA_BOX: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 612.0,
    height: 792.0,
};

/// Limit on /Parent hops when resolving inherited page attributes.
const MAX_TREE_DEPTH: usize = 32;

/// RGB fill color.
pub type Rgb = [u8; 3];

/// A positioned fragment of text as the content stream showed it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Text rendering matrix (font size folded in) in page space.
    pub transform: Matrix,
    /// Declared font name, usually the font's /BaseFont.
    pub font_name: String,
    /// Approximate advance of the whole run in page units.
    pub width: f32,
    pub color: Rgb,
}

impl TextRun {
    pub fn x(&self) -> f32 {
        self.transform.e
    }

    /// Baseline position in page space (grows upwards).
    pub fn y(&self) -> f32 {
        self.transform.f
    }

    /// Rendered font size in page units.
    pub fn font_size(&self) -> f32 {
        self.transform.scale_y()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One drawing instruction for the rasterizer, in page space.
#[derive(Debug, Clone)]
pub enum PaintOp {
    Fill { rect: Rect, color: Rgb },
    /// Image mapped from the unit square through `placement`.
    Image {
        placement: Matrix,
        image: Arc<DynamicImage>,
    },
    /// Index into [`Page::text_runs`].
    Text { run: usize },
}

/// A decoded page: geometry, text runs in emission order, and paint list.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number.
    pub index: u32,
    /// Media box in page space.
    pub media_box: Rect,
    pub text_runs: Vec<TextRun>,
    pub display_list: Vec<PaintOp>,
}

impl Page {
    pub fn width(&self) -> f32 {
        self.media_box.width
    }

    pub fn height(&self) -> f32 {
        self.media_box.height
    }
}

/// The caller's PDF bytes plus the parsed object graph. Never mutated.
pub struct SourceDocument {
    bytes: Vec<u8>,
    document: Document,
    page_ids: Vec<ObjectId>,
    digest: String,
}

impl std::fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDocument")
            .field("bytes_len", &self.bytes.len())
            .field("page_count", &self.page_ids.len())
            .field("digest", &self.digest)
            .finish()
    }
}

impl SourceDocument {
    // -- Construction ---------------------------------------------------------

    /// Parse PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let document = Document::load_mem(&bytes)
            .map_err(|err| BlattwerkError::Decode(format!("failed to parse PDF: {err}")))?;

        if document.is_encrypted() {
            return Err(BlattwerkError::Decode(
                "document is encrypted and cannot be read without a password".into(),
            ));
        }

        // get_pages() is keyed by 1-based page number, already in order.
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        let digest = hex::encode(Sha256::digest(&bytes));

        info!(pages = page_ids.len(), version = %document.version, "PDF decoded");

        Ok(Self {
            bytes,
            document,
            page_ids,
            digest,
        })
    }

    /// Read and parse a PDF file.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(bytes)
    }

    // -- Inspection -----------------------------------------------------------

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// SHA-256 of the source bytes, hex encoded.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    // -- Page access ----------------------------------------------------------

    /// Decode page `number` (1-based).
    #[instrument(skip(self))]
    pub fn page(&self, number: u32) -> Result<Page> {
        let page_id = number
            .checked_sub(1)
            .and_then(|i| self.page_ids.get(i as usize))
            .copied()
            .ok_or_else(|| {
                BlattwerkError::Decode(format!(
                    "page {number} out of range (document has {} pages)",
                    self.page_ids.len()
                ))
            })?;

        let page_dict = self.document.get_dictionary(page_id).map_err(|err| {
            BlattwerkError::Decode(format!("cannot read page {number} dictionary: {err}"))
        })?;

        let media_box = inherited(&self.document, page_dict, b"MediaBox")
            .and_then(rect_from_array)
            .unwrap_or_else(|| {
                warn!(page = number, "missing or malformed /MediaBox, assuming Letter");
                DEFAULT_MEDIA_BOX
            });

        let content = self.document.get_page_content(page_id).map_err(|err| {
            BlattwerkError::Decode(format!("cannot read content of page {number}: {err}"))
        })?;

        let resources = inherited(&self.document, page_dict, b"Resources")
            .and_then(|obj| as_dict(&self.document, obj))
            .map(|dict| Resources::load(&self.document, dict))
            .unwrap_or_default();

        let mut interpreter = PageInterpreter::new(&self.document, number);
        interpreter.run(&content, &resources, Matrix::identity(), 0)?;
        let (text_runs, display_list) = interpreter.finish();

        debug!(
            page = number,
            runs = text_runs.len(),
            paint_ops = display_list.len(),
            width = media_box.width,
            height = media_box.height,
            "Page decoded"
        );

        Ok(Page {
            index: number,
            media_box,
            text_runs,
            display_list,
        })
    }
}

// -- Object helpers -----------------------------------------------------------

/// Follow a reference chain to the object it names.
pub(crate) fn resolve<'a>(doc: &'a Document, mut object: &'a Object) -> Option<&'a Object> {
    for _ in 0..MAX_TREE_DEPTH {
        match object {
            Object::Reference(id) => object = doc.get_object(*id).ok()?,
            other => return Some(other),
        }
    }
    None
}

/// Resolve to a dictionary (a stream's dictionary counts).
pub(crate) fn as_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, object)? {
        Object::Dictionary(dict) => Some(dict),
        Object::Stream(stream) => Some(&stream.dict),
        _ => None,
    }
}

/// Numeric value of an integer or real object.
pub(crate) fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Look up a page attribute, walking up /Parent for inheritable keys.
fn inherited<'a>(doc: &'a Document, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut node = page;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return resolve(doc, value);
        }
        node = as_dict(doc, node.get(b"Parent").ok()?)?;
    }
    None
}

fn rect_from_array(object: &Object) -> Option<Rect> {
    let Object::Array(values) = object else {
        return None;
    };
    let nums: Vec<f32> = values.iter().filter_map(number).collect();
    let [x0, y0, x1, y1] = nums.as_slice() else {
        return None;
    };
    let rect = Rect::new(x0.min(*x1), y0.min(*y1), (x1 - x0).abs(), (y1 - y0).abs());
    (rect.width > 0.0 && rect.height > 0.0).then_some(rect)
}
