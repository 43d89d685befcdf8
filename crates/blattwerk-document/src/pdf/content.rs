// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content stream interpreter — walks a page's operators once and records
// positioned text runs plus a paint list (rectangle fills, images, text).
//
// Text runs feed extraction. The paint list only serves the fallback
// renderer used when pdfium is unavailable, so it tracks a subset of the
// imaging model: the CTM stack, fill color, rectangular paths, text
// positioning, and image or form XObjects. Curves and strokes are skipped.

use std::collections::HashMap;
use std::sync::Arc;

use blattwerk_core::error::{BlattwerkError, Result};
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, warn};

use super::cmap::{ToUnicode, decode_plain};
use super::decoder::{PaintOp, Rgb, TextRun, as_dict, number, resolve};
use super::geometry::{Matrix, Rect};

/// Average glyph advance as a fraction of the font size. Real widths live in
/// font programs, which are not parsed.
const AVERAGE_GLYPH_EM: f32 = 0.5;

/// TJ adjustments (thousandths of an em) wider than this read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Nesting limit for form XObjects drawing other forms.
const MAX_FORM_DEPTH: usize = 8;

/// Largest image XObject decoded into memory, in pixels.
const MAX_IMAGE_PIXELS: u64 = 1 << 26;

/// `Tr` modes that paint nothing: 3 (invisible) and 7 (clip only).
const INVISIBLE_RENDER_MODES: [u8; 2] = [3, 7];

#[derive(Debug, Clone)]
pub(crate) struct FontInfo {
    base_font: String,
    to_unicode: Option<ToUnicode>,
}

impl FontInfo {
    fn decode(&self, bytes: &[u8]) -> String {
        match &self.to_unicode {
            Some(cmap) if !cmap.is_empty() => cmap.decode(bytes),
            _ => decode_plain(bytes),
        }
    }
}

/// Fonts and XObjects reachable from one /Resources dictionary.
#[derive(Debug, Clone, Default)]
pub(crate) struct Resources {
    fonts: HashMap<Vec<u8>, FontInfo>,
    xobjects: HashMap<Vec<u8>, ObjectId>,
}

impl Resources {
    pub(crate) fn load(doc: &Document, dict: &Dictionary) -> Self {
        let mut fonts = HashMap::new();
        if let Some(font_dict) = dict.get(b"Font").ok().and_then(|o| as_dict(doc, o)) {
            for (name, value) in font_dict.iter() {
                let Some(font) = as_dict(doc, value) else {
                    continue;
                };
                let base_font = font
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).into_owned())
                    .unwrap_or_else(|| String::from_utf8_lossy(name).into_owned());
                let to_unicode = font
                    .get(b"ToUnicode")
                    .ok()
                    .and_then(|o| resolve(doc, o))
                    .and_then(|o| match o {
                        Object::Stream(stream) => Some(ToUnicode::parse(&stream_bytes(stream))),
                        _ => None,
                    });
                fonts.insert(
                    name.clone(),
                    FontInfo {
                        base_font,
                        to_unicode,
                    },
                );
            }
        }

        let mut xobjects = HashMap::new();
        if let Some(xobject_dict) = dict.get(b"XObject").ok().and_then(|o| as_dict(doc, o)) {
            for (name, value) in xobject_dict.iter() {
                if let Object::Reference(id) = value {
                    xobjects.insert(name.clone(), *id);
                }
            }
        }

        Self { fonts, xobjects }
    }
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    ctm: Matrix,
    fill: Rgb,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::identity(),
            fill: [0, 0, 0],
        }
    }
}

#[derive(Debug, Clone)]
struct TextState {
    matrix: Matrix,
    line_matrix: Matrix,
    font_resource: Vec<u8>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
    rise: f32,
    render_mode: u8,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: Matrix::identity(),
            line_matrix: Matrix::identity(),
            font_resource: Vec::new(),
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
            render_mode: 0,
        }
    }
}

pub(crate) struct PageInterpreter<'a> {
    doc: &'a Document,
    page_number: u32,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text: TextState,
    path: Vec<Rect>,
    runs: Vec<TextRun>,
    display: Vec<PaintOp>,
    images: HashMap<ObjectId, Option<Arc<DynamicImage>>>,
}

impl<'a> PageInterpreter<'a> {
    pub(crate) fn new(doc: &'a Document, page_number: u32) -> Self {
        Self {
            doc,
            page_number,
            state: GraphicsState::default(),
            stack: Vec::new(),
            text: TextState::default(),
            path: Vec::new(),
            runs: Vec::new(),
            display: Vec::new(),
            images: HashMap::new(),
        }
    }

    pub(crate) fn finish(self) -> (Vec<TextRun>, Vec<PaintOp>) {
        (self.runs, self.display)
    }

    /// Interpret one content stream starting from CTM `base`. Graphics state
    /// is restored afterwards, including any unbalanced `q`.
    pub(crate) fn run(
        &mut self,
        content: &[u8],
        resources: &Resources,
        base: Matrix,
        depth: usize,
    ) -> Result<()> {
        let content = Content::decode(content).map_err(|err| {
            BlattwerkError::Decode(format!(
                "malformed content stream on page {}: {err}",
                self.page_number
            ))
        })?;

        let saved_state = self.state;
        let saved_depth = self.stack.len();
        self.state.ctm = base;

        for op in &content.operations {
            self.apply(op, resources, depth);
        }

        self.stack.truncate(saved_depth);
        self.state = saved_state;
        Ok(())
    }

    fn apply(&mut self, op: &Operation, resources: &Resources, depth: usize) {
        let nums: Vec<f32> = op.operands.iter().filter_map(number).collect();

        match op.operator.as_str() {
            // -- Graphics state --
            "q" => self.stack.push(self.state),
            "Q" => {
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            "cm" => {
                if let [a, b, c, d, e, f] = nums[..] {
                    self.state.ctm = Matrix::new(a, b, c, d, e, f).then(&self.state.ctm);
                }
            }

            // -- Fill color --
            "g" | "rg" | "k" | "sc" | "scn" => {
                if let Some(color) = color_from_components(&nums) {
                    self.state.fill = color;
                }
            }

            // -- Paths: only rectangles are kept --
            "re" => {
                if let [x, y, w, h] = nums[..] {
                    self.path
                        .push(Rect::new(x, y, w, h).transformed(&self.state.ctm));
                }
            }
            "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => {
                let color = self.state.fill;
                for rect in self.path.drain(..) {
                    self.display.push(PaintOp::Fill { rect, color });
                }
            }
            "n" | "S" | "s" => self.path.clear(),

            // -- Text objects and state --
            "BT" => {
                self.text.matrix = Matrix::identity();
                self.text.line_matrix = Matrix::identity();
            }
            "ET" => {}
            "Tf" => {
                if let Some(Object::Name(name)) = op.operands.first() {
                    self.text.font_resource = name.clone();
                }
                if let Some(size) = op.operands.get(1).and_then(number) {
                    self.text.font_size = size;
                }
            }
            "Tc" => self.text.char_spacing = nums.first().copied().unwrap_or(0.0),
            "Tw" => self.text.word_spacing = nums.first().copied().unwrap_or(0.0),
            "Tz" => self.text.horizontal_scale = nums.first().copied().unwrap_or(100.0) / 100.0,
            "TL" => self.text.leading = nums.first().copied().unwrap_or(0.0),
            "Ts" => self.text.rise = nums.first().copied().unwrap_or(0.0),
            "Tr" => {
                if let Some(mode) = nums.first() {
                    self.text.render_mode = mode.clamp(0.0, 7.0) as u8;
                }
            }
            "Td" => {
                if let [tx, ty] = nums[..] {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let [tx, ty] = nums[..] {
                    self.text.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let [a, b, c, d, e, f] = nums[..] {
                    self.text.line_matrix = Matrix::new(a, b, c, d, e, f);
                    self.text.matrix = self.text.line_matrix;
                }
            }
            "T*" => self.next_line(),

            // -- Text showing --
            "Tj" => {
                if let Some(string @ Object::String(..)) = op.operands.first() {
                    self.show(std::slice::from_ref(string), resources);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    self.show(items, resources);
                }
            }
            "'" => {
                self.next_line();
                if let Some(string @ Object::String(..)) = op.operands.first() {
                    self.show(std::slice::from_ref(string), resources);
                }
            }
            "\"" => {
                if let [aw, ac, ..] = nums[..] {
                    self.text.word_spacing = aw;
                    self.text.char_spacing = ac;
                }
                self.next_line();
                if let Some(string @ Object::String(..)) = op.operands.get(2) {
                    self.show(std::slice::from_ref(string), resources);
                }
            }

            // -- External objects --
            "Do" => {
                if let Some(Object::Name(name)) = op.operands.first() {
                    self.draw_xobject(name, resources, depth);
                }
            }

            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.text.line_matrix = Matrix::translation(tx, ty).then(&self.text.line_matrix);
        self.text.matrix = self.text.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.text.leading;
        self.move_line(0.0, -leading);
    }

    /// Horizontal advance (text space) of decoded text under the current state.
    fn advance(&self, text: &str) -> f32 {
        let glyphs = text.chars().count() as f32;
        let spaces = text.chars().filter(|c| *c == ' ').count() as f32;
        (glyphs * (AVERAGE_GLYPH_EM * self.text.font_size + self.text.char_spacing)
            + spaces * self.text.word_spacing)
            * self.text.horizontal_scale
    }

    /// Show a TJ-style array of strings and kerning numbers as one run.
    fn show(&mut self, items: &[Object], resources: &Resources) {
        let font = resources.fonts.get(&self.text.font_resource);
        let font_name = font
            .map(|f| f.base_font.clone())
            .unwrap_or_else(|| String::from_utf8_lossy(&self.text.font_resource).into_owned());

        let start = self.text.matrix;
        let mut text = String::new();
        let mut advance = 0.0f32;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let piece = match font {
                        Some(font) => font.decode(bytes),
                        None => decode_plain(bytes),
                    };
                    advance += self.advance(&piece);
                    text.push_str(&piece);
                }
                other => {
                    let Some(adjust) = number(other) else {
                        continue;
                    };
                    advance -= adjust / 1000.0 * self.text.font_size * self.text.horizontal_scale;
                    if -adjust > TJ_SPACE_THRESHOLD
                        && !text.is_empty()
                        && !text.ends_with(char::is_whitespace)
                    {
                        text.push(' ');
                    }
                }
            }
        }

        self.text.matrix = Matrix::translation(advance, 0.0).then(&self.text.matrix);
        if text.is_empty() {
            return;
        }

        let size = Matrix::new(
            self.text.font_size * self.text.horizontal_scale,
            0.0,
            0.0,
            self.text.font_size,
            0.0,
            self.text.rise,
        );
        let user = start.then(&self.state.ctm);
        let run = TextRun {
            text,
            transform: size.then(&user),
            font_name,
            width: advance * user.scale_x(),
            color: self.state.fill,
        };
        // Invisible text (OCR layers over scans) is extracted but not painted.
        if !INVISIBLE_RENDER_MODES.contains(&self.text.render_mode) {
            self.display.push(PaintOp::Text {
                run: self.runs.len(),
            });
        }
        self.runs.push(run);
    }

    fn draw_xobject(&mut self, name: &[u8], resources: &Resources, depth: usize) {
        let Some(&id) = resources.xobjects.get(name) else {
            warn!(
                page = self.page_number,
                name = %String::from_utf8_lossy(name),
                "XObject not found in resources"
            );
            return;
        };
        let doc = self.doc;
        let Ok(Object::Stream(stream)) = doc.get_object(id) else {
            warn!(page = self.page_number, ?id, "XObject is not a stream");
            return;
        };

        match stream.dict.get(b"Subtype").ok().and_then(|o| o.as_name().ok()) {
            Some(b"Image") => {
                let image = self
                    .images
                    .entry(id)
                    .or_insert_with(|| match decode_image_xobject(doc, stream) {
                        Ok(image) => Some(Arc::new(image)),
                        Err(reason) => {
                            warn!(?id, %reason, "Skipping image XObject");
                            None
                        }
                    })
                    .clone();
                if let Some(image) = image {
                    self.display.push(PaintOp::Image {
                        placement: self.state.ctm,
                        image,
                    });
                }
            }
            Some(b"Form") if depth < MAX_FORM_DEPTH => {
                let matrix = stream
                    .dict
                    .get(b"Matrix")
                    .ok()
                    .and_then(matrix_from_array)
                    .unwrap_or_default();
                let form_resources = stream
                    .dict
                    .get(b"Resources")
                    .ok()
                    .and_then(|o| as_dict(doc, o))
                    .map(|dict| Resources::load(doc, dict));
                let form_resources = form_resources.as_ref().unwrap_or(resources);
                let base = matrix.then(&self.state.ctm);
                if let Err(err) = self.run(&stream_bytes(stream), form_resources, base, depth + 1) {
                    warn!(page = self.page_number, ?id, %err, "Skipping form XObject");
                }
            }
            Some(b"Form") => {
                debug!(page = self.page_number, ?id, "Form nesting too deep, skipped");
            }
            _ => {}
        }
    }
}

/// Stream payload with filters removed where lopdf knows how.
fn stream_bytes(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

fn matrix_from_array(object: &Object) -> Option<Matrix> {
    let Object::Array(values) = object else {
        return None;
    };
    let nums: Vec<f32> = values.iter().filter_map(number).collect();
    match nums[..] {
        [a, b, c, d, e, f] => Some(Matrix::new(a, b, c, d, e, f)),
        _ => None,
    }
}

fn color_from_components(components: &[f32]) -> Option<Rgb> {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    match *components {
        [gray] => Some([channel(gray); 3]),
        [r, g, b] => Some([channel(r), channel(g), channel(b)]),
        [c, m, y, k] => Some([
            channel((1.0 - c) * (1.0 - k)),
            channel((1.0 - m) * (1.0 - k)),
            channel((1.0 - y) * (1.0 - k)),
        ]),
        _ => None,
    }
}

fn filter_name(dict: &Dictionary) -> Option<String> {
    let name = match dict.get(b"Filter").ok()? {
        Object::Name(n) => n,
        Object::Array(filters) => match filters.first()? {
            Object::Name(n) => n,
            _ => return None,
        },
        _ => return None,
    };
    Some(String::from_utf8_lossy(name).into_owned())
}

/// Number of color components for an image's /ColorSpace.
fn color_components(doc: &Document, dict: &Dictionary) -> Option<usize> {
    let space = resolve(doc, dict.get(b"ColorSpace").ok()?)?;
    match space {
        Object::Name(name) => match name.as_slice() {
            b"DeviceGray" | b"CalGray" | b"G" => Some(1),
            b"DeviceRGB" | b"CalRGB" | b"RGB" => Some(3),
            b"DeviceCMYK" | b"CMYK" => Some(4),
            _ => None,
        },
        Object::Array(parts) => match parts.first()? {
            Object::Name(family) if family == b"ICCBased" => {
                let profile = as_dict(doc, parts.get(1)?)?;
                profile.get(b"N").ok().and_then(number).map(|n| n as usize)
            }
            Object::Name(family) if family == b"CalRGB" => Some(3),
            Object::Name(family) if family == b"CalGray" => Some(1),
            _ => None,
        },
        _ => None,
    }
}

/// Decode an image XObject into pixels.
fn decode_image_xobject(doc: &Document, stream: &Stream) -> std::result::Result<DynamicImage, String> {
    let dict = &stream.dict;
    if dict
        .get(b"ImageMask")
        .ok()
        .and_then(|o| o.as_bool().ok())
        .unwrap_or(false)
    {
        return Err("stencil masks are not drawn".into());
    }

    let filter = filter_name(dict);
    let data = match filter.as_deref() {
        Some("DCTDecode") | Some("DCT") => {
            return image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg)
                .map_err(|err| format!("JPEG decode failed: {err}"));
        }
        None => stream.content.clone(),
        Some("FlateDecode") | Some("Fl") | Some("LZWDecode") | Some("LZW") => stream
            .decompressed_content()
            .map_err(|err| format!("stream decode failed: {err}"))?,
        Some(other) => return Err(format!("unsupported image filter {other}")),
    };

    let width = dict.get(b"Width").ok().and_then(number).unwrap_or(0.0) as u32;
    let height = dict.get(b"Height").ok().and_then(number).unwrap_or(0.0) as u32;
    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(number)
        .unwrap_or(8.0) as u32;
    if width == 0 || height == 0 {
        return Err("image has no dimensions".into());
    }
    if bits != 8 {
        return Err(format!("{bits}-bit images are not supported"));
    }

    let components =
        color_components(doc, dict).ok_or_else(|| "unsupported color space".to_string())?;
    let area = u64::from(width) * u64::from(height);
    if area > MAX_IMAGE_PIXELS {
        return Err(format!(
            "image of {width}x{height} pixels exceeds the limit of {MAX_IMAGE_PIXELS} pixels"
        ));
    }
    let (pixels, needed) = usize::try_from(area)
        .ok()
        .and_then(|pixels| Some((pixels, pixels.checked_mul(components)?)))
        .ok_or_else(|| format!("image of {width}x{height}x{components} is too large"))?;
    if data.len() < needed {
        return Err(format!(
            "image data too short: {} bytes for {width}x{height}x{components}",
            data.len()
        ));
    }

    match components {
        1 => GrayImage::from_raw(width, height, data[..pixels].to_vec())
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(|| "grayscale buffer mismatch".to_string()),
        3 => RgbImage::from_raw(width, height, data[..pixels * 3].to_vec())
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| "RGB buffer mismatch".to_string()),
        4 => {
            let rgb: Vec<u8> = data[..pixels * 4]
                .chunks_exact(4)
                .flat_map(|cmyk| {
                    let [c, m, y, k] = [cmyk[0], cmyk[1], cmyk[2], cmyk[3]].map(|v| v as f32 / 255.0);
                    [
                        ((1.0 - c) * (1.0 - k) * 255.0) as u8,
                        ((1.0 - m) * (1.0 - k) * 255.0) as u8,
                        ((1.0 - y) * (1.0 - k) * 255.0) as u8,
                    ]
                })
                .collect();
            RgbImage::from_raw(width, height, rgb)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(|| "CMYK buffer mismatch".to_string())
        }
        n => Err(format!("{n}-component images are not supported")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn interpret(content: &str) -> (Vec<TextRun>, Vec<PaintOp>) {
        let doc = Document::with_version("1.5");
        let mut interpreter = PageInterpreter::new(&doc, 1);
        interpreter
            .run(content.as_bytes(), &Resources::default(), Matrix::identity(), 0)
            .unwrap();
        interpreter.finish()
    }

    #[test]
    fn td_and_tstar_move_baseline() {
        let (runs, _) = interpret("BT /F1 10 Tf 14 TL 50 700 Td (one) Tj T* (two) Tj ET");
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].x(), runs[0].y()), (50.0, 700.0));
        assert_eq!((runs[1].x(), runs[1].y()), (50.0, 686.0));
        // Resource name stands in when the font is not declared.
        assert_eq!(runs[0].font_name, "F1");
    }

    #[test]
    fn tm_scale_folds_into_font_size() {
        let (runs, _) = interpret("BT /F1 1 Tf 18 0 0 18 72 500 Tm (Title) Tj ET");
        assert!((runs[0].font_size() - 18.0).abs() < 1e-4);
        assert_eq!(runs[0].y(), 500.0);
    }

    #[test]
    fn tj_kerning_gap_inserts_space() {
        let (runs, _) = interpret("BT /F1 12 Tf 0 0 Td [(Hello) -300 (world) -20 (!)] TJ ET");
        assert_eq!(runs[0].text, "Hello world!");
    }

    #[test]
    fn cm_and_fill_produce_page_space_rect() {
        let (_, ops) = interpret("q 1 0 0 1 100 200 cm 0 0 1 rg 0 0 50 20 re f Q");
        match &ops[..] {
            [PaintOp::Fill { rect, color }] => {
                assert_eq!(*rect, Rect::new(100.0, 200.0, 50.0, 20.0));
                assert_eq!(*color, [0, 0, 255]);
            }
            other => panic!("unexpected paint ops {other:?}"),
        }
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let (runs, _) = interpret("Q Q BT 5 5 Td (x) Tj ET");
        assert_eq!(runs.len(), 1);
    }

    #[test]
    fn invisible_text_is_extracted_but_not_painted() {
        let (runs, ops) =
            interpret("BT 3 Tr /F1 24 Tf 72 700 Td (HIDDEN) Tj 0 Tr 0 -30 Td (SHOWN) Tj ET");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "HIDDEN");
        match &ops[..] {
            [PaintOp::Text { run }] => assert_eq!(runs[*run].text, "SHOWN"),
            other => panic!("unexpected paint ops {other:?}"),
        }
    }

    #[test]
    fn clip_only_text_is_not_painted() {
        let (runs, ops) = interpret("BT 7 Tr /F1 12 Tf 10 10 Td (clip) Tj ET");
        assert_eq!(runs.len(), 1);
        assert!(ops.is_empty());
    }

    #[test]
    fn huge_image_dimensions_are_refused() {
        let doc = Document::with_version("1.5");
        let stream = Stream::new(
            lopdf::dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 4_294_967_295_i64,
                "Height" => 4_294_967_295_i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            vec![0; 12],
        );
        let err = decode_image_xobject(&doc, &stream).unwrap_err();
        assert!(err.contains("exceeds"), "{err}");
    }

    #[test]
    fn short_image_data_is_refused() {
        let doc = Document::with_version("1.5");
        let stream = Stream::new(
            lopdf::dictionary! {
                "Subtype" => "Image",
                "Width" => 4,
                "Height" => 4,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0; 15],
        );
        assert!(decode_image_xobject(&doc, &stream).is_err());
    }

    #[test]
    fn cmyk_fill_converts_to_rgb() {
        assert_eq!(color_from_components(&[0.0, 0.0, 0.0, 1.0]), Some([0, 0, 0]));
        assert_eq!(color_from_components(&[0.0, 0.0, 0.0, 0.0]), Some([255, 255, 255]));
        assert_eq!(color_from_components(&[]), None);
    }
}
