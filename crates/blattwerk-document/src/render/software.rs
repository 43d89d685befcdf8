// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Software page renderer — paints a page's display list onto the surface
// with `image` and `imageproc`.
//
// Text is drawn as one filled box per glyph in the run's fill color. Glyph
// outlines live in embedded font programs, which are not parsed.

use blattwerk_core::error::{BlattwerkError, Result};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect as PixelRect;
use tracing::{debug, instrument};

use super::surface::{Bitmap, RenderSurface};
use crate::pdf::{Page, PaintOp, Rect, Rgb, SourceDocument, TextRun};

/// Glyph box height as a fraction of the font size (roughly the x-height
/// plus ascenders).
const GLYPH_HEIGHT_EM: f32 = 0.7;

/// Fraction of each glyph advance covered by ink.
const GLYPH_INK: f32 = 0.8;

/// Pixel coordinates and extents are clamped to this magnitude before
/// integer conversion.
const MAX_EXTENT: f32 = 16_777_216.0;

/// Renders one page into the shared surface.
pub trait PageRenderer {
    /// Resize `surface` to the page's size at `scale` and draw `page` of
    /// `source`.
    fn render<'s>(
        &self,
        source: &SourceDocument,
        page: &Page,
        scale: f32,
        surface: &'s mut RenderSurface,
    ) -> Result<Bitmap<'s>>;
}

/// Pixel size of a page at `scale`: `(ceil(width·S), ceil(height·S))`.
pub fn page_pixel_size(page: &Page, scale: f32) -> Result<(u32, u32)> {
    let width = (page.width() * scale).ceil();
    let height = (page.height() * scale).ceil();
    if !(width.is_finite() && height.is_finite()) || width < 1.0 || height < 1.0 {
        return Err(BlattwerkError::Render(format!(
            "page {} has no drawable area at scale {scale}",
            page.index
        )));
    }
    if width > u32::MAX as f32 || height > u32::MAX as f32 {
        return Err(BlattwerkError::Render(format!(
            "page {} is too large for a rendering surface at scale {scale}",
            page.index
        )));
    }
    Ok((width as u32, height as u32))
}

/// Fallback renderer for the decoded display list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareRenderer;

impl PageRenderer for SoftwareRenderer {
    #[instrument(skip_all, fields(page = page.index, scale))]
    fn render<'s>(
        &self,
        _source: &SourceDocument,
        page: &Page,
        scale: f32,
        surface: &'s mut RenderSurface,
    ) -> Result<Bitmap<'s>> {
        let (width, height) = page_pixel_size(page, scale)?;
        let image_budget = surface.max_pixels();
        let mut bitmap = surface.resize(width, height)?;
        let view = PageView {
            left: page.media_box.x,
            top: page.media_box.top(),
            scale,
        };

        let canvas = bitmap.pixels_mut();
        for op in &page.display_list {
            match op {
                PaintOp::Fill { rect, color } => {
                    if let Some(area) = view.to_pixels(rect) {
                        draw_filled_rect_mut(canvas, area, opaque(*color));
                    }
                }
                PaintOp::Image { placement, image } => {
                    let Some(area) = view.to_pixels(&placement.unit_bounds()) else {
                        continue;
                    };
                    // Skip placements far larger than the page itself.
                    if u64::from(area.width()) * u64::from(area.height())
                        > u64::from(width) * u64::from(height) * 4
                    {
                        debug!(page = page.index, "Image placement larger than page, skipped");
                        continue;
                    }
                    if u64::from(image.width()) * u64::from(image.height()) > image_budget {
                        debug!(page = page.index, "Image larger than the surface budget, skipped");
                        continue;
                    }
                    let scaled = imageops::resize(
                        &image.to_rgba8(),
                        area.width(),
                        area.height(),
                        FilterType::Triangle,
                    );
                    imageops::overlay(canvas, &scaled, i64::from(area.left()), i64::from(area.top()));
                }
                PaintOp::Text { run } => {
                    if let Some(run) = page.text_runs.get(*run) {
                        draw_glyph_boxes(canvas, &view, run);
                    }
                }
            }
        }

        debug!(
            page = page.index,
            width,
            height,
            ops = page.display_list.len(),
            "Page rendered"
        );
        Ok(bitmap)
    }
}

/// Page space (origin bottom-left, y up) to pixel space (origin top-left,
/// y down) at a fixed scale.
struct PageView {
    left: f32,
    top: f32,
    scale: f32,
}

impl PageView {
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.left) * self.scale, (self.top - y) * self.scale)
    }

    fn to_pixels(&self, rect: &Rect) -> Option<PixelRect> {
        let (x, y) = self.point(rect.x, rect.top());
        let width = (rect.width * self.scale).round();
        let height = (rect.height * self.scale).round();
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            return None;
        }
        Some(pixel_rect(x, y, width, height))
    }
}

fn pixel_rect(x: f32, y: f32, width: f32, height: f32) -> PixelRect {
    let coord = |v: f32| v.round().clamp(-MAX_EXTENT, MAX_EXTENT) as i32;
    let extent = |v: f32| v.round().clamp(1.0, MAX_EXTENT) as u32;
    PixelRect::at(coord(x), coord(y)).of_size(extent(width), extent(height))
}

fn opaque([r, g, b]: Rgb) -> Rgba<u8> {
    Rgba([r, g, b, u8::MAX])
}

fn draw_glyph_boxes(canvas: &mut RgbaImage, view: &PageView, run: &TextRun) {
    let glyphs = run.text.chars().count();
    if glyphs == 0 {
        return;
    }
    let size = run.font_size() * view.scale;
    let advance = run.width * view.scale / glyphs as f32;
    let (x0, baseline) = view.point(run.x(), run.y());
    let glyph_height = (size * GLYPH_HEIGHT_EM).round().max(1.0);
    let color = opaque(run.color);

    for (i, ch) in run.text.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let left = x0 + i as f32 * advance + advance * (1.0 - GLYPH_INK) / 2.0;
        let width = (advance * GLYPH_INK).round().max(1.0);
        if !(left.is_finite() && baseline.is_finite()) {
            return;
        }
        let area = pixel_rect(left, baseline - glyph_height, width, glyph_height);
        draw_filled_rect_mut(canvas, area, color);
    }
}
