// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pdfium page renderer — rasterizes the full imaging model (fonts, vector
// paths, shadings, masks, every image codec) with `pdfium-render` and copies
// the result into the shared surface.
//
// The pdfium shared library is bound at runtime. `bind` fails with a render
// error when it cannot be found.

use std::fmt;
use std::path::Path;

use blattwerk_core::error::{BlattwerkError, Result};
use image::imageops;
use pdfium_render::prelude::*;
use tracing::{debug, info, instrument};

use super::software::{PageRenderer, page_pixel_size};
use super::surface::{Bitmap, RenderSurface};
use crate::pdf::{Page, SourceDocument};

pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl fmt::Debug for PdfiumRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfiumRenderer").finish_non_exhaustive()
    }
}

impl PdfiumRenderer {
    /// Bind the pdfium library, looking in `library_dir` (when given), then
    /// the working directory, then the system library path.
    pub fn bind(library_dir: Option<&Path>) -> Result<Self> {
        let at = |dir: &Path| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
        };
        let bindings = match library_dir {
            Some(dir) => at(dir).or_else(|_| at(Path::new("./"))),
            None => at(Path::new("./")),
        }
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|err| BlattwerkError::Render(format!("pdfium library not available: {err:?}")))?;

        info!("pdfium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PageRenderer for PdfiumRenderer {
    #[instrument(skip_all, fields(page = page.index, scale))]
    fn render<'s>(
        &self,
        source: &SourceDocument,
        page: &Page,
        scale: f32,
        surface: &'s mut RenderSurface,
    ) -> Result<Bitmap<'s>> {
        let (width, height) = page_pixel_size(page, scale)?;
        let target = |pixels: u32| {
            i32::try_from(pixels).map_err(|_| {
                BlattwerkError::Render(format!("page {} is too wide for pdfium", page.index))
            })
        };
        let config = PdfRenderConfig::new()
            .set_target_width(target(width)?)
            .set_target_height(target(height)?)
            .render_form_data(true)
            .render_annotations(true);
        // Resizing first enforces the surface budget before pdfium allocates.
        let mut bitmap = surface.resize(width, height)?;

        let document = self
            .pdfium
            .load_pdf_from_byte_slice(source.bytes(), None)
            .map_err(|err| BlattwerkError::Render(format!("pdfium could not open the document: {err:?}")))?;
        let index = page
            .index
            .checked_sub(1)
            .and_then(|i| i.try_into().ok())
            .ok_or_else(|| BlattwerkError::Render(format!("page {} has no pdfium index", page.index)))?;
        let pdf_page = document.pages().get(index).map_err(|err| {
            BlattwerkError::Render(format!("pdfium could not load page {}: {err:?}", page.index))
        })?;
        let rendered = pdf_page.render_with_config(&config).map_err(|err| {
            BlattwerkError::Render(format!("pdfium failed on page {}: {err:?}", page.index))
        })?;
        let pixels = rendered.as_image().to_rgba8();
        imageops::overlay(bitmap.pixels_mut(), &pixels, 0, 0);

        debug!(
            page = page.index,
            width,
            height,
            rendered_width = pixels.width(),
            rendered_height = pixels.height(),
            "Page rendered with pdfium"
        );
        Ok(bitmap)
    }
}
