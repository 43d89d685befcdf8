// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Renderer selection. Pages are drawn with pdfium whenever its library can be
// bound; otherwise the built-in software renderer paints the decoded display
// list (rectangles, images, and text as glyph boxes).

use std::path::Path;

use blattwerk_core::error::Result;
use tracing::warn;

use super::pdfium::PdfiumRenderer;
use super::software::{PageRenderer, SoftwareRenderer};
use super::surface::{Bitmap, RenderSurface};
use crate::pdf::{Page, SourceDocument};

#[derive(Debug)]
pub enum Rasterizer {
    Pdfium(PdfiumRenderer),
    Software(SoftwareRenderer),
}

impl Rasterizer {
    /// Pdfium if it binds, the software renderer otherwise.
    pub fn detect(library_dir: Option<&Path>) -> Self {
        match PdfiumRenderer::bind(library_dir) {
            Ok(renderer) => Self::Pdfium(renderer),
            Err(err) => {
                warn!(%err, "Falling back to the built-in renderer; text is drawn as glyph boxes");
                Self::Software(SoftwareRenderer)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pdfium(_) => "pdfium",
            Self::Software(_) => "software",
        }
    }
}

impl PageRenderer for Rasterizer {
    fn render<'s>(
        &self,
        source: &SourceDocument,
        page: &Page,
        scale: f32,
        surface: &'s mut RenderSurface,
    ) -> Result<Bitmap<'s>> {
        match self {
            Self::Pdfium(renderer) => renderer.render(source, page, scale, surface),
            Self::Software(renderer) => renderer.render(source, page, scale, surface),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_dir_still_yields_a_renderer() {
        let rasterizer = Rasterizer::detect(Some(Path::new("/nonexistent/pdfium")));
        assert!(matches!(rasterizer.name(), "pdfium" | "software"));
    }
}
