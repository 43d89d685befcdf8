// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rasterizer — draws one page at a time onto a single reusable surface.

pub mod backend;
pub mod pdfium;
pub mod software;
pub mod surface;

pub use backend::Rasterizer;
pub use pdfium::PdfiumRenderer;
pub use software::{PageRenderer, SoftwareRenderer, page_pixel_size};
pub use surface::{Bitmap, RenderSurface};
