// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — decoding source documents and writing recompressed ones.

pub mod cmap;
mod content;
pub mod decoder;
pub mod geometry;
pub mod writer;

pub use decoder::{Page, PaintOp, Rgb, SourceDocument, TextRun};
pub use geometry::{Matrix, Rect};
pub use writer::PdfWriter;
