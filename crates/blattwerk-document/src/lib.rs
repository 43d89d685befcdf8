// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-document — In-memory PDF transformation for Blattwerk.
//
// Decodes a PDF, rasterizes its pages one at a time onto a reusable surface,
// and produces either a recompressed PDF or a DOCX reconstructed from page
// text or page images.

pub mod assemble;
pub mod docx;
pub mod encode;
pub mod export;
pub mod pdf;
pub mod pipeline;
pub mod render;
pub mod text;

// Re-export the primary structs so callers can use `blattwerk_document::Pipeline` etc.
pub use assemble::{Block, CompressedDocument, ImageBlock, OutputDocument};
pub use docx::DocxWriter;
pub use export::{Artifact, StagedDownload, derive_file_name};
pub use pdf::{Page, PdfWriter, SourceDocument, TextRun};
pub use pipeline::{CancelFlag, ConversionOutput, Pipeline, convert_bytes};
pub use render::{Bitmap, PageRenderer, PdfiumRenderer, Rasterizer, RenderSurface, SoftwareRenderer};
pub use text::{BlockKind, ParagraphBlock, TextReconstructor};
