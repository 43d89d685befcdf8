// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Assemblers — accumulate per-page results until every page has succeeded.

pub mod compress;
pub mod document;

pub use compress::{CompressedDocument, CompressedPage, CompressionAssembler};
pub use document::{Block, DocumentAssembler, ImageBlock, OutputDocument};
