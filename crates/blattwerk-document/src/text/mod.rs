// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text reconstructor — lines, headings, and style hints from positioned runs.

pub mod classify;
pub mod reconstruct;

pub use classify::{Classifier, StyleHints, font_family};
pub use reconstruct::{BlockKind, Line, ParagraphBlock, TextReconstructor, group_lines};
