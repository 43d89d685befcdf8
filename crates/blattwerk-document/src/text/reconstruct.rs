// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text reconstruction — groups a page's runs into lines by baseline and turns
// each line into a classified paragraph block.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use blattwerk_core::{HeadingPolicy, PipelineConfig};

use super::classify::{Classifier, font_family};
use crate::pdf::{Page, TextRun};

/// Runs merged onto one baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    /// Baseline of the run that opened the line.
    pub y: f32,
    /// Size sampled from the opening run.
    pub font_size: f32,
    /// Font of the opening run.
    pub font_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Body,
}

/// One reconstructed paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphBlock {
    pub text: String,
    pub kind: BlockKind,
    pub bold: bool,
    pub italic: bool,
    pub font_family: String,
    /// Point size for the output run.
    pub font_size: f32,
}

impl ParagraphBlock {
    pub fn is_heading(&self) -> bool {
        self.kind == BlockKind::Heading
    }
}

/// Group runs into lines in emission order. Blank runs are dropped first;
/// a run more than `tolerance` away from the open line's baseline starts a
/// new line, otherwise its text is appended with no delimiter.
pub fn group_lines(runs: &[TextRun], tolerance: f32, fallback_size: f32) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    for run in runs.iter().filter(|r| !r.is_blank()) {
        if let Some(line) = lines.last_mut()
            && (run.y() - line.y).abs() <= tolerance
        {
            line.text.push_str(&run.text);
            continue;
        }
        lines.push(Line {
            text: run.text.clone(),
            y: run.y(),
            font_size: run_size(run, fallback_size),
            font_name: run.font_name.clone(),
        });
    }
    lines
}

fn run_size(run: &TextRun, fallback: f32) -> f32 {
    let size = run.font_size();
    if size.is_finite() && size > 0.0 { size } else { fallback }
}

/// Turns decoded pages into paragraph blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct TextReconstructor {
    tolerance: f32,
    fallback_size: f32,
    policy: HeadingPolicy,
}

impl TextReconstructor {
    pub fn new(tolerance: f32, fallback_size: f32, policy: HeadingPolicy) -> Self {
        Self {
            tolerance,
            fallback_size,
            policy,
        }
    }

    pub fn from_config(config: &PipelineConfig, policy: Option<HeadingPolicy>) -> Self {
        Self::new(
            config.line_tolerance,
            config.fallback_font_size,
            policy.unwrap_or(config.heading_policy),
        )
    }

    pub fn policy(&self) -> HeadingPolicy {
        self.policy
    }

    /// Blocks for one page, top to bottom in emission order. A page with no
    /// visible text yields none.
    #[instrument(skip_all, fields(page = page.index))]
    pub fn reconstruct(&self, page: &Page) -> Vec<ParagraphBlock> {
        let lines = group_lines(&page.text_runs, self.tolerance, self.fallback_size);
        let classifier = Classifier::for_page(
            self.policy,
            page.text_runs
                .iter()
                .filter(|r| !r.is_blank())
                .map(|r| run_size(r, self.fallback_size)),
        );

        let blocks: Vec<ParagraphBlock> = lines
            .into_iter()
            .map(|line| {
                let hints = classifier.classify(&line.font_name, line.font_size);
                ParagraphBlock {
                    kind: if hints.is_heading {
                        BlockKind::Heading
                    } else {
                        BlockKind::Body
                    },
                    bold: hints.is_bold,
                    italic: hints.is_italic,
                    font_family: font_family(&line.font_name),
                    font_size: line.font_size,
                    text: line.text,
                }
            })
            .collect();

        debug!(
            page = page.index,
            runs = page.text_runs.len(),
            blocks = blocks.len(),
            headings = blocks.iter().filter(|b| b.is_heading()).count(),
            "Page text reconstructed"
        );
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{Matrix, Rect};

    fn run(text: &str, x: f32, y: f32, size: f32, font: &str) -> TextRun {
        TextRun {
            text: text.into(),
            transform: Matrix::new(size, 0.0, 0.0, size, x, y),
            font_name: font.into(),
            width: text.len() as f32 * size * 0.5,
            color: [0, 0, 0],
        }
    }

    fn page(runs: Vec<TextRun>) -> Page {
        Page {
            index: 1,
            media_box: Rect::new(0.0, 0.0, 612.0, 792.0),
            text_runs: runs,
            display_list: Vec::new(),
        }
    }

    #[test]
    fn runs_within_tolerance_join_without_delimiter() {
        let runs = [
            run("Hel", 72.0, 700.0, 12.0, "Times-Roman"),
            run("lo", 90.0, 703.0, 12.0, "Times-Roman"),
            run("World", 72.0, 680.0, 12.0, "Times-Roman"),
        ];
        let lines = group_lines(&runs, 5.0, 11.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[1].text, "World");
    }

    #[test]
    fn tolerance_is_measured_from_the_opening_run() {
        // Each step is within 5 of the previous run, but the third is 8 away
        // from the line's reference baseline.
        let runs = [
            run("a", 0.0, 100.0, 10.0, "F"),
            run("b", 0.0, 96.0, 10.0, "F"),
            run("c", 0.0, 92.0, 10.0, "F"),
        ];
        let lines = group_lines(&runs, 5.0, 11.0);
        assert_eq!(lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>(), ["ab", "c"]);
    }

    #[test]
    fn whitespace_runs_never_become_lines() {
        let runs = [
            run("   ", 0.0, 500.0, 10.0, "F"),
            run("", 0.0, 400.0, 10.0, "F"),
            run("\t\n", 0.0, 300.0, 10.0, "F"),
        ];
        assert!(group_lines(&runs, 5.0, 11.0).is_empty());
        let reconstructor = TextReconstructor::new(5.0, 11.0, HeadingPolicy::Observed);
        assert!(reconstructor.reconstruct(&page(runs.to_vec())).is_empty());
    }

    #[test]
    fn blank_run_does_not_open_a_line() {
        let runs = [
            run(" ", 0.0, 300.0, 40.0, "F"),
            run("x", 0.0, 100.0, 10.0, "F"),
        ];
        let lines = group_lines(&runs, 5.0, 11.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].font_size, 10.0);
    }

    #[test]
    fn grouping_is_deterministic() {
        let runs: Vec<TextRun> = (0..40)
            .map(|i| run(&format!("r{i}"), 0.0, 700.0 - (i / 3) as f32 * 14.0, 11.0, "F"))
            .collect();
        assert_eq!(group_lines(&runs, 5.0, 11.0), group_lines(&runs, 5.0, 11.0));
    }

    #[test]
    fn observed_policy_keeps_large_text_as_body() {
        let reconstructor = TextReconstructor::new(5.0, 11.0, HeadingPolicy::Observed);
        let blocks = reconstructor.reconstruct(&page(vec![
            run("Title", 72.0, 740.0, 36.0, "ABCDEF+Arial-BoldItalic"),
            run("body", 72.0, 700.0, 11.0, "Arial"),
        ]));
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.kind == BlockKind::Body));
        assert!(blocks[0].bold && blocks[0].italic);
        assert_eq!(blocks[0].font_family, "Arial");
        assert_eq!(blocks[0].font_size, 36.0);
    }

    #[test]
    fn page_baseline_policy_promotes_large_lines() {
        let reconstructor = TextReconstructor::new(5.0, 11.0, HeadingPolicy::PageBaseline);
        let blocks = reconstructor.reconstruct(&page(vec![
            run("Title", 72.0, 740.0, 18.0, "Arial"),
            run("one", 72.0, 700.0, 11.0, "Arial"),
            run("two", 72.0, 686.0, 11.0, "Arial"),
        ]));
        assert_eq!(
            blocks.iter().map(|b| b.kind).collect::<Vec<_>>(),
            [BlockKind::Heading, BlockKind::Body, BlockKind::Body]
        );
    }
}
