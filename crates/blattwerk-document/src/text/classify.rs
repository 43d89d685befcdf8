// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Style classifier — heading detection and bold/italic hints from a font name
// and a rendered size.

use std::collections::BTreeMap;

use blattwerk_core::HeadingPolicy;

/// Smallest size the observed policy will ever call a heading.
const OBSERVED_HEADING_FLOOR: f32 = 32.0;

/// Points above the reference size a heading must reach.
const HEADING_MARGIN: f32 = 4.0;

/// Ratio to the page baseline a heading must reach.
const HEADING_RATIO: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleHints {
    pub is_heading: bool,
    pub is_bold: bool,
    pub is_italic: bool,
}

/// Pure `(font name, size) -> hints` classifier for one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    /// Dominant run size on the page; `None` selects the observed policy.
    baseline: Option<f32>,
}

impl Classifier {
    /// The observed threshold `max(32, s + 4)`. Since `s < s + 4`, no size
    /// ever qualifies and every line is body text.
    pub fn observed() -> Self {
        Self { baseline: None }
    }

    /// Compare against a page's dominant size.
    pub fn page_baseline(baseline: f32) -> Self {
        Self {
            baseline: Some(baseline),
        }
    }

    /// Build the classifier `policy` asks for, given the sizes of the page's
    /// non-blank runs. A page with no sizes falls back to the observed rule.
    pub fn for_page(policy: HeadingPolicy, sizes: impl IntoIterator<Item = f32>) -> Self {
        match policy {
            HeadingPolicy::Observed => Self::observed(),
            HeadingPolicy::PageBaseline => {
                dominant_size(sizes).map_or_else(Self::observed, Self::page_baseline)
            }
        }
    }

    pub fn heading_threshold(&self, size: f32) -> f32 {
        match self.baseline {
            None => OBSERVED_HEADING_FLOOR.max(size + HEADING_MARGIN),
            Some(base) => (base + HEADING_MARGIN).max(base * HEADING_RATIO),
        }
    }

    pub fn classify(&self, font_name: &str, size: f32) -> StyleHints {
        let lower = font_name.to_ascii_lowercase();
        StyleHints {
            is_heading: size >= self.heading_threshold(size),
            is_bold: lower.contains("bold"),
            is_italic: lower.contains("italic"),
        }
    }
}

/// Most frequent size after rounding to whole points. Ties go to the smaller
/// size.
pub fn dominant_size(sizes: impl IntoIterator<Item = f32>) -> Option<f32> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for size in sizes {
        if size.is_finite() && size > 0.0 {
            *counts.entry(size.round() as i64).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .fold(None::<(i64, usize)>, |best, (size, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((size, count)),
        })
        .map(|(size, _)| size as f32)
}

/// Family name with the subset tag (`ABCDEF+`) and style suffix (after `-`
/// or `,`) removed.
pub fn font_family(font_name: &str) -> String {
    let name = match font_name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => font_name,
    };
    let family = name.split(['-', ',']).next().unwrap_or(name).trim();
    family.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_policy_never_selects_heading() {
        let classifier = Classifier::observed();
        for size in [6.0, 12.0, 28.0, 32.0, 48.0, 200.0] {
            assert!(!classifier.classify("Times-Roman", size).is_heading, "size {size}");
        }
    }

    #[test]
    fn baseline_policy_needs_a_clear_step_up() {
        let classifier = Classifier::page_baseline(10.0);
        assert_eq!(classifier.heading_threshold(0.0), 14.0);
        assert!(!classifier.classify("Arial", 13.9).is_heading);
        assert!(classifier.classify("Arial", 14.0).is_heading);

        // Large baselines switch to the ratio.
        let classifier = Classifier::page_baseline(30.0);
        assert_eq!(classifier.heading_threshold(0.0), 36.0);
    }

    #[test]
    fn style_hints_are_case_insensitive() {
        let hints = Classifier::observed().classify("ABCDEF+Helvetica-BoldOblique", 12.0);
        assert!(hints.is_bold);
        assert!(!hints.is_italic);
        let hints = Classifier::observed().classify("Arial,ITALIC", 12.0);
        assert!(hints.is_italic);
    }

    #[test]
    fn dominant_size_counts_rounded_sizes() {
        assert_eq!(dominant_size([11.8, 12.2, 12.0, 18.0, 18.0]), Some(12.0));
        assert_eq!(dominant_size([10.0, 14.0]), Some(10.0));
        assert_eq!(dominant_size(Vec::<f32>::new()), None);
    }

    #[test]
    fn empty_page_falls_back_to_observed() {
        assert_eq!(
            Classifier::for_page(HeadingPolicy::PageBaseline, Vec::<f32>::new()),
            Classifier::observed()
        );
    }

    #[test]
    fn family_strips_subset_tag_and_style() {
        assert_eq!(font_family("ABCDEF+Helvetica-Bold"), "Helvetica");
        assert_eq!(font_family("Arial,BoldItalic"), "Arial");
        assert_eq!(font_family("Times New Roman"), "Times New Roman");
        assert_eq!(font_family("Ab+Cd"), "Ab+Cd");
    }
}
