// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Blattwerk conversion pipeline.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BlattwerkError, Result};

/// Unique identifier for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three things a run can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversionMode {
    Compress,
    ExtractText,
    ExtractImage,
}

impl ConversionMode {
    /// Format of the artifact this mode produces.
    pub fn artifact_format(&self) -> ArtifactFormat {
        match self {
            Self::Compress => ArtifactFormat::Pdf,
            Self::ExtractText | Self::ExtractImage => ArtifactFormat::Docx,
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compress => "compress",
            Self::ExtractText => "extract-text",
            Self::ExtractImage => "extract-image",
        })
    }
}

impl FromStr for ConversionMode {
    type Err = BlattwerkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compress" => Ok(Self::Compress),
            "extract-text" | "text" => Ok(Self::ExtractText),
            "extract-image" | "image" => Ok(Self::ExtractImage),
            other => Err(BlattwerkError::Validation(format!(
                "unknown mode '{other}' (expected compress, extract-text or extract-image)"
            ))),
        }
    }
}

/// Binary formats an artifact can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactFormat {
    Pdf,
    Docx,
}

impl ArtifactFormat {
    /// MIME type used when the artifact is offered for download.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

/// Inclusive, 1-based page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn single(page: u32) -> Self {
        Self::new(page, page)
    }

    /// Check the range against a document with `page_count` pages.
    pub fn validate(&self, page_count: usize) -> Result<()> {
        if self.start == 0 || self.start > self.end {
            return Err(BlattwerkError::Validation(format!(
                "page range {self} is malformed (pages are numbered from 1)"
            )));
        }
        if self.end as usize > page_count {
            return Err(BlattwerkError::Validation(format!(
                "page range {self} exceeds document length of {page_count} pages"
            )));
        }
        Ok(())
    }

    /// Page numbers covered by the range, in ascending order.
    pub fn pages(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for PageRange {
    type Err = BlattwerkError;

    /// Accepts `"3"` or `"2-5"`.
    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| -> Result<u32> {
            part.trim().parse::<u32>().map_err(|_| {
                BlattwerkError::Validation(format!("'{s}' is not a page number or range"))
            })
        };
        match s.split_once('-') {
            Some((start, end)) => Ok(Self::new(parse(start)?, parse(end)?)),
            None => Ok(Self::single(parse(s)?)),
        }
    }
}

/// How the text reconstructor decides that a line is a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingPolicy {
    /// Threshold derived from the line's own size: `max(32, size + 4)`.
    /// No line can reach it, so every line is body text.
    #[default]
    Observed,
    /// Compare the line against the page's dominant run size.
    PageBaseline,
}

impl FromStr for HeadingPolicy {
    type Err = BlattwerkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "observed" => Ok(Self::Observed),
            "page-baseline" | "baseline" => Ok(Self::PageBaseline),
            other => Err(BlattwerkError::Validation(format!(
                "unknown heading policy '{other}'"
            ))),
        }
    }
}

/// Re-encode every page as a JPEG and repack into a new PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressRequest {
    /// JPEG quality in (0, 1].
    pub quality: f32,
    pub page_range: Option<PageRange>,
    /// Render scale; falls back to the configured compression scale.
    pub scale: Option<f32>,
}

impl CompressRequest {
    pub fn new(quality: f32) -> Self {
        Self {
            quality,
            page_range: None,
            scale: None,
        }
    }
}

/// Rebuild editable paragraphs from positioned text runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractTextRequest {
    pub page_range: Option<PageRange>,
    /// Insert a page break between the blocks of successive pages.
    pub page_breaks: bool,
    /// Overrides the configured heading policy.
    pub heading_policy: Option<HeadingPolicy>,
}

/// Embed each page as a picture in a word-processor document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractImageRequest {
    pub page_range: Option<PageRange>,
    /// Render scale; falls back to the configured legibility scale.
    pub scale: Option<f32>,
}

/// A single pipeline invocation. Dispatched with one exhaustive `match`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ConversionRequest {
    Compress(CompressRequest),
    ExtractText(ExtractTextRequest),
    ExtractImage(ExtractImageRequest),
}

impl ConversionRequest {
    pub fn mode(&self) -> ConversionMode {
        match self {
            Self::Compress(_) => ConversionMode::Compress,
            Self::ExtractText(_) => ConversionMode::ExtractText,
            Self::ExtractImage(_) => ConversionMode::ExtractImage,
        }
    }

    pub fn page_range(&self) -> Option<PageRange> {
        match self {
            Self::Compress(req) => req.page_range,
            Self::ExtractText(req) => req.page_range,
            Self::ExtractImage(req) => req.page_range,
        }
    }

    /// Validate every parameter against a document of `page_count` pages and
    /// return the page numbers to process, in order.
    ///
    /// Called once, before any page work starts.
    pub fn plan(&self, page_count: usize) -> Result<Vec<u32>> {
        match self {
            Self::Compress(req) => {
                validate_quality(req.quality)?;
                if let Some(scale) = req.scale {
                    validate_scale(scale)?;
                }
            }
            Self::ExtractText(_) => {}
            Self::ExtractImage(req) => {
                if let Some(scale) = req.scale {
                    validate_scale(scale)?;
                }
            }
        }

        match self.page_range() {
            Some(range) => {
                range.validate(page_count)?;
                Ok(range.pages().collect())
            }
            None => Ok((1..=page_count as u32).collect()),
        }
    }
}

/// Quality must lie in the half-open interval (0, 1].
pub fn validate_quality(quality: f32) -> Result<()> {
    if quality.is_finite() && quality > 0.0 && quality <= 1.0 {
        Ok(())
    } else {
        Err(BlattwerkError::Validation(format!(
            "quality {quality} outside (0, 1]"
        )))
    }
}

/// Render scales must be finite and strictly positive.
pub fn validate_scale(scale: f32) -> Result<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(BlattwerkError::Validation(format!(
            "render scale {scale} must be a positive number"
        )))
    }
}

/// Summary of a finished run, suitable for logging or JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub run_id: RunId,
    pub mode: ConversionMode,
    /// SHA-256 of the source bytes, hex encoded.
    pub source_digest: String,
    pub source_pages: usize,
    pub pages_processed: usize,
    /// Paragraph, image, or page count depending on mode.
    pub output_items: usize,
    pub output_bytes: usize,
    pub file_name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_range_parses_single_and_span() {
        assert_eq!("4".parse::<PageRange>().unwrap(), PageRange::single(4));
        assert_eq!(" 2 - 5 ".parse::<PageRange>().unwrap(), PageRange::new(2, 5));
        assert!("two".parse::<PageRange>().is_err());
        assert!("1-".parse::<PageRange>().is_err());
    }

    #[test]
    fn page_range_rejects_out_of_bounds() {
        assert!(PageRange::new(1, 3).validate(3).is_ok());
        assert!(PageRange::new(0, 2).validate(3).is_err());
        assert!(PageRange::new(3, 2).validate(3).is_err());
        assert!(PageRange::new(2, 4).validate(3).is_err());
    }

    #[test]
    fn quality_bounds_are_half_open() {
        assert!(validate_quality(1.0).is_ok());
        assert!(validate_quality(0.01).is_ok());
        assert!(validate_quality(0.0).is_err());
        assert!(validate_quality(-0.5).is_err());
        assert!(validate_quality(1.0001).is_err());
        assert!(validate_quality(f32::NAN).is_err());
    }

    #[test]
    fn plan_defaults_to_every_page() {
        let req = ConversionRequest::ExtractText(ExtractTextRequest::default());
        assert_eq!(req.plan(3).unwrap(), vec![1, 2, 3]);
        assert!(req.plan(0).unwrap().is_empty());
    }

    #[test]
    fn plan_honours_range_and_validates_quality_first() {
        let mut compress = CompressRequest::new(0.5);
        compress.page_range = Some(PageRange::new(2, 3));
        let req = ConversionRequest::Compress(compress);
        assert_eq!(req.plan(5).unwrap(), vec![2, 3]);

        let bad = ConversionRequest::Compress(CompressRequest::new(2.0));
        match bad.plan(5) {
            Err(BlattwerkError::Validation(msg)) => assert!(msg.contains("quality")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn reversed_range_fails_instead_of_planning() {
        let req = ConversionRequest::ExtractText(ExtractTextRequest {
            page_range: Some(PageRange::new(3, 2)),
            ..ExtractTextRequest::default()
        });
        assert!(matches!(req.plan(5), Err(BlattwerkError::Validation(_))));
    }

    #[test]
    fn zero_scale_is_rejected() {
        let req = ConversionRequest::ExtractImage(ExtractImageRequest {
            page_range: None,
            scale: Some(0.0),
        });
        assert!(matches!(req.plan(1), Err(BlattwerkError::Validation(_))));
    }

    #[test]
    fn mode_round_trips_through_strings() {
        for mode in [
            ConversionMode::Compress,
            ConversionMode::ExtractText,
            ConversionMode::ExtractImage,
        ] {
            assert_eq!(mode.to_string().parse::<ConversionMode>().unwrap(), mode);
        }
        assert_eq!(ConversionMode::Compress.artifact_format(), ArtifactFormat::Pdf);
        assert_eq!(ConversionMode::ExtractImage.artifact_format(), ArtifactFormat::Docx);
    }

    #[test]
    fn request_serializes_with_mode_tag() {
        let req = ConversionRequest::Compress(CompressRequest::new(0.7));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["mode"], "compress");
        assert!(json["quality"].as_f64().is_some());
    }
}
