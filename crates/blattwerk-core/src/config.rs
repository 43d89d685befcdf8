// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BlattwerkError, Result};
use crate::types::{HeadingPolicy, validate_scale};

/// A4 width in PDF points.
pub const A4_WIDTH_PT: f32 = 595.28;

/// Tunables shared by every run. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Width (pt) of every page in a compressed document; height follows the
    /// rendered page's aspect ratio.
    pub nominal_page_width: f32,
    /// Render scale used when a compress request does not name one.
    pub compress_scale: f32,
    /// Render scale used for image extraction (legibility over size).
    pub image_scale: f32,
    /// Maximum vertical distance (layout units) between runs on one line.
    pub line_tolerance: f32,
    /// Upper bound on rendering surface area, in pixels.
    pub max_surface_pixels: u64,
    /// Default heading detection for text extraction.
    pub heading_policy: HeadingPolicy,
    /// Point size used for runs whose scale cannot be determined.
    pub fallback_font_size: f32,
    /// Directory holding the pdfium shared library. The working directory
    /// and the system library path are searched after it.
    pub pdfium_library_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            nominal_page_width: A4_WIDTH_PT,
            compress_scale: 1.5,
            image_scale: 2.0,
            line_tolerance: 5.0,
            max_surface_pixels: 64 * 1024 * 1024,
            heading_policy: HeadingPolicy::Observed,
            fallback_font_size: 11.0,
            pdfium_library_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every run fail later.
    pub fn validate(&self) -> Result<()> {
        validate_scale(self.compress_scale)?;
        validate_scale(self.image_scale)?;
        if !(self.nominal_page_width.is_finite() && self.nominal_page_width > 0.0) {
            return Err(BlattwerkError::Validation(format!(
                "nominal page width {} must be positive",
                self.nominal_page_width
            )));
        }
        if !(self.line_tolerance.is_finite() && self.line_tolerance >= 0.0) {
            return Err(BlattwerkError::Validation(format!(
                "line tolerance {} must be zero or positive",
                self.line_tolerance
            )));
        }
        if self.max_surface_pixels == 0 {
            return Err(BlattwerkError::Validation(
                "max surface pixels must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.line_tolerance, 5.0);
        assert_eq!(config.heading_policy, HeadingPolicy::Observed);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "image_scale": 3.0, "heading_policy": "page-baseline" }"#)
                .unwrap();
        assert_eq!(config.image_scale, 3.0);
        assert_eq!(config.heading_policy, HeadingPolicy::PageBaseline);
        assert_eq!(config.nominal_page_width, A4_WIDTH_PT);
        assert_eq!(config.pdfium_library_dir, None);
    }

    #[test]
    fn pdfium_library_dir_is_read_from_json() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "pdfium_library_dir": "/opt/pdfium/lib" }"#).unwrap();
        assert_eq!(config.pdfium_library_dir, Some(PathBuf::from("/opt/pdfium/lib")));
    }

    #[test]
    fn negative_scale_is_rejected() {
        let config = PipelineConfig {
            compress_scale: -1.0,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(BlattwerkError::Validation(_))));
    }
}
