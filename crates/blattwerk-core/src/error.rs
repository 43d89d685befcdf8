// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Blattwerk.
//
// Every pipeline stage maps its failures onto exactly one variant. A run is
// all-or-nothing: the first error ends it and no partial artifact escapes.

use thiserror::Error;

/// Top-level error type for all Blattwerk operations.
#[derive(Debug, Error)]
pub enum BlattwerkError {
    // -- Pipeline stages --
    #[error("could not decode PDF: {0}")]
    Decode(String),

    #[error("page rendering failed: {0}")]
    Render(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("document assembly failed: {0}")]
    Assembly(String),

    #[error("invalid parameter: {0}")]
    Validation(String),

    #[error("conversion cancelled")]
    Cancelled,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BlattwerkError {
    /// Short machine-friendly name of the failing stage.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Render(_) => "render",
            Self::Encode(_) => "encode",
            Self::Assembly(_) => "assembly",
            Self::Validation(_) => "validation",
            Self::Cancelled => "cancelled",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlattwerkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = BlattwerkError::Validation("quality 1.5 outside (0, 1]".into());
        assert_eq!(err.to_string(), "invalid parameter: quality 1.5 outside (0, 1]");
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.pdf");
        let err: BlattwerkError = io.into();
        assert_eq!(err.kind(), "io");
    }
}
