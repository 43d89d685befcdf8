// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-language error messages for people converting documents.
//
// A failed run leaves nothing behind, so every message ends in the same place:
// fix the input or the settings, then start the whole conversion again.

use crate::error::BlattwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something passing went wrong; running again may succeed.
    Transient,
    /// The user must change a setting or pick another file.
    ActionRequired,
    /// This file cannot be converted as-is.
    Permanent,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether re-running the same conversion unchanged may succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `BlattwerkError` into a `HumanError`.
pub fn humanize_error(err: &BlattwerkError) -> HumanError {
    match err {
        BlattwerkError::Decode(detail) => {
            let lower = detail.to_ascii_lowercase();
            if lower.contains("encrypt") || lower.contains("password") {
                HumanError {
                    message: "This PDF is password protected.".into(),
                    suggestion: "Remove the password in your PDF viewer, save a copy, and convert that copy instead.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "This file doesn't look like a PDF we can read.".into(),
                    suggestion: "The file may be damaged. Open it in a PDF viewer to check it works, or try a different file.".into(),
                    retriable: false,
                    severity: Severity::Permanent,
                }
            }
        }

        BlattwerkError::Render(detail) => {
            if detail.contains("surface") {
                HumanError {
                    message: "A page is too large to draw.".into(),
                    suggestion: "Try a lower scale, or convert a smaller range of pages.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "One of the pages couldn't be drawn.".into(),
                    suggestion: format!("Try again, or convert the other pages separately. ({detail})"),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        BlattwerkError::Encode(_) => HumanError {
            message: "A page image couldn't be compressed.".into(),
            suggestion: "Try a different quality setting and run the conversion again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        BlattwerkError::Assembly(_) => HumanError {
            message: "The finished document couldn't be put together.".into(),
            suggestion: "Run the conversion again. If it keeps failing, try a smaller page range.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        BlattwerkError::Validation(detail) => HumanError {
            message: "One of the settings isn't valid.".into(),
            suggestion: format!("Check the settings and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BlattwerkError::Cancelled => HumanError {
            message: "The conversion was stopped.".into(),
            suggestion: "Nothing was saved. Start the conversion again when you're ready.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        BlattwerkError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "We don't have permission to use that file or folder.".into(),
                suggestion: "Check the permissions, or pick a different output folder.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                retriable: true,
                severity: Severity::Transient,
            },
        },

        BlattwerkError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Check that the configuration file is valid JSON.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_quality_is_action_required() {
        let err = BlattwerkError::Validation("quality 0 outside (0, 1]".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
        assert!(human.suggestion.contains("quality 0"));
    }

    #[test]
    fn encrypted_pdf_asks_for_password_removal() {
        let err = BlattwerkError::Decode("document is encrypted".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.message.contains("password"));
    }

    #[test]
    fn garbage_input_is_permanent() {
        let human = humanize_error(&BlattwerkError::Decode("invalid file header".into()));
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn oversized_surface_needs_smaller_scale() {
        let err = BlattwerkError::Render("rendering surface 90000x90000 exceeds budget".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn cancellation_is_retriable() {
        assert!(humanize_error(&BlattwerkError::Cancelled).retriable);
    }
}
