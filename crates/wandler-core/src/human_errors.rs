// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for whatever front end drives the converter.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Nothing is retried automatically; the severity only tells the caller
// whether re-running with the same input can succeed.

use crate::error::WandlerError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user supplied something invalid (page number, level, file count).
    InvalidInput,
    /// The input document itself cannot be processed.
    BadDocument,
    /// Something on the host is missing or misconfigured.
    Environment,
    /// A local I/O hiccup; trying again may work.
    Transient,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether running the same request again might succeed.
    pub retriable: bool,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `WandlerError` into a `HumanError` suitable for an end user.
pub fn humanize_error(err: &WandlerError) -> HumanError {
    match err {
        WandlerError::Parse(_) => HumanError {
            message: "This doesn't look like a valid PDF file.".into(),
            suggestion: "The file may be damaged, encrypted, or in another format. Try opening it in a PDF viewer first.".into(),
            retriable: false,
            severity: Severity::BadDocument,
        },

        WandlerError::PageIndex { page_count, .. } => HumanError {
            message: "That page doesn't exist.".into(),
            suggestion: format!("Choose a page between 1 and {page_count}."),
            retriable: false,
            severity: Severity::InvalidInput,
        },

        WandlerError::PageRange {
            start, end, page_count,
        } => {
            let suggestion = if start > end {
                "The start page cannot be greater than the end page.".to_string()
            } else {
                format!("Both pages must be between 1 and {page_count}.")
            };
            HumanError {
                message: "The page range isn't valid.".into(),
                suggestion,
                retriable: false,
                severity: Severity::InvalidInput,
            }
        }

        WandlerError::EmptyInput { required, .. } => HumanError {
            message: "Not enough files selected.".into(),
            suggestion: format!("Please select at least {required} files."),
            retriable: false,
            severity: Severity::InvalidInput,
        },

        WandlerError::InvalidArgument(detail) => HumanError {
            message: "One of the settings isn't valid.".into(),
            suggestion: format!("Check the options and try again. ({detail})"),
            retriable: false,
            severity: Severity::InvalidInput,
        },

        WandlerError::UnsupportedDocument(detail) => HumanError {
            message: "This type of document isn't supported.".into(),
            suggestion: format!("Try saving the file as a PDF first. (File type: {detail})"),
            retriable: false,
            severity: Severity::BadDocument,
        },

        WandlerError::Decode(_) => HumanError {
            message: "An image inside this PDF couldn't be read.".into(),
            suggestion: "The image format is unsupported, so the PDF can't be recompressed. No changes were made; the file can still be merged or split as it is.".into(),
            retriable: false,
            severity: Severity::BadDocument,
        },

        WandlerError::Pdf(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged. Try opening it on a computer first to check it works, or try a different file.".into(),
            retriable: false,
            severity: Severity::BadDocument,
        },

        WandlerError::Image(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::BadDocument,
        },

        WandlerError::Package(_) => HumanError {
            message: "The output document couldn't be written.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        WandlerError::ExternalTool(detail) => HumanError {
            message: "The office converter didn't work.".into(),
            suggestion: format!(
                "Please make sure LibreOffice is installed on your system and available on PATH. ({detail})"
            ),
            retriable: true,
            severity: Severity::Environment,
        },

        WandlerError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::InvalidInput,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to read or write that file.".into(),
                    suggestion: "Check the file permissions, or try copying the file to a different location first.".into(),
                    retriable: false,
                    severity: Severity::Environment,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        WandlerError::Serialization(_) => HumanError {
            message: "The configuration file couldn't be read.".into(),
            suggestion: "Check that the config file is valid JSON, or remove it to use the defaults.".into(),
            retriable: false,
            severity: Severity::Environment,
        },
    }
}
