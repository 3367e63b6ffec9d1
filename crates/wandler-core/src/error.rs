// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Wandler.

use thiserror::Error;

/// Top-level error type for all Wandler operations.
#[derive(Debug, Error)]
pub enum WandlerError {
    // -- Input validation --
    #[error("not a valid PDF document: {0}")]
    Parse(String),

    #[error("page index {index} out of range (document has {page_count} pages)")]
    PageIndex { index: usize, page_count: usize },

    #[error("page range {start}..={end} invalid for {page_count} page document")]
    PageRange {
        start: usize,
        end: usize,
        page_count: usize,
    },

    #[error("operation needs at least {required} inputs, got {actual}")]
    EmptyInput { required: usize, actual: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    // -- Processing --
    #[error("image could not be decoded: {0}")]
    Decode(String),

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("image processing failed: {0}")]
    Image(String),

    #[error("office package could not be written: {0}")]
    Package(String),

    // -- External converter --
    #[error("external converter failed: {0} (ensure LibreOffice is installed and on PATH)")]
    ExternalTool(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WandlerError>;
