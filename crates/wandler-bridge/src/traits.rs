// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Converter abstraction over external conversion tools.

use std::path::{Path, PathBuf};

use wandler_core::error::Result;

/// Output format requested from an external converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionTarget {
    /// Word-processing document to PDF.
    Pdf,
    /// Spreadsheet to PDF, using the spreadsheet-specific export filter.
    SpreadsheetPdf,
}

impl ConversionTarget {
    /// Value passed to `--convert-to`.
    pub fn filter(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::SpreadsheetPdf => "pdf:calc_pdf_Export",
        }
    }

    /// Extension of the file the converter writes.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf | Self::SpreadsheetPdf => "pdf",
        }
    }

    /// Whether `path` already carries this target's extension. Such an input
    /// would be its own output, so converters refuse it.
    pub fn is_output_name(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension()))
    }

    /// Pick the target for an input file name: spreadsheets get the
    /// spreadsheet filter, everything else the generic one.
    pub fn for_input(file_name: &str) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xlsx" | "xls" | "ods" | "csv") => Self::SpreadsheetPdf,
            _ => Self::Pdf,
        }
    }
}

/// Converts a file on disk into another format.
///
/// Implementations block until the conversion finishes. The output is written
/// next to the input, with the same stem and the target's extension, and its
/// path is returned.
pub trait DocumentConverter: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    fn convert(&self, input: &Path, target: ConversionTarget) -> Result<PathBuf>;
}
