// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Download file names for converted documents.

use std::path::Path;

use crate::types::DocumentType;

/// Derives the suggested output file name for each conversion.
pub struct OutputName;

impl OutputName {
    /// `<stem>.<ext>` for one-to-one conversions (PDF→DOCX, DOCX→PDF, ...).
    pub fn converted(input_name: &str, target: DocumentType) -> String {
        format!("{}.{}", file_stem(input_name), target.extension())
    }

    pub fn merged() -> &'static str {
        "merged_document.pdf"
    }

    pub fn split_archive() -> &'static str {
        "split_pages.zip"
    }

    /// Entry name of page `page_number` (1-based) inside the split archive.
    pub fn split_entry(page_number: usize) -> String {
        format!("page_{page_number}.pdf")
    }

    /// Range extraction, bounds as the caller entered them (1-based).
    pub fn page_range(start: usize, end: usize) -> String {
        format!("pages_{start}_to_{end}.pdf")
    }

    pub fn compressed(input_name: &str) -> String {
        format!("compressed_{}", file_name(input_name))
    }

    /// Rasterised page, `page_number` being 1-based.
    pub fn rasterized(input_name: &str, page_number: usize) -> String {
        format!("{}_page{page_number}.jpg", file_stem(input_name))
    }

    pub fn images_to_pdf() -> &'static str {
        "converted_document.pdf"
    }
}

/// Final path component, or the whole input if it has none.
fn file_name(input_name: &str) -> &str {
    Path::new(input_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(input_name)
}

/// File name without its last extension; falls back to "document".
pub fn file_stem(input_name: &str) -> &str {
    Path::new(input_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("document")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converted_name_swaps_extension() {
        assert_eq!(OutputName::converted("report.pdf", DocumentType::Docx), "report.docx");
        assert_eq!(OutputName::converted("/tmp/q3.final.docx", DocumentType::Pdf), "q3.final.pdf");
    }

    #[test]
    fn compressed_name_keeps_original_file_name() {
        assert_eq!(OutputName::compressed("dir/scan.pdf"), "compressed_scan.pdf");
    }

    #[test]
    fn range_and_raster_names() {
        assert_eq!(OutputName::page_range(2, 5), "pages_2_to_5.pdf");
        assert_eq!(OutputName::rasterized("slides.pdf", 3), "slides_page3.jpg");
        assert_eq!(OutputName::split_entry(1), "page_1.pdf");
    }

    #[test]
    fn empty_stem_falls_back() {
        assert_eq!(file_stem(""), "document");
    }
}
