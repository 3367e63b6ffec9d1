// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page source. Opens a PDF from memory and reads it page by page: text, embedded
// images, rasterised pages, and page-range sub-documents, using `lopdf`.

use lopdf::{Document, ObjectId};
use serde::Serialize;
use tracing::{debug, info, instrument};
use wandler_core::error::{Result, WandlerError};

use super::copy::{PageCopier, empty_document};
use super::images::{EmbeddedImage, page_images};
use crate::raster::PageRasterizer;

/// An in-memory PDF viewed as a flat, 0-indexed sequence of pages.
///
/// Wraps `lopdf::Document`. Every request opens its own `PageSource`; nothing
/// is shared or cached between them. Reads never modify the document.
#[derive(Clone)]
pub struct PageSource {
    /// The underlying lopdf document.
    document: Document,
    /// Page object ids in page order (index 0 = first page).
    page_ids: Vec<ObjectId>,
}

/// Summary of a document, for display before choosing an operation.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    pub page_count: usize,
    pub pages: Vec<PageInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    /// 0-based page index.
    pub index: usize,
    pub image_count: usize,
    pub has_text: bool,
}

impl PageSource {
    // -- Construction ---------------------------------------------------------

    /// Parse raw PDF bytes.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn open(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data)
            .map_err(|err| WandlerError::Parse(format!("failed to load PDF: {}", err)))?;

        if document.is_encrypted() {
            return Err(WandlerError::Parse(
                "encrypted PDFs are not supported".to_string(),
            ));
        }

        let source = Self::from_document(document);
        debug!(pages = source.page_count(), "PDF loaded from bytes");
        Ok(source)
    }

    pub(crate) fn from_document(document: Document) -> Self {
        let page_ids = document.get_pages().into_values().collect();
        Self { document, page_ids }
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Page count plus per-page image and text presence.
    pub fn info(&self) -> Result<DocumentInfo> {
        let mut pages = Vec::with_capacity(self.page_count());
        for index in 0..self.page_count() {
            let has_text = self
                .extract_text(index)?
                .iter()
                .any(|line| !line.trim().is_empty());
            pages.push(PageInfo {
                index,
                image_count: self.extract_images(index)?.len(),
                has_text,
            });
        }
        Ok(DocumentInfo {
            page_count: self.page_count(),
            pages,
        })
    }

    // -- Extraction -----------------------------------------------------------

    /// Extracted text of a page as lines, in content-stream order (which is
    /// not necessarily reading order).
    #[instrument(skip(self))]
    pub fn extract_text(&self, page_index: usize) -> Result<Vec<String>> {
        self.page_id(page_index)?;
        // lopdf numbers pages from 1.
        let page_number = page_index as u32 + 1;
        let text = self.document.extract_text(&[page_number]).map_err(|err| {
            WandlerError::Pdf(format!(
                "text extraction failed on page {}: {}",
                page_number, err
            ))
        })?;
        Ok(text.lines().map(str::to_string).collect())
    }

    /// Extracted text of a page joined back into one string.
    pub fn page_text(&self, page_index: usize) -> Result<String> {
        Ok(self.extract_text(page_index)?.join("\n"))
    }

    /// Images embedded on a page, each at most once.
    #[instrument(skip(self))]
    pub fn extract_images(&self, page_index: usize) -> Result<Vec<EmbeddedImage>> {
        let page_id = self.page_id(page_index)?;
        Ok(page_images(&self.document, page_id))
    }

    /// Render one page to JPEG, magnified by `scale` on both axes.
    #[instrument(skip(self, rasterizer), fields(rasterizer = rasterizer.name()))]
    pub fn rasterize(
        &self,
        rasterizer: &dyn PageRasterizer,
        page_index: usize,
        scale: f32,
    ) -> Result<Vec<u8>> {
        self.page_id(page_index)?;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(WandlerError::InvalidArgument(format!(
                "raster scale must be positive, got {}",
                scale
            )));
        }
        let pdf = self.to_bytes()?;
        let jpeg = rasterizer.render_jpeg(&pdf, page_index, scale)?;
        debug!(page_index, scale, output_bytes = jpeg.len(), "Page rasterised");
        Ok(jpeg)
    }

    /// Copy pages `start..=end` (0-based) into a new standalone document.
    ///
    /// Page content is copied object by object; `self` is left untouched.
    #[instrument(skip(self))]
    pub fn extract_range(&self, start: usize, end: usize) -> Result<PageSource> {
        let page_count = self.page_count();
        if start > end || end >= page_count {
            return Err(WandlerError::PageRange {
                start,
                end,
                page_count,
            });
        }

        info!(start, end, page_count, "Extracting page range");
        let (mut target, pages_id) = empty_document();
        PageCopier::new(&self.document, &mut target, pages_id)
            .copy_pages(&self.page_ids[start..=end])?;
        Ok(Self::from_document(target))
    }

    // -- Output ---------------------------------------------------------------

    /// Serialise the document to PDF bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.clone().into_bytes()
    }

    /// Serialise the document, consuming it.
    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            WandlerError::Pdf(format!("failed to serialise PDF: {}", err))
        })?;
        Ok(output)
    }

    // -- Crate internals ------------------------------------------------------

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub(crate) fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    fn page_id(&self, page_index: usize) -> Result<ObjectId> {
        self.page_ids
            .get(page_index)
            .copied()
            .ok_or(WandlerError::PageIndex {
                index: page_index,
                page_count: self.page_ids.len(),
            })
    }
}

impl std::fmt::Debug for PageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSource")
            .field("pages", &self.page_ids.len())
            .field("objects", &self.document.objects.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pdf_with_pages, pdf_with_text_pages};

    #[test]
    fn garbage_is_a_parse_error() {
        let err = PageSource::open(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, WandlerError::Parse(_)));
    }

    #[test]
    fn page_count_matches_fixture() {
        let source = PageSource::open(&pdf_with_pages(4)).unwrap();
        assert_eq!(source.page_count(), 4);
    }

    #[test]
    fn text_is_extracted_per_page() {
        let source = PageSource::open(&pdf_with_text_pages(&["Alpha", "Beta"])).unwrap();
        assert_eq!(source.page_text(0).unwrap().trim(), "Alpha");
        assert_eq!(source.page_text(1).unwrap().trim(), "Beta");
    }

    #[test]
    fn text_index_out_of_range_is_rejected() {
        let source = PageSource::open(&pdf_with_pages(2)).unwrap();
        assert!(matches!(
            source.extract_text(2),
            Err(WandlerError::PageIndex {
                index: 2,
                page_count: 2
            })
        ));
    }

    #[test]
    fn extract_range_keeps_only_selected_pages() {
        let source = PageSource::open(&pdf_with_text_pages(&["one", "two", "three"])).unwrap();
        let middle = source.extract_range(1, 2).unwrap();
        assert_eq!(middle.page_count(), 2);
        assert_eq!(middle.page_text(0).unwrap().trim(), "two");
        assert_eq!(middle.page_text(1).unwrap().trim(), "three");
        // The source is untouched.
        assert_eq!(source.page_count(), 3);
    }

    #[test]
    fn extract_range_rejects_reversed_bounds() {
        let source = PageSource::open(&pdf_with_pages(3)).unwrap();
        assert!(matches!(
            source.extract_range(2, 1),
            Err(WandlerError::PageRange { .. })
        ));
        assert!(source.extract_range(0, 3).is_err());
    }

    #[test]
    fn extracted_range_survives_serialisation() {
        let source = PageSource::open(&pdf_with_pages(5)).unwrap();
        let bytes = source.extract_range(0, 1).unwrap().into_bytes().unwrap();
        assert_eq!(PageSource::open(&bytes).unwrap().page_count(), 2);
    }

    #[test]
    fn info_reports_text_presence() {
        let source = PageSource::open(&pdf_with_text_pages(&["x", "", "y"])).unwrap();
        let info = source.info().unwrap();
        assert_eq!(info.page_count, 3);
        let flags: Vec<bool> = info.pages.iter().map(|page| page.has_text).collect();
        assert_eq!(flags, vec![true, false, true]);
    }
}
