// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format transcoder: PDF to Word, PowerPoint, Excel and JPEG, and raster
// images to PDF. Text-based conversions carry extracted text only; layout,
// fonts and images are not reproduced.

mod docx;
pub(crate) mod ooxml;
mod pptx;
mod xlsx;

use tracing::{info, instrument, warn};
use wandler_core::ConverterConfig;
use wandler_core::error::Result;

use crate::pdf::{PageSource, PdfWriter};
use crate::raster::{DEFAULT_RASTER_QUALITY, PageRasterizer, default_rasterizer};
use pptx::{Frame, Slide};

/// Title of the first slide of every converted deck.
pub const DECK_TITLE: &str = "PDF Conversion";

/// Column header of the converted spreadsheet.
pub const SPREADSHEET_HEADER: &str = "Extracted Text";

/// Converts between PDF and other formats.
pub struct FormatTranscoder {
    rasterizer: Box<dyn PageRasterizer>,
    raster_scale: f32,
    writer: PdfWriter,
}

impl FormatTranscoder {
    /// Transcoder with an explicit rasterizer and default settings.
    pub fn new(rasterizer: Box<dyn PageRasterizer>) -> Self {
        Self {
            rasterizer,
            raster_scale: 2.0,
            writer: PdfWriter::letter(),
        }
    }

    /// Transcoder using the build's default rasterizer and `config` values.
    pub fn from_config(config: &ConverterConfig) -> Self {
        let mut writer = PdfWriter::new(config.image_page_size);
        writer.set_margin(config.image_page_margin_pt);
        Self {
            rasterizer: default_rasterizer(config.raster_quality),
            raster_scale: config.raster_scale,
            writer,
        }
    }

    // -- PDF to office formats ------------------------------------------------

    /// One paragraph per page that has text; text-less pages are skipped.
    #[instrument(skip_all, fields(pages = source.page_count()))]
    pub fn pdf_to_docx(&self, source: &PageSource) -> Result<Vec<u8>> {
        let mut paragraphs = Vec::new();
        for index in 0..source.page_count() {
            let text = source.page_text(index)?;
            if !text.trim().is_empty() {
                paragraphs.push(text.trim_end().to_string());
            }
        }
        info!(paragraphs = paragraphs.len(), "Building DOCX");
        docx::build_docx(&paragraphs)
    }

    /// A title slide naming `file_name`, then one text slide per page.
    #[instrument(skip(self, source), fields(pages = source.page_count()))]
    pub fn pdf_to_pptx(&self, source: &PageSource, file_name: &str) -> Result<Vec<u8>> {
        let mut slides = Vec::with_capacity(source.page_count() + 1);
        slides.push(Slide::Title {
            title: DECK_TITLE.to_string(),
            subtitle: format!("Converted from {}", file_name),
        });
        for index in 0..source.page_count() {
            slides.push(Slide::TextBox {
                frame: Frame::from_inches(0.5, 1.0, 9.0, 6.0),
                text: source.page_text(index)?,
            });
        }
        info!(slides = slides.len(), "Building PPTX");
        pptx::build_pptx(&slides)
    }

    /// Every line of text in the document as one spreadsheet row.
    #[instrument(skip_all, fields(pages = source.page_count()))]
    pub fn pdf_to_xlsx(&self, source: &PageSource) -> Result<Vec<u8>> {
        let mut text = String::new();
        for index in 0..source.page_count() {
            text.push_str(&source.page_text(index)?);
            text.push('\n');
        }
        let rows: Vec<String> = text.split('\n').map(str::to_string).collect();
        info!(rows = rows.len(), "Building XLSX");
        xlsx::build_xlsx(SPREADSHEET_HEADER, &rows)
    }

    // -- Raster conversions ---------------------------------------------------

    /// Render one page to JPEG. An index past the end renders the first page
    /// instead.
    #[instrument(skip(self, source), fields(pages = source.page_count()))]
    pub fn pdf_to_jpeg(&self, source: &PageSource, page_index: usize) -> Result<Vec<u8>> {
        let page_index = if page_index < source.page_count() {
            page_index
        } else {
            warn!(
                page_index,
                page_count = source.page_count(),
                "Page index out of range, rendering first page"
            );
            0
        };
        source.rasterize(self.rasterizer.as_ref(), page_index, self.raster_scale)
    }

    /// One page per image, in input order.
    pub fn images_to_pdf<B: AsRef<[u8]>>(&self, images: &[B]) -> Result<Vec<u8>> {
        self.writer.create_from_images(images)
    }
}

impl Default for FormatTranscoder {
    fn default() -> Self {
        Self::new(default_rasterizer(DEFAULT_RASTER_QUALITY))
    }
}
