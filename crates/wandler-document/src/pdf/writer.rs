// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: lay raster images out one per page using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};
use wandler_core::{DocumentType, PageSize};
use wandler_core::error::{Result, WandlerError};

use crate::image::ImageProcessor;

/// Default margin, split evenly between the two sides of each axis.
pub const DEFAULT_MARGIN_PT: f32 = 100.0;

/// Title recorded in the document metadata.
const DOCUMENT_TITLE: &str = "Converted Document";

/// At 72 dpi one image pixel is one PDF point.
const POINT_DPI: f32 = 72.0;

/// Builds image-only PDFs: one page per input image.
///
/// Images are drawn at 1 px = 1 pt, shrunk (never enlarged) to fit inside the
/// page minus the margin, and anchored at half the margin from the bottom-left
/// page corner.
pub struct PdfWriter {
    page_size: PageSize,
    margin_pt: f32,
}

impl PdfWriter {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            margin_pt: DEFAULT_MARGIN_PT,
        }
    }

    /// US Letter with the default margin.
    pub fn letter() -> Self {
        Self::new(PageSize::Letter)
    }

    pub fn set_margin(&mut self, margin_pt: f32) {
        self.margin_pt = margin_pt.max(0.0);
    }

    /// Largest image size (in points) that fits on a page.
    pub fn image_box(&self) -> (u32, u32) {
        let (width, height) = self.page_size.dimensions_pt();
        (
            (width - self.margin_pt).max(1.0) as u32,
            (height - self.margin_pt).max(1.0) as u32,
        )
    }

    // -- Images to PDF --------------------------------------------------------

    /// Create a PDF with one page per encoded image (JPEG or PNG), in order.
    #[instrument(skip_all, fields(images = images.len()))]
    pub fn create_from_images<B: AsRef<[u8]>>(&self, images: &[B]) -> Result<Vec<u8>> {
        if images.is_empty() {
            return Err(WandlerError::EmptyInput {
                required: 1,
                actual: 0,
            });
        }

        let (page_w_pt, page_h_pt) = self.page_size.dimensions_pt();
        let (box_w, box_h) = self.image_box();
        let offset = self.margin_pt / 2.0;
        info!(page_size = ?self.page_size, "Creating image PDF");

        let mut doc = PdfDocument::new(DOCUMENT_TITLE);
        let mut pages = Vec::with_capacity(images.len());

        for (index, bytes) in images.iter().enumerate() {
            if !DocumentType::sniff(bytes.as_ref()).is_some_and(|kind| kind.is_raster()) {
                return Err(WandlerError::UnsupportedDocument(format!(
                    "image {} is neither JPEG nor PNG",
                    index + 1
                )));
            }
            let fitted = ImageProcessor::from_bytes(bytes.as_ref())?.fit_within(box_w, box_h);
            let (width, height) = (fitted.width(), fitted.height());
            let rgb = fitted.into_dynamic().to_rgb8();

            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(offset)),
                    translate_y: Some(Pt(offset)),
                    scale_x: Some(1.0),
                    scale_y: Some(1.0),
                    dpi: Some(POINT_DPI),
                    rotate: None,
                },
            }];
            pages.push(PdfPage::new(pt_to_mm(page_w_pt), pt_to_mm(page_h_pt), ops));
            debug!(index, width, height, "Image placed on page");
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "printpdf reported warnings");
        }
        Ok(output)
    }
}

fn pt_to_mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}
