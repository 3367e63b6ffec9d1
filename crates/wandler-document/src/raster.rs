// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterisation. lopdf parses PDFs but cannot paint them, so rendering
// sits behind the `PageRasterizer` trait. The MuPDF backend is compiled in with
// the `mupdf` feature; without it every render request fails cleanly.

use wandler_core::error::{Result, WandlerError};

/// Default JPEG quality for rendered pages.
pub const DEFAULT_RASTER_QUALITY: u8 = 95;

/// Renders a single page of a serialised PDF to JPEG bytes.
///
/// Implementations must be `Send + Sync` so one renderer can serve
/// concurrent requests.
pub trait PageRasterizer: Send + Sync {
    /// Short backend name, used in logs.
    fn name(&self) -> &str;

    /// Render page `page_index` (0-based) of `pdf` magnified by `scale`.
    fn render_jpeg(&self, pdf: &[u8], page_index: usize, scale: f32) -> Result<Vec<u8>>;
}

/// Stand-in used when no rendering backend was compiled in.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableRasterizer;

impl PageRasterizer for UnavailableRasterizer {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn render_jpeg(&self, _pdf: &[u8], _page_index: usize, _scale: f32) -> Result<Vec<u8>> {
        Err(WandlerError::UnsupportedDocument(
            "page rendering requires the `mupdf` feature".to_string(),
        ))
    }
}

/// The best rasterizer available in this build.
pub fn default_rasterizer(quality: u8) -> Box<dyn PageRasterizer> {
    #[cfg(feature = "mupdf")]
    {
        Box::new(mupdf_backend::MupdfRasterizer::new(quality))
    }
    #[cfg(not(feature = "mupdf"))]
    {
        let _ = quality;
        Box::new(UnavailableRasterizer)
    }
}

#[cfg(feature = "mupdf")]
pub use mupdf_backend::MupdfRasterizer;

#[cfg(feature = "mupdf")]
mod mupdf_backend {
    use image::RgbImage;
    use image::codecs::jpeg::JpegEncoder;
    use mupdf::{Colorspace, Document, Matrix};
    use tracing::{debug, instrument};
    use wandler_core::error::{Result, WandlerError};

    use super::PageRasterizer;

    /// Renders pages with MuPDF into an RGB pixmap, then encodes JPEG.
    #[derive(Debug, Clone, Copy)]
    pub struct MupdfRasterizer {
        quality: u8,
    }

    impl MupdfRasterizer {
        pub fn new(quality: u8) -> Self {
            Self {
                quality: quality.clamp(1, 100),
            }
        }
    }

    impl PageRasterizer for MupdfRasterizer {
        fn name(&self) -> &str {
            "mupdf"
        }

        #[instrument(skip(self, pdf), fields(bytes_len = pdf.len()))]
        fn render_jpeg(&self, pdf: &[u8], page_index: usize, scale: f32) -> Result<Vec<u8>> {
            let render_err = |err: mupdf::Error| {
                WandlerError::Pdf(format!("render of page {} failed: {}", page_index + 1, err))
            };

            let document = Document::from_bytes(pdf, "application/pdf").map_err(render_err)?;
            let page_number = i32::try_from(page_index).map_err(|_| {
                WandlerError::InvalidArgument(format!("page index {} too large", page_index))
            })?;
            let page = document.load_page(page_number).map_err(render_err)?;

            let matrix = Matrix::new_scale(scale, scale);
            let pixmap = page
                .to_pixmap(&matrix, &Colorspace::device_rgb(), false, true)
                .map_err(render_err)?;

            let width = pixmap.width() as u32;
            let height = pixmap.height() as u32;
            let components = pixmap.n() as usize;
            let samples = pixmap.samples();

            // Pixmaps may carry alpha or extra channels; keep the first three.
            let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
            for pixel in samples.chunks_exact(components.max(1)) {
                let r = pixel.first().copied().unwrap_or(0);
                let g = pixel.get(1).copied().unwrap_or(r);
                let b = pixel.get(2).copied().unwrap_or(r);
                rgb.extend_from_slice(&[r, g, b]);
            }
            let image = RgbImage::from_raw(width, height, rgb).ok_or_else(|| {
                WandlerError::Image("rendered pixmap has unexpected size".to_string())
            })?;

            let mut output = Vec::new();
            let encoder = JpegEncoder::new_with_quality(&mut output, self.quality);
            image
                .write_with_encoder(encoder)
                .map_err(|err| WandlerError::Image(format!("JPEG encode failed: {}", err)))?;

            debug!(width, height, output_bytes = output.len(), "Page rendered");
            Ok(output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_backend_reports_unsupported() {
        let err = UnavailableRasterizer
            .render_jpeg(b"%PDF-1.7", 0, 2.0)
            .unwrap_err();
        assert!(matches!(err, WandlerError::UnsupportedDocument(_)));
    }

    #[cfg(not(feature = "mupdf"))]
    #[test]
    fn default_backend_without_mupdf_is_unavailable() {
        assert_eq!(default_rasterizer(DEFAULT_RASTER_QUALITY).name(), "unavailable");
    }

    #[cfg(feature = "mupdf")]
    #[test]
    fn mupdf_renders_fixture_page_to_jpeg() {
        let pdf = crate::testing::pdf_with_text_pages(&["first", "second"]);
        let rasterizer = MupdfRasterizer::new(DEFAULT_RASTER_QUALITY);

        let jpeg = rasterizer.render_jpeg(&pdf, 1, 0.5).unwrap();
        assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);

        // Letter page at half scale; MuPDF rounds the bounds outward.
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert!((305..=307).contains(&decoded.width()));
        assert!((395..=397).contains(&decoded.height()));
    }

    #[cfg(feature = "mupdf")]
    #[test]
    fn mupdf_rejects_missing_page() {
        let pdf = crate::testing::pdf_with_text_pages(&["only"]);
        let err = MupdfRasterizer::new(80).render_jpeg(&pdf, 3, 1.0).unwrap_err();
        assert!(matches!(err, WandlerError::Pdf(_)));
    }
}
