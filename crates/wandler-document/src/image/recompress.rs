// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lossy re-encoding of embedded PDF images, and substitution of the result
// back into the owning document.

use tracing::{debug, instrument};
use wandler_core::error::Result;

use super::ImageProcessor;
use crate::pdf::images::substitute_jpeg;
use crate::pdf::{EmbeddedImage, ImageRef, PageSource};

/// A re-encoded image ready to replace its original stream.
#[derive(Debug, Clone)]
pub struct RecompressedImage {
    /// Baseline JPEG bytes.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Re-encodes embedded images as RGB JPEG.
///
/// Alpha, palettes and grayscale are all flattened to three-channel RGB;
/// transparency is lost.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageRecompressor;

impl ImageRecompressor {
    /// Decode `image` and encode it again at `quality` percent.
    #[instrument(skip(self, image), fields(reference = %image.reference, input_len = image.data.len()))]
    pub fn recompress(&self, image: &EmbeddedImage, quality: u8) -> Result<RecompressedImage> {
        let processor = ImageProcessor::from_embedded(image)?;
        let (width, height) = (processor.width(), processor.height());
        let data = processor.to_jpeg_bytes(quality)?;
        debug!(width, height, output_len = data.len(), "Image recompressed");
        Ok(RecompressedImage {
            data,
            width,
            height,
        })
    }

    /// Replace image `reference` in `source` with `replacement`.
    pub fn substitute(
        &self,
        source: &mut PageSource,
        reference: ImageRef,
        replacement: RecompressedImage,
    ) -> Result<()> {
        substitute_jpeg(
            source.document_mut(),
            reference,
            replacement.data,
            replacement.width,
            replacement.height,
        )
    }
}
