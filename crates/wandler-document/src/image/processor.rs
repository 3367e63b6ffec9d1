// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decode, bounded downscale, and lossy JPEG re-encode of
// in-memory images using the `image` crate.

use image::DynamicImage;
use tracing::{debug, instrument};
use wandler_core::error::{Result, WandlerError};

use crate::pdf::{EmbeddedImage, ImageFormatTag};

/// Image pipeline over a single decoded image.
///
/// Each transformation consumes `self` and returns a new processor, so calls
/// chain:
///
/// ```ignore
/// let jpeg = ImageProcessor::from_bytes(&png)?
///     .fit_within(512, 692)
///     .to_jpeg_bytes(95)?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode JPEG, PNG or any other format the `image` crate recognises.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data)
            .map_err(|err| WandlerError::Decode(format!("failed to decode image: {}", err)))?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image })
    }

    /// Decode an image pulled out of a PDF page.
    ///
    /// Images tagged `Other` are not a standard raster format and are refused.
    pub fn from_embedded(embedded: &EmbeddedImage) -> Result<Self> {
        match &embedded.format {
            ImageFormatTag::Jpeg | ImageFormatTag::Png => Self::from_bytes(&embedded.data),
            ImageFormatTag::Other(filter) => Err(WandlerError::Decode(format!(
                "image {} uses unsupported encoding {}",
                embedded.reference, filter
            ))),
        }
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Shrink to fit within `max_width` x `max_height`, preserving aspect
    /// ratio. Never enlarges.
    #[instrument(skip(self), fields(width = self.image.width(), height = self.image.height()))]
    pub fn fit_within(self, max_width: u32, max_height: u32) -> Self {
        if self.image.width() <= max_width && self.image.height() <= max_height {
            return self;
        }
        let resized = self.image.resize(
            max_width.max(1),
            max_height.max(1),
            image::imageops::FilterType::Lanczos3,
        );
        debug!(
            new_w = resized.width(),
            new_h = resized.height(),
            "Image downscaled"
        );
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode as baseline JPEG at `quality` (1-100). Alpha is discarded.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder)
            .map_err(|err| WandlerError::Image(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::ImageRef;
    use crate::testing::{jpeg_bytes, noisy_rgb, png_bytes, translucent_rgba};

    #[test]
    fn fit_within_does_not_upscale() {
        let processor = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(noisy_rgb(40, 30)))
            .fit_within(512, 692);
        assert_eq!((processor.width(), processor.height()), (40, 30));
    }

    #[test]
    fn fit_within_preserves_aspect_ratio() {
        let processor =
            ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(noisy_rgb(2000, 1000)))
                .fit_within(512, 692);
        assert_eq!(processor.width(), 512);
        assert_eq!(processor.height(), 256);
    }

    #[test]
    fn lower_quality_gives_smaller_jpeg() {
        let processor = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(noisy_rgb(128, 128)));
        let high = processor.to_jpeg_bytes(95).unwrap();
        let low = processor.to_jpeg_bytes(50).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn alpha_images_encode_as_jpeg() {
        let png = png_bytes(DynamicImage::ImageRgba8(translucent_rgba(16, 16)));
        let jpeg = ImageProcessor::from_bytes(&png).unwrap().to_jpeg_bytes(85).unwrap();
        assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            ImageProcessor::from_bytes(b"not an image"),
            Err(WandlerError::Decode(_))
        ));
    }

    #[test]
    fn other_encodings_are_refused() {
        let embedded = EmbeddedImage {
            reference: ImageRef((7, 0)),
            format: ImageFormatTag::Other("JPXDecode".to_string()),
            width: 4,
            height: 4,
            data: vec![0; 16],
        };
        assert!(matches!(
            ImageProcessor::from_embedded(&embedded),
            Err(WandlerError::Decode(_))
        ));
    }

    #[test]
    fn embedded_jpeg_decodes() {
        let embedded = EmbeddedImage {
            reference: ImageRef((3, 0)),
            format: ImageFormatTag::Jpeg,
            width: 20,
            height: 10,
            data: jpeg_bytes(&noisy_rgb(20, 10), 90),
        };
        let processor = ImageProcessor::from_embedded(&embedded).unwrap();
        assert_eq!((processor.width(), processor.height()), (20, 10));
    }
}
