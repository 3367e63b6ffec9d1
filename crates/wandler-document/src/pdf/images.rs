// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Embedded image discovery. Walks a page's XObject resources (including
// nested form XObjects) and exposes every image stream as an encoded payload
// plus a reference back to its object.

use std::collections::BTreeSet;
use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, trace};

use super::copy::inherited_attribute;
use super::samples::{ColorModel, decode_ranges, decode_samples, pixel_count};

/// Identifies an image object inside its owning document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageRef(pub(crate) ObjectId);

impl ImageRef {
    /// PDF object number and generation.
    pub fn object_id(&self) -> (u32, u16) {
        self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.0.0, self.0.1)
    }
}

/// Encoding of an [`EmbeddedImage`] payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageFormatTag {
    /// DCT-encoded stream, exposed verbatim.
    Jpeg,
    /// Raw pixel stream, re-wrapped as PNG.
    Png,
    /// Anything we cannot expose as a standard raster file (JPEG 2000, JBIG2,
    /// CCITT, unknown colour spaces, truncated or oversized pixel data).
    /// Holds the stream filter name.
    Other(String),
}

/// An image embedded in a page's resources.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    /// Object reference, unique within the owning document.
    pub reference: ImageRef,
    pub format: ImageFormatTag,
    pub width: u32,
    pub height: u32,
    /// Encoded payload (JPEG, PNG, or raw stream bytes for `Other`).
    pub data: Vec<u8>,
}

/// Collect the images reachable from a page's `/Resources /XObject`.
///
/// Stencil masks (`/ImageMask true`) are paint operations rather than images
/// and are skipped.
pub(crate) fn page_images(document: &Document, page_id: ObjectId) -> Vec<EmbeddedImage> {
    let mut images = Vec::new();
    let mut visited = BTreeSet::new();

    if let Some(resources) = inherited_attribute(document, page_id, b"Resources") {
        if let Ok((_, Object::Dictionary(resources))) = document.dereference(resources) {
            collect_from_resources(document, resources, &mut visited, &mut images);
        }
    }

    debug!(?page_id, count = images.len(), "Page images collected");
    images
}

fn collect_from_resources(
    document: &Document,
    resources: &Dictionary,
    visited: &mut BTreeSet<ObjectId>,
    images: &mut Vec<EmbeddedImage>,
) {
    let Ok(xobjects) = resources.get(b"XObject") else {
        return;
    };
    let Ok((_, Object::Dictionary(xobjects))) = document.dereference(xobjects) else {
        return;
    };

    for (_name, entry) in xobjects.iter() {
        // Images must be indirect to be replaceable in place.
        let Ok(id) = entry.as_reference() else {
            continue;
        };
        if !visited.insert(id) {
            continue;
        }
        let Ok(Object::Stream(stream)) = document.get_object(id) else {
            continue;
        };

        match name_of(&stream.dict, b"Subtype") {
            Some(b"Image") => {
                if is_stencil_mask(&stream.dict) {
                    trace!(?id, "Skipping stencil mask");
                    continue;
                }
                images.push(describe_image(document, id, stream));
            }
            Some(b"Form") => {
                if let Ok(nested) = stream.dict.get(b"Resources") {
                    if let Ok((_, Object::Dictionary(nested))) = document.dereference(nested) {
                        collect_from_resources(document, nested, visited, images);
                    }
                }
            }
            _ => {}
        }
    }
}

fn describe_image(document: &Document, id: ObjectId, stream: &Stream) -> EmbeddedImage {
    let dict = &stream.dict;
    let dimension = |key: &[u8]| {
        int_of(dict, key)
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or(0)
    };
    let (width, height) = (dimension(b"Width"), dimension(b"Height"));

    let (format, data) = match single_filter(dict) {
        Some(b"DCTDecode") => match remap_jpeg(document, stream) {
            Some(png) => (ImageFormatTag::Png, png),
            None => (ImageFormatTag::Jpeg, stream.content.clone()),
        },
        Some(filter @ (b"JPXDecode" | b"JBIG2Decode" | b"CCITTFaxDecode")) => (
            ImageFormatTag::Other(String::from_utf8_lossy(filter).into_owned()),
            stream.content.clone(),
        ),
        _ => match raw_to_png(document, stream, width, height) {
            Some(png) => (ImageFormatTag::Png, png),
            None => (
                ImageFormatTag::Other(filter_label(dict)),
                stream.content.clone(),
            ),
        },
    };

    EmbeddedImage {
        reference: ImageRef(id),
        format,
        width,
        height,
        data,
    }
}

/// Decode a raw (possibly Flate/LZW-compressed) pixel stream into PNG bytes.
fn raw_to_png(document: &Document, stream: &Stream, width: u32, height: u32) -> Option<Vec<u8>> {
    pixel_count(width, height)?;
    let pixels = if stream.dict.has(b"Filter") {
        stream.decompressed_content().ok()?
    } else {
        stream.content.clone()
    };
    let bits = u32::try_from(int_of(&stream.dict, b"BitsPerComponent").unwrap_or(8)).ok()?;
    let model = ColorModel::parse(document, stream.dict.get(b"ColorSpace").ok()?)?;
    let decode = decode_array(document, &stream.dict);
    let image = decode_samples(&model, &pixels, width, height, bits, decode)?;
    encode_png(&image)
}

/// Apply a non-default `/Decode` array to a one- or three-component DCT
/// image, returning PNG bytes. `None` means the JPEG can be used as is.
///
/// Four-component JPEGs are decoded as Adobe-inverted CMYK, which is what
/// `/Decode [1 0 1 0 1 0 1 0]` declares, so they are left alone.
fn remap_jpeg(document: &Document, stream: &Stream) -> Option<Vec<u8>> {
    let decode = decode_array(document, &stream.dict)?;
    let model = match stream.dict.get(b"ColorSpace") {
        Ok(color_space) => ColorModel::parse(document, color_space)?,
        Err(_) => ColorModel::Rgb,
    };
    if !matches!(model, ColorModel::Gray | ColorModel::Rgb) {
        return None;
    }
    let defaults = model.default_decode(8);
    if decode_ranges(Some(decode), defaults.clone()) == defaults {
        return None;
    }

    let jpeg = image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg).ok()?;
    let (width, height) = (jpeg.width(), jpeg.height());
    let samples = match model {
        ColorModel::Gray => jpeg.to_luma8().into_raw(),
        _ => jpeg.to_rgb8().into_raw(),
    };
    let image = decode_samples(&model, &samples, width, height, 8, Some(decode))?;
    trace!(width, height, "Decode array applied to JPEG samples");
    encode_png(&image)
}

fn decode_array<'a>(document: &'a Document, dict: &'a Dictionary) -> Option<&'a [Object]> {
    let (_, decode) = document.dereference(dict.get(b"Decode").ok()?).ok()?;
    decode.as_array().ok().map(Vec::as_slice)
}

fn encode_png(image: &DynamicImage) -> Option<Vec<u8>> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png).ok()?;
    Some(png)
}

fn is_stencil_mask(dict: &Dictionary) -> bool {
    matches!(dict.get(b"ImageMask"), Ok(Object::Boolean(true)))
}

/// The stream's filter when it has exactly one.
fn single_filter(dict: &Dictionary) -> Option<&[u8]> {
    match dict.get(b"Filter").ok()? {
        Object::Name(name) => Some(name.as_slice()),
        Object::Array(filters) if filters.len() == 1 => filters[0].as_name().ok(),
        _ => None,
    }
}

fn filter_label(dict: &Dictionary) -> String {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => String::from_utf8_lossy(name).into_owned(),
        Ok(Object::Array(filters)) => filters
            .iter()
            .filter_map(|filter| filter.as_name().ok())
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .collect::<Vec<_>>()
            .join("+"),
        _ => "raw".to_string(),
    }
}

fn name_of<'a>(dict: &'a Dictionary, key: &[u8]) -> Option<&'a [u8]> {
    dict.get(key).and_then(Object::as_name).ok()
}

fn int_of(dict: &Dictionary, key: &[u8]) -> Option<i64> {
    dict.get(key).and_then(Object::as_i64).ok()
}

/// Keys describing the old samples, removed when an image is re-encoded.
const STALE_SAMPLE_KEYS: [&[u8]; 5] = [b"DecodeParms", b"SMask", b"Mask", b"Decode", b"Intent"];

/// Replace the pixel data of image `reference` with a baseline JPEG.
///
/// The stream dictionary is rewritten to describe the new payload: DCT-encoded
/// 8-bit DeviceRGB at `width` x `height`. Soft masks, explicit masks and decode
/// arrays are dropped since they described the old samples.
pub(crate) fn substitute_jpeg(
    document: &mut Document,
    reference: ImageRef,
    jpeg: Vec<u8>,
    width: u32,
    height: u32,
) -> wandler_core::error::Result<()> {
    use wandler_core::error::WandlerError;

    let stream = document
        .get_object_mut(reference.0)
        .and_then(Object::as_stream_mut)
        .map_err(|err| {
            WandlerError::Pdf(format!("image {} is not a stream: {}", reference, err))
        })?;

    for key in STALE_SAMPLE_KEYS {
        stream.dict.remove(key);
    }
    stream.dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
    stream.dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    stream.dict.set("BitsPerComponent", 8);
    stream.dict.set("Width", width as i64);
    stream.dict.set("Height", height as i64);
    stream.set_content(jpeg);
    // DCT data must not be wrapped in a second filter on save.
    stream.allows_compression = false;

    trace!(%reference, width, height, "Image stream substituted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use lopdf::dictionary;

    fn image_stream(dict: Dictionary, content: Vec<u8>) -> Stream {
        Stream::new(dict, content)
    }

    #[test]
    fn raw_rgb_stream_becomes_png() {
        let doc = Document::with_version("1.5");
        let stream = image_stream(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2,
                "Height" => 1,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            vec![255, 0, 0, 0, 0, 255],
        );
        let image = describe_image(&doc, (7, 0), &stream);
        assert_eq!(image.format, ImageFormatTag::Png);
        assert_eq!((image.width, image.height), (2, 1));

        let decoded = image::load_from_memory(&image.data).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 255]);
    }

    #[test]
    fn four_bit_indexed_stream_becomes_png() {
        let doc = Document::with_version("1.5");
        let stream = image_stream(
            dictionary! {
                "Subtype" => "Image",
                "Width" => 4,
                "Height" => 2,
                "ColorSpace" => vec![
                    "Indexed".into(),
                    "DeviceRGB".into(),
                    1.into(),
                    Object::string_literal(vec![0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF]),
                ],
                "BitsPerComponent" => 4,
            },
            vec![0x01, 0x01, 0x10, 0x10],
        );
        let image = describe_image(&doc, (5, 0), &stream);
        assert_eq!(image.format, ImageFormatTag::Png);

        let decoded = image::load_from_memory(&image.data).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 255]);
        assert_eq!(decoded.get_pixel(0, 1).0, [0, 0, 255]);
    }

    #[test]
    fn inverted_decode_is_applied_to_raw_gray() {
        let doc = Document::with_version("1.5");
        let stream = image_stream(
            dictionary! {
                "Subtype" => "Image",
                "Width" => 2,
                "Height" => 2,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Decode" => vec![1.into(), 0.into()],
            },
            vec![0; 4],
        );
        let image = describe_image(&doc, (5, 0), &stream);
        let decoded = image::load_from_memory(&image.data).unwrap().to_luma8();
        assert!(decoded.pixels().all(|pixel| pixel.0 == [255]));
    }

    #[test]
    fn inverted_decode_is_applied_to_gray_jpeg() {
        let black = image::GrayImage::from_pixel(8, 8, image::Luma([0]));
        let mut jpeg = Vec::new();
        black
            .write_with_encoder(image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 95))
            .unwrap();

        let doc = Document::with_version("1.5");
        let stream = image_stream(
            dictionary! {
                "Subtype" => "Image",
                "Width" => 8,
                "Height" => 8,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
                "Decode" => vec![1.into(), 0.into()],
            },
            jpeg,
        );
        let image = describe_image(&doc, (5, 0), &stream);
        assert_eq!(image.format, ImageFormatTag::Png);
        let decoded = image::load_from_memory(&image.data).unwrap().to_luma8();
        assert!(decoded.pixels().all(|pixel| pixel.0[0] >= 250));
    }

    #[test]
    fn jpeg_with_default_decode_passes_through() {
        let doc = Document::with_version("1.5");
        let jpeg = vec![0xFF, 0xD8, 0xFF, 0xD9];
        let stream = image_stream(
            dictionary! {
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
                "ColorSpace" => "DeviceGray",
                "Filter" => "DCTDecode",
                "Decode" => vec![0.into(), 1.into()],
            },
            jpeg.clone(),
        );
        let image = describe_image(&doc, (5, 0), &stream);
        assert_eq!(image.format, ImageFormatTag::Jpeg);
        assert_eq!(image.data, jpeg);
    }

    #[test]
    fn huge_dimensions_are_tagged_other() {
        let doc = Document::with_version("1.5");
        let stream = image_stream(
            dictionary! {
                "Subtype" => "Image",
                "Width" => 3_000_000_000i64,
                "Height" => 3_000_000_000i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            vec![0; 12],
        );
        let image = describe_image(&doc, (5, 0), &stream);
        assert_eq!(image.format, ImageFormatTag::Other("raw".into()));
    }

    #[test]
    fn jpeg2000_is_tagged_other() {
        let doc = Document::with_version("1.5");
        let stream = image_stream(
            dictionary! {
                "Subtype" => "Image",
                "Width" => 4,
                "Height" => 4,
                "Filter" => "JPXDecode",
            },
            vec![0, 1, 2, 3],
        );
        let image = describe_image(&doc, (3, 0), &stream);
        assert_eq!(image.format, ImageFormatTag::Other("JPXDecode".into()));
        assert_eq!(image.data, vec![0, 1, 2, 3]);
    }

    #[test]
    fn truncated_pixels_fall_back_to_other() {
        let doc = Document::with_version("1.5");
        let stream = image_stream(
            dictionary! {
                "Subtype" => "Image",
                "Width" => 10,
                "Height" => 10,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            vec![0; 12],
        );
        let image = describe_image(&doc, (3, 0), &stream);
        assert_eq!(image.format, ImageFormatTag::Other("raw".into()));
    }

    #[test]
    fn substitution_rewrites_stream_dictionary() {
        let mut doc = Document::with_version("1.5");
        let id = doc.add_object(image_stream(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2,
                "Height" => 2,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
                "DecodeParms" => dictionary! { "Predictor" => 15 },
            },
            vec![0; 4],
        ));

        substitute_jpeg(&mut doc, ImageRef(id), vec![0xFF, 0xD8, 0xFF, 0xD9], 1, 1).unwrap();

        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert_eq!(name_of(&stream.dict, b"Filter"), Some(&b"DCTDecode"[..]));
        assert_eq!(name_of(&stream.dict, b"ColorSpace"), Some(&b"DeviceRGB"[..]));
        assert!(!stream.dict.has(b"DecodeParms"));
        assert_eq!(int_of(&stream.dict, b"Width"), Some(1));
        assert_eq!(stream.content, vec![0xFF, 0xD8, 0xFF, 0xD9]);
        assert!(!stream.allows_compression);
    }
}
