// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic PDF and image fixtures, built in code so the tests need no files
// on disk. Shared between unit tests (as `crate::testing`) and the
// integration tests in this directory.

#![allow(dead_code)]

use std::io::{Cursor, Read};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// What goes on one fixture page.
#[derive(Default, Clone)]
pub struct PageSpec {
    /// Text drawn with Helvetica; empty means no text operators at all.
    pub text: String,
    /// JPEG payload of an image painted on the page.
    pub jpeg: Option<(Vec<u8>, u32, u32)>,
    /// Raw 8-bit RGB pixels stored Flate-compressed.
    pub raw_rgb: Option<(Vec<u8>, u32, u32)>,
}

impl PageSpec {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }
}

/// Build a PDF from page specs, lopdf-style.
pub fn build_pdf(specs: &[PageSpec]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids = Vec::new();
    for spec in specs {
        let mut operations = Vec::new();
        let mut xobjects = lopdf::Dictionary::new();

        if !spec.text.is_empty() {
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(spec.text.as_str())]),
                Operation::new("ET", vec![]),
            ]);
        }

        if let Some((jpeg, width, height)) = &spec.jpeg {
            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => *width as i64,
                    "Height" => *height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                jpeg.clone(),
            ));
            xobjects.set("Im1", image_id);
            operations.extend(paint_image("Im1", *width, *height));
        }

        if let Some((pixels, width, height)) = &spec.raw_rgb {
            let mut stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => *width as i64,
                    "Height" => *height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                },
                pixels.clone(),
            );
            stream.compress().unwrap();
            let image_id = doc.add_object(stream);
            xobjects.set("Im2", image_id);
            operations.extend(paint_image("Im2", *width, *height));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
                "XObject" => xobjects,
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut output = Vec::new();
    doc.save_to(&mut output).unwrap();
    output
}

fn paint_image(name: &str, width: u32, height: u32) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                (width as i64).into(),
                0.into(),
                0.into(),
                (height as i64).into(),
                50.into(),
                50.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

/// `count` pages without any content.
pub fn pdf_with_pages(count: usize) -> Vec<u8> {
    build_pdf(&vec![PageSpec::default(); count])
}

/// One page per string; empty strings give pages without text.
pub fn pdf_with_text_pages(texts: &[&str]) -> Vec<u8> {
    let specs: Vec<PageSpec> = texts.iter().map(|text| PageSpec::text(text)).collect();
    build_pdf(&specs)
}

/// `count` pages, each with a caption and one high-detail JPEG image.
pub fn pdf_with_image_pages(count: usize, width: u32, height: u32) -> Vec<u8> {
    let jpeg = jpeg_bytes(&noisy_rgb(width, height), 98);
    let specs: Vec<PageSpec> = (0..count)
        .map(|index| PageSpec {
            text: format!("Photo {}", index + 1),
            jpeg: Some((jpeg.clone(), width, height)),
            raw_rgb: None,
        })
        .collect();
    build_pdf(&specs)
}

/// A page holding a Flate-compressed raw RGB image.
pub fn pdf_with_raw_image(width: u32, height: u32) -> Vec<u8> {
    let pixels = noisy_rgb(width, height).into_raw();
    build_pdf(&[PageSpec {
        text: "Raw".to_string(),
        jpeg: None,
        raw_rgb: Some((pixels, width, height)),
    }])
}

/// A page whose only image claims JPEG 2000 encoding, which cannot be
/// decoded.
pub fn pdf_with_jpx_image() -> Vec<u8> {
    let mut doc = Document::load_mem(&pdf_with_image_pages(1, 16, 16)).unwrap();
    for object in doc.objects.values_mut() {
        if let Object::Stream(stream) = object {
            if stream.dict.has(b"Width") {
                stream.dict.set("Filter", "JPXDecode");
            }
        }
    }
    let mut output = Vec::new();
    doc.save_to(&mut output).unwrap();
    output
}

/// One page whose resources hold a single image XObject built from `dict`
/// and `content`, stored as given.
pub fn pdf_with_image_stream(dict: lopdf::Dictionary, content: Vec<u8>) -> Vec<u8> {
    let mut doc = Document::load_mem(&pdf_with_pages(1)).unwrap();
    let image_id = doc.add_object(Stream::new(dict, content));
    let page_id = *doc.get_pages().values().next().unwrap();
    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .unwrap();
    let resources = page
        .get_mut(b"Resources")
        .and_then(Object::as_dict_mut)
        .unwrap();
    resources.set("XObject", dictionary! { "Im1" => image_id });
    let mut output = Vec::new();
    doc.save_to(&mut output).unwrap();
    output
}

/// Deterministic high-frequency image; JPEG size depends strongly on quality.
pub fn noisy_rgb(width: u32, height: u32) -> RgbImage {
    let mut state: u32 = 0x2545_F491;
    RgbImage::from_fn(width, height, |x, y| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let noise = (state & 0x3F) as u8;
        Rgb([
            (x * 255 / width.max(1)) as u8 ^ noise,
            (y * 255 / height.max(1)) as u8 ^ noise,
            noise.wrapping_mul(3),
        ])
    })
}

/// Half-transparent RGBA image.
pub fn translucent_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| Rgba([200, 30, 30, if x % 2 == 0 { 0 } else { 255 }]))
}

pub fn jpeg_bytes(image: &RgbImage, quality: u8) -> Vec<u8> {
    let mut buffer = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    image.write_with_encoder(encoder).unwrap();
    buffer
}

pub fn png_bytes(image: DynamicImage) -> Vec<u8> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

/// Read one entry of a ZIP archive (OOXML package or split archive).
pub fn zip_entry(archive: &[u8], name: &str) -> Vec<u8> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut entry = zip.by_name(name).unwrap();
    let mut data = Vec::new();
    entry.read_to_end(&mut data).unwrap();
    data
}

/// Entry names of a ZIP archive, in archive order.
pub fn zip_entry_names(archive: &[u8]) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    (0..zip.len())
        .map(|index| zip.by_index(index).unwrap().name().to_string())
        .collect()
}

/// Text content of every element named `tag` (e.g. `w:p`, `a:p`, `c`),
/// concatenating the text nodes inside it.
pub fn element_texts(xml: &[u8], tag: &str) -> Vec<String> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_reader(xml);
    let mut texts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Start(start) if start.name().as_ref() == tag.as_bytes() => {
                depth += 1;
                if depth == 1 {
                    current.clear();
                }
            }
            Event::Empty(empty) if depth == 0 && empty.name().as_ref() == tag.as_bytes() => {
                texts.push(String::new());
            }
            Event::Empty(empty) if depth > 0 && empty.name().as_ref() == b"w:br" => {
                current.push('\n');
            }
            Event::Text(text) if depth > 0 => {
                current.push_str(&text.unescape().unwrap());
            }
            Event::End(end) if end.name().as_ref() == tag.as_bytes() => {
                depth -= 1;
                if depth == 0 {
                    texts.push(current.clone());
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    texts
}
