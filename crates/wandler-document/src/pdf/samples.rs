// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raw image sample decoding. Unpacks 1/2/4/8/16-bit samples, applies the
// image's /Decode array and converts the result to 8-bit gray or RGB.

use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Document, Object};

/// Largest accepted image side, in pixels (the JPEG limit).
pub(crate) const MAX_IMAGE_DIMENSION: u32 = 65_535;

/// Largest accepted pixel count (512 MiB of RGBA).
pub(crate) const MAX_IMAGE_PIXELS: usize = 1 << 27;

/// Nesting bound for colour spaces built on other colour spaces.
const MAX_COLOR_SPACE_DEPTH: usize = 8;

/// Pixel count of a `width` x `height` image, or `None` when either side is
/// zero or the image exceeds the size limits.
pub(crate) fn pixel_count(width: u32, height: u32) -> Option<usize> {
    if width == 0 || height == 0 || width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return None;
    }
    (width as usize)
        .checked_mul(height as usize)
        .filter(|&area| area <= MAX_IMAGE_PIXELS)
}

// -- Colour spaces ------------------------------------------------------------

/// An image colour space, reduced to what is needed to produce RGB.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ColorModel {
    Gray,
    Rgb,
    Cmyk,
    /// CIE L*a*b*; `range` holds the a* and b* bounds from `/Range`.
    Lab { range: [f32; 4] },
    Indexed {
        base: Box<ColorModel>,
        hival: usize,
        lookup: Vec<u8>,
    },
    /// `/Separation` (one input) or `/DeviceN`. Without a usable tint
    /// transform the inks are shown as gray coverage.
    Tint {
        inputs: usize,
        alternate: Box<ColorModel>,
        transform: Option<Exponential>,
    },
}

impl ColorModel {
    /// Resolve a `/ColorSpace` entry.
    pub(crate) fn parse(document: &Document, object: &Object) -> Option<Self> {
        Self::parse_at(document, object, 0)
    }

    fn parse_at(document: &Document, object: &Object, depth: usize) -> Option<Self> {
        if depth > MAX_COLOR_SPACE_DEPTH {
            return None;
        }
        let (_, object) = document.dereference(object).ok()?;
        let (family, params) = match object {
            Object::Name(name) => (name.as_slice(), &[] as &[Object]),
            Object::Array(items) => (items.first()?.as_name().ok()?, &items[1..]),
            _ => return None,
        };

        match family {
            b"DeviceGray" | b"CalGray" | b"G" => Some(Self::Gray),
            b"DeviceRGB" | b"CalRGB" | b"RGB" => Some(Self::Rgb),
            b"DeviceCMYK" | b"CMYK" => Some(Self::Cmyk),
            b"Lab" => Some(Self::Lab {
                range: lab_range(document, params.first()),
            }),
            b"ICCBased" => Self::parse_icc(document, params.first()?, depth),
            b"Indexed" | b"I" => Self::parse_indexed(document, params, depth),
            // [/Separation name alternate tintTransform]
            b"Separation" => Some(Self::parse_tint(
                document,
                1,
                params.get(1)?,
                params.get(2),
                depth,
            )),
            // [/DeviceN names alternate tintTransform attributes?]
            b"DeviceN" => {
                let (_, names) = document.dereference(params.first()?).ok()?;
                let inputs = names.as_array().ok()?.len();
                if inputs == 0 {
                    return None;
                }
                Some(Self::parse_tint(document, inputs, params.get(1)?, None, depth))
            }
            _ => None,
        }
    }

    fn parse_icc(document: &Document, profile: &Object, depth: usize) -> Option<Self> {
        let (_, profile) = document.dereference(profile).ok()?;
        let Object::Stream(stream) = profile else {
            return None;
        };
        if let Ok(alternate) = stream.dict.get(b"Alternate") {
            if let Some(model) = Self::parse_at(document, alternate, depth + 1) {
                return Some(model);
            }
        }
        match stream.dict.get(b"N").and_then(Object::as_i64).ok()? {
            1 => Some(Self::Gray),
            3 => Some(Self::Rgb),
            4 => Some(Self::Cmyk),
            _ => None,
        }
    }

    fn parse_indexed(document: &Document, params: &[Object], depth: usize) -> Option<Self> {
        // [/Indexed base hival lookup]
        let base = Self::parse_at(document, params.first()?, depth + 1)?;
        if matches!(base, Self::Indexed { .. }) {
            return None;
        }
        let (_, hival) = document.dereference(params.get(1)?).ok()?;
        let hival = usize::try_from(hival.as_i64().ok()?).ok()?.min(255);
        let lookup = match document.dereference(params.get(2)?).ok()?.1 {
            Object::String(bytes, _) => bytes.clone(),
            Object::Stream(stream) => stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
            _ => return None,
        };
        if lookup.len() < (hival + 1) * base.components() {
            return None;
        }
        Some(Self::Indexed {
            base: Box::new(base),
            hival,
            lookup,
        })
    }

    fn parse_tint(
        document: &Document,
        inputs: usize,
        alternate: &Object,
        function: Option<&Object>,
        depth: usize,
    ) -> Self {
        let alternate = Self::parse_at(document, alternate, depth + 1).unwrap_or(Self::Gray);
        let transform = function
            .and_then(|function| Exponential::parse(document, function))
            .filter(|function| function.c0.len() == alternate.components());
        Self::Tint {
            inputs,
            alternate: Box::new(alternate),
            transform,
        }
    }

    /// Samples per pixel.
    pub(crate) fn components(&self) -> usize {
        match self {
            Self::Gray | Self::Indexed { .. } => 1,
            Self::Rgb | Self::Lab { .. } => 3,
            Self::Cmyk => 4,
            Self::Tint { inputs, .. } => *inputs,
        }
    }

    /// The `/Decode` array implied when an image has none.
    pub(crate) fn default_decode(&self, bits: u32) -> Vec<(f32, f32)> {
        match self {
            Self::Indexed { .. } => vec![(0.0, max_sample(bits))],
            Self::Lab { range } => vec![(0.0, 100.0), (range[0], range[1]), (range[2], range[3])],
            other => vec![(0.0, 1.0); other.components()],
        }
    }

    /// Convert one pixel of decoded component values to RGB.
    fn to_rgb(&self, values: &[f32]) -> [u8; 3] {
        match self {
            Self::Gray => {
                let gray = unit_to_byte(values[0]);
                [gray, gray, gray]
            }
            Self::Rgb => [
                unit_to_byte(values[0]),
                unit_to_byte(values[1]),
                unit_to_byte(values[2]),
            ],
            Self::Cmyk => {
                let white = 1.0 - values[3].clamp(0.0, 1.0);
                let channel = |ink: f32| unit_to_byte((1.0 - ink.clamp(0.0, 1.0)) * white);
                [channel(values[0]), channel(values[1]), channel(values[2])]
            }
            Self::Lab { .. } => lab_to_rgb(values[0], values[1], values[2]),
            Self::Indexed {
                base,
                hival,
                lookup,
            } => {
                let index = (values[0].round().max(0.0) as usize).min(*hival);
                let width = base.components();
                match lookup.get(index * width..(index + 1) * width) {
                    Some(entry) => {
                        let decoded: Vec<f32> = entry
                            .iter()
                            .zip(base.default_decode(8))
                            .map(|(&byte, (min, max))| min + f32::from(byte) / 255.0 * (max - min))
                            .collect();
                        base.to_rgb(&decoded)
                    }
                    None => [0, 0, 0],
                }
            }
            Self::Tint {
                alternate,
                transform: Some(transform),
                ..
            } => alternate.to_rgb(&transform.eval(values[0])),
            Self::Tint { .. } => {
                let coverage = values.iter().fold(0.0f32, |acc, tint| acc.max(*tint));
                let gray = unit_to_byte(1.0 - coverage);
                [gray, gray, gray]
            }
        }
    }
}

/// A type 2 (exponential interpolation) PDF function of one input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Exponential {
    c0: Vec<f32>,
    c1: Vec<f32>,
    exponent: f32,
}

impl Exponential {
    fn parse(document: &Document, object: &Object) -> Option<Self> {
        let (_, object) = document.dereference(object).ok()?;
        let dict = match object {
            Object::Dictionary(dict) => dict,
            Object::Stream(stream) => &stream.dict,
            _ => return None,
        };
        if dict.get(b"FunctionType").and_then(Object::as_i64).ok()? != 2 {
            return None;
        }
        let floats = |key: &[u8], default: f32| -> Vec<f32> {
            match dict.get(key).and_then(Object::as_array) {
                Ok(values) => values.iter().filter_map(|value| value.as_float().ok()).collect(),
                Err(_) => vec![default],
            }
        };
        let c0 = floats(b"C0", 0.0);
        let c1 = floats(b"C1", 1.0);
        if c0.len() != c1.len() {
            return None;
        }
        let exponent = dict.get(b"N").and_then(Object::as_float).ok()?;
        Some(Self { c0, c1, exponent })
    }

    fn eval(&self, input: f32) -> Vec<f32> {
        let t = input.clamp(0.0, 1.0).powf(self.exponent);
        self.c0
            .iter()
            .zip(&self.c1)
            .map(|(low, high)| low + t * (high - low))
            .collect()
    }
}

fn lab_range(document: &Document, params: Option<&Object>) -> [f32; 4] {
    let mut range = [-100.0, 100.0, -100.0, 100.0];
    let values = params
        .and_then(|params| document.dereference(params).ok())
        .and_then(|(_, params)| params.as_dict().ok())
        .and_then(|params| params.get(b"Range").ok())
        .and_then(|values| values.as_array().ok());
    if let Some(values) = values {
        if values.len() == 4 {
            for (slot, value) in range.iter_mut().zip(values) {
                if let Ok(value) = value.as_float() {
                    *slot = value;
                }
            }
        }
    }
    range
}

/// L*a*b* to sRGB. XYZ is scaled to the D65 white so that L* = 100 maps to
/// white whatever the declared white point.
fn lab_to_rgb(l: f32, a: f32, b: f32) -> [u8; 3] {
    const DELTA: f32 = 6.0 / 29.0;
    let inverse = |t: f32| {
        if t > DELTA {
            t * t * t
        } else {
            3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
        }
    };
    let fy = (l + 16.0) / 116.0;
    let x = 0.9505 * inverse(fy + a / 500.0);
    let y = inverse(fy);
    let z = 1.089 * inverse(fy - b / 200.0);

    let gamma = |linear: f32| {
        let linear = linear.clamp(0.0, 1.0);
        let encoded = if linear <= 0.003_130_8 {
            12.92 * linear
        } else {
            1.055 * linear.powf(1.0 / 2.4) - 0.055
        };
        unit_to_byte(encoded)
    };
    [
        gamma(3.2406 * x - 1.5372 * y - 0.4986 * z),
        gamma(-0.9689 * x + 1.8758 * y + 0.0415 * z),
        gamma(0.0557 * x - 0.2040 * y + 1.0570 * z),
    ]
}

// -- Samples ------------------------------------------------------------------

/// Per-component `(min, max)` pairs from a `/Decode` array, or `defaults`
/// when the array is missing or malformed.
pub(crate) fn decode_ranges(decode: Option<&[Object]>, defaults: Vec<(f32, f32)>) -> Vec<(f32, f32)> {
    let Some(decode) = decode else {
        return defaults;
    };
    let values: Vec<f32> = decode.iter().filter_map(|value| value.as_float().ok()).collect();
    if values.len() != defaults.len() * 2 {
        return defaults;
    }
    values.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
}

/// Decode a raw sample buffer into an 8-bit image: gray for gray sources,
/// RGB for everything else.
///
/// Returns `None` for unsupported bit depths, oversized images and buffers
/// shorter than the declared dimensions.
pub(crate) fn decode_samples(
    model: &ColorModel,
    samples: &[u8],
    width: u32,
    height: u32,
    bits: u32,
    decode: Option<&[Object]>,
) -> Option<DynamicImage> {
    let area = pixel_count(width, height)?;
    let components = model.components();
    let raw = unpack(samples, width as usize, height as usize, components, bits)?;
    let ranges = decode_ranges(decode, model.default_decode(bits));
    let max_value = max_sample(bits);
    let value = |sample: u16, (min, max): (f32, f32)| min + f32::from(sample) / max_value * (max - min);

    match model {
        ColorModel::Gray => {
            let luma = raw.iter().map(|&sample| unit_to_byte(value(sample, ranges[0]))).collect();
            GrayImage::from_raw(width, height, luma).map(DynamicImage::ImageLuma8)
        }
        ColorModel::Indexed { hival, .. } => {
            let palette: Vec<[u8; 3]> = (0..=*hival)
                .map(|index| model.to_rgb(&[index as f32]))
                .collect();
            let mut rgb = Vec::with_capacity(area.checked_mul(3)?);
            for &sample in &raw {
                let index = value(sample, ranges[0]).round().clamp(0.0, *hival as f32) as usize;
                rgb.extend_from_slice(&palette[index]);
            }
            RgbImage::from_raw(width, height, rgb).map(DynamicImage::ImageRgb8)
        }
        _ => {
            let mut rgb = Vec::with_capacity(area.checked_mul(3)?);
            let mut values = vec![0.0f32; components];
            for pixel in raw.chunks_exact(components) {
                for ((slot, &sample), &range) in values.iter_mut().zip(pixel).zip(&ranges) {
                    *slot = value(sample, range);
                }
                rgb.extend_from_slice(&model.to_rgb(&values));
            }
            RgbImage::from_raw(width, height, rgb).map(DynamicImage::ImageRgb8)
        }
    }
}

/// Split packed rows into one integer per sample. Rows are padded to whole
/// bytes; 16-bit samples are big-endian.
fn unpack(
    samples: &[u8],
    width: usize,
    height: usize,
    components: usize,
    bits: u32,
) -> Option<Vec<u16>> {
    if !matches!(bits, 1 | 2 | 4 | 8 | 16) {
        return None;
    }
    let per_row = width.checked_mul(components)?;
    let row_bytes = per_row.checked_mul(bits as usize)?.div_ceil(8);
    if row_bytes == 0 {
        return None;
    }
    let rows = samples.get(..row_bytes.checked_mul(height)?)?;

    let mut unpacked = Vec::with_capacity(per_row.checked_mul(height)?);
    for row in rows.chunks_exact(row_bytes) {
        match bits {
            8 => unpacked.extend(row.iter().map(|&byte| u16::from(byte))),
            16 => unpacked.extend(
                row.chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]])),
            ),
            _ => {
                let bits = bits as usize;
                let mask = (1u16 << bits) - 1;
                unpacked.extend((0..per_row).map(|index| {
                    let bit = index * bits;
                    let shift = 8 - bits - bit % 8;
                    (u16::from(row[bit / 8]) >> shift) & mask
                }));
            }
        }
    }
    Some(unpacked)
}

fn max_sample(bits: u32) -> f32 {
    ((1u32 << bits) - 1) as f32
}

fn unit_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
