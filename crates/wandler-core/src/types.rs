// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Wandler document converter.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WandlerError};

/// Document formats the converter reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Docx,
    /// Legacy binary Word format (only via the office bridge).
    Doc,
    Pptx,
    Xlsx,
    /// Legacy binary Excel format (only via the office bridge).
    Xls,
    Jpeg,
    Png,
    Zip,
}

impl DocumentType {
    /// Canonical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Doc => "doc",
            Self::Pptx => "pptx",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Zip => "zip",
        }
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            "pptx" => Some(Self::Pptx),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }

    /// Guess the type from the leading magic bytes.
    ///
    /// OOXML packages are all ZIP containers, so they sniff as `Zip`.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"%PDF-") {
            Some(Self::Pdf)
        } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if data.starts_with(b"PK\x03\x04") {
            Some(Self::Zip)
        } else {
            None
        }
    }

    /// Whether the format is a raster image accepted by image→PDF.
    pub fn is_raster(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }

    /// Whether the format is an office document the bridge converts to PDF.
    pub fn is_office(&self) -> bool {
        matches!(
            self,
            Self::Doc | Self::Docx | Self::Pptx | Self::Xlsx | Self::Xls
        )
    }
}

/// Compression profile: a fixed level → JPEG quality lookup.
///
/// Higher level means smaller output and lower image fidelity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionProfile {
    Light,
    Medium,
    #[default]
    Balanced,
    Strong,
    Maximum,
}

impl CompressionProfile {
    /// All profiles ordered by level.
    pub const ALL: [Self; 5] = [
        Self::Light,
        Self::Medium,
        Self::Balanced,
        Self::Strong,
        Self::Maximum,
    ];

    /// Map a 1–5 level to its profile.
    pub fn from_level(level: u8) -> Result<Self> {
        match level {
            1 => Ok(Self::Light),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Balanced),
            4 => Ok(Self::Strong),
            5 => Ok(Self::Maximum),
            other => Err(WandlerError::InvalidArgument(format!(
                "compression level must be 1-5, got {other}"
            ))),
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Self::Light => 1,
            Self::Medium => 2,
            Self::Balanced => 3,
            Self::Strong => 4,
            Self::Maximum => 5,
        }
    }

    /// JPEG re-encode quality percentage.
    pub fn quality(&self) -> u8 {
        match self {
            Self::Light => 95,
            Self::Medium => 85,
            Self::Balanced => 75,
            Self::Strong => 65,
            Self::Maximum => 50,
        }
    }
}

/// Page canvas used when synthesising PDFs from images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    Letter,
    A4,
    Custom { width_pt: f32, height_pt: f32 },
}

impl PageSize {
    /// Dimensions in PostScript points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::Letter => (612.0, 792.0),
            Self::A4 => (595.28, 841.89),
            Self::Custom {
                width_pt,
                height_pt,
            } => (*width_pt, *height_pt),
        }
    }
}

/// How a PDF should be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitRequest {
    /// Every page becomes its own document, bundled into a ZIP archive.
    EveryPage,
    /// Pages `start..=end` (1-based, inclusive) become one document.
    Range { start: usize, end: usize },
}

impl SplitRequest {
    /// Validate a 1-based inclusive range against a page count and return the
    /// equivalent 0-based inclusive bounds.
    pub fn zero_based_range(start: usize, end: usize, page_count: usize) -> Result<(usize, usize)> {
        if start > end || start == 0 || end > page_count {
            return Err(WandlerError::PageRange {
                start,
                end,
                page_count,
            });
        }
        Ok((start - 1, end - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_table_is_fixed() {
        let qualities: Vec<u8> = CompressionProfile::ALL.iter().map(|p| p.quality()).collect();
        assert_eq!(qualities, vec![95, 85, 75, 65, 50]);
    }

    #[test]
    fn compression_level_roundtrips() {
        for profile in CompressionProfile::ALL {
            assert_eq!(CompressionProfile::from_level(profile.level()).unwrap(), profile);
        }
    }

    #[test]
    fn compression_level_out_of_range_is_rejected() {
        assert!(CompressionProfile::from_level(0).is_err());
        assert!(CompressionProfile::from_level(6).is_err());
    }

    #[test]
    fn range_is_converted_to_zero_based() {
        assert_eq!(SplitRequest::zero_based_range(2, 4, 5).unwrap(), (1, 3));
        assert_eq!(SplitRequest::zero_based_range(1, 1, 1).unwrap(), (0, 0));
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        assert!(SplitRequest::zero_based_range(3, 2, 5).is_err());
        assert!(SplitRequest::zero_based_range(0, 2, 5).is_err());
        assert!(SplitRequest::zero_based_range(1, 6, 5).is_err());
    }

    #[test]
    fn sniff_recognises_magic_numbers() {
        assert_eq!(DocumentType::sniff(b"%PDF-1.7\n"), Some(DocumentType::Pdf));
        assert_eq!(
            DocumentType::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(DocumentType::Jpeg)
        );
        assert_eq!(DocumentType::sniff(b"PK\x03\x04rest"), Some(DocumentType::Zip));
        assert_eq!(DocumentType::sniff(b"hello"), None);
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(DocumentType::from_extension("JPEG"), Some(DocumentType::Jpeg));
        assert_eq!(DocumentType::from_extension("Docx"), Some(DocumentType::Docx));
        assert_eq!(DocumentType::from_extension("exe"), None);
    }

    #[test]
    fn office_and_raster_kinds_are_disjoint() {
        assert!(DocumentType::Docx.is_office());
        assert!(DocumentType::Xls.is_office());
        assert!(!DocumentType::Pdf.is_office());
        assert!(DocumentType::Png.is_raster());
        assert!(!DocumentType::Zip.is_raster());
    }

    #[test]
    fn letter_is_612_by_792() {
        assert_eq!(PageSize::Letter.dimensions_pt(), (612.0, 792.0));
    }
}
