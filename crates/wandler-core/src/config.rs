// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Converter configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::{CompressionProfile, PageSize};

/// Environment variable naming the office-suite executable.
pub const OFFICE_BIN_ENV: &str = "WANDLER_OFFICE_BIN";

/// Tunable defaults for conversions. Nothing here is cached between requests;
/// each operation reads the values it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Compression profile used when the caller does not pick one.
    pub default_compression: CompressionProfile,
    /// Linear magnification applied when rasterising a page (2.0 = 4x area).
    pub raster_scale: f32,
    /// JPEG quality of rasterised pages.
    pub raster_quality: u8,
    /// Canvas for image→PDF pages.
    pub image_page_size: PageSize,
    /// Margin in points subtracted from each page edge pair when fitting
    /// images (the image is placed at half of it from the origin).
    pub image_page_margin_pt: f32,
    /// Explicit office-suite executable; when unset the platform default
    /// (`soffice` on Windows, `libreoffice` elsewhere) is used.
    pub office_binary: Option<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            default_compression: CompressionProfile::Balanced,
            raster_scale: 2.0,
            raster_quality: 95,
            image_page_size: PageSize::Letter,
            image_page_margin_pt: 100.0,
            office_binary: None,
        }
    }
}

impl ConverterConfig {
    /// Load a JSON config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        info!(path = %path.display(), "loaded converter config");
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(bin) = std::env::var_os(OFFICE_BIN_ENV) {
            if !bin.is_empty() {
                self.office_binary = Some(PathBuf::from(bin));
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConverterConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config.raster_scale, 2.0);
        assert_eq!(config.default_compression, CompressionProfile::Balanced);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wandler.json");
        std::fs::write(&path, r#"{ "raster_scale": 3.0 }"#).unwrap();

        let config = ConverterConfig::load(&path).unwrap();
        assert_eq!(config.raster_scale, 3.0);
        assert_eq!(config.raster_quality, 95);
        assert_eq!(config.image_page_size, PageSize::Letter);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wandler.json");
        let config = ConverterConfig {
            default_compression: CompressionProfile::Maximum,
            office_binary: Some(PathBuf::from("/opt/lo/soffice")),
            ..ConverterConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = ConverterConfig::load(&path).unwrap();
        assert_eq!(loaded.default_compression, CompressionProfile::Maximum);
        assert_eq!(loaded.office_binary, Some(PathBuf::from("/opt/lo/soffice")));
    }

    #[test]
    fn malformed_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wandler.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ConverterConfig::load(&path),
            Err(crate::WandlerError::Serialization(_))
        ));
    }
}
