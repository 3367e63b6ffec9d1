// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// wandler-bridge: conversions delegated to an external office suite.
//
// Word and Excel inputs are turned into PDF by a headless LibreOffice process.
// The process sits behind the `DocumentConverter` trait so callers and tests
// never depend on it being installed.

pub mod office;
pub mod staging;
pub mod traits;

pub use office::OfficeConverter;
pub use staging::convert_bytes;
pub use traits::{ConversionTarget, DocumentConverter};

use wandler_core::ConverterConfig;

/// The converter configured for this process: the office binary from
/// `config` (or the platform default) wrapped as a `DocumentConverter`.
pub fn office_converter(config: &ConverterConfig) -> Box<dyn DocumentConverter> {
    Box::new(OfficeConverter::from_config(config))
}
