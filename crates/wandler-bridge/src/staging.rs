// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Byte-buffer conversions through a file-based converter, staged in a private
// temporary directory.

use std::ffi::OsStr;
use std::path::Path;

use tracing::{debug, instrument};
use wandler_core::error::{Result, WandlerError};

use crate::traits::{ConversionTarget, DocumentConverter};

/// Stage `data` as `file_name` in a fresh temporary directory, convert it, and
/// return the output bytes.
///
/// The directory and everything in it are removed when this returns, on
/// success or failure. Only the final component of `file_name` is used.
#[instrument(skip(converter, data), fields(converter = converter.name(), bytes_len = data.len()))]
pub fn convert_bytes(
    converter: &dyn DocumentConverter,
    data: &[u8],
    file_name: &str,
    target: ConversionTarget,
) -> Result<Vec<u8>> {
    if target.is_output_name(Path::new(file_name)) {
        return Err(WandlerError::InvalidArgument(format!(
            "{} is already a .{} file",
            file_name,
            target.extension()
        )));
    }
    let staging = tempfile::Builder::new().prefix("wandler-").tempdir()?;

    let safe_name = Path::new(file_name)
        .file_name()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| OsStr::new("document"));
    let input = staging.path().join(safe_name);
    std::fs::write(&input, data)?;
    debug!(input = %input.display(), "Input staged");

    let output = converter.convert(&input, target)?;
    let bytes = std::fs::read(&output)?;
    debug!(output_len = bytes.len(), "Converted output read back");
    Ok(bytes)
}
