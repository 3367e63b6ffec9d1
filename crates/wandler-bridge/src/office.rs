// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Headless LibreOffice converter.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, instrument, warn};
use wandler_core::ConverterConfig;
use wandler_core::error::{Result, WandlerError};

use crate::traits::{ConversionTarget, DocumentConverter};

/// Runs `<binary> --headless --convert-to <filter> <input> --outdir <dir>`.
///
/// The process is spawned directly, without a shell, and waited on with no
/// timeout.
#[derive(Debug, Clone)]
pub struct OfficeConverter {
    binary: PathBuf,
}

impl OfficeConverter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// `soffice` on Windows, `libreoffice` elsewhere.
    pub fn default_binary() -> &'static str {
        if cfg!(windows) { "soffice" } else { "libreoffice" }
    }

    /// Binary from `config.office_binary`, else the platform default.
    pub fn from_config(config: &ConverterConfig) -> Self {
        match &config.office_binary {
            Some(binary) => Self::new(binary),
            None => Self::new(Self::default_binary()),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Command-line arguments for one conversion.
    pub fn arguments(&self, input: &Path, target: ConversionTarget, outdir: &Path) -> Vec<OsString> {
        vec![
            "--headless".into(),
            "--convert-to".into(),
            target.filter().into(),
            input.as_os_str().to_owned(),
            "--outdir".into(),
            outdir.as_os_str().to_owned(),
        ]
    }
}

impl Default for OfficeConverter {
    fn default() -> Self {
        Self::new(Self::default_binary())
    }
}

impl DocumentConverter for OfficeConverter {
    fn name(&self) -> &str {
        "libreoffice"
    }

    #[instrument(skip(self), fields(binary = %self.binary.display()))]
    fn convert(&self, input: &Path, target: ConversionTarget) -> Result<PathBuf> {
        if target.is_output_name(input) {
            return Err(WandlerError::InvalidArgument(format!(
                "{} is already a .{} file",
                input.display(),
                target.extension()
            )));
        }
        let outdir = match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let stem = input.file_stem().ok_or_else(|| {
            WandlerError::InvalidArgument(format!("input path {} has no file name", input.display()))
        })?;
        let mut output_name = stem.to_os_string();
        output_name.push(".");
        output_name.push(target.extension());
        let expected = outdir.join(output_name);

        info!(input = %input.display(), filter = target.filter(), "Starting office conversion");
        let output = Command::new(&self.binary)
            .args(self.arguments(input, target, &outdir))
            .output()
            .map_err(|err| {
                WandlerError::ExternalTool(format!(
                    "failed to launch {}: {}",
                    self.binary.display(),
                    err
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "Office conversion failed");
            return Err(WandlerError::ExternalTool(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        if !expected.is_file() {
            return Err(WandlerError::ExternalTool(format!(
                "{} produced no output at {}",
                self.binary.display(),
                expected.display()
            )));
        }

        debug!(output = %expected.display(), "Office conversion finished");
        Ok(expected)
    }
}
