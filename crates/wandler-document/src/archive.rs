// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory ZIP archives, used for split output and as the container of
// every OOXML package.

use std::io::{Cursor, Write};

use wandler_core::error::{Result, WandlerError};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Deflate-compressed ZIP archive written into a memory buffer.
pub struct ArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: usize,
}

impl ArchiveWriter {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated),
            entries: 0,
        }
    }

    /// Append one entry. Names are kept verbatim, in insertion order.
    pub fn add(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.zip
            .start_file(name, self.options)
            .map_err(|err| package_err(name, err))?;
        self.zip.write_all(data)?;
        self.entries += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Write the central directory and return the archive bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self
            .zip
            .finish()
            .map_err(|err| WandlerError::Package(format!("failed to finish archive: {}", err)))?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn package_err(name: &str, err: zip::result::ZipError) -> WandlerError {
    WandlerError::Package(format!("failed to add {} to archive: {}", name, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{zip_entry, zip_entry_names};

    #[test]
    fn entries_keep_insertion_order() {
        let mut archive = ArchiveWriter::new();
        archive.add("b.txt", b"second").unwrap();
        archive.add("a.txt", b"first").unwrap();
        assert_eq!(archive.len(), 2);

        let bytes = archive.finish().unwrap();
        assert_eq!(zip_entry_names(&bytes), vec!["b.txt", "a.txt"]);
        assert_eq!(zip_entry(&bytes, "a.txt"), b"first");
    }

    #[test]
    fn empty_archive_is_still_valid() {
        let bytes = ArchiveWriter::new().finish().unwrap();
        assert!(zip_entry_names(&bytes).is_empty());
    }
}
