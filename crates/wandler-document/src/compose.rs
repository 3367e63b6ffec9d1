// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document composer: merge, split and compress PDFs. Pages move between
// documents structurally; nothing is re-rendered.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, instrument};
use wandler_core::error::{Result, WandlerError};
use wandler_core::{CompressionProfile, OutputName, SplitRequest};

use crate::archive::ArchiveWriter;
use crate::image::ImageRecompressor;
use crate::pdf::PageSource;
use crate::pdf::copy::{PageCopier, empty_document};

/// Outcome of [`DocumentComposer::compress`].
#[derive(Debug, Clone, Serialize)]
pub struct CompressionReport {
    /// The compressed PDF.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub original_size: usize,
    pub compressed_size: usize,
    /// Distinct image objects that were re-encoded.
    pub images_recompressed: usize,
}

impl CompressionReport {
    /// Size reduction in percent; negative when the output grew.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (self.original_size as f64 - self.compressed_size as f64) / self.original_size as f64
            * 100.0
    }

    /// One-line human summary with sizes in KB.
    pub fn summary(&self) -> String {
        format!(
            "Size reduced from {:.2} KB to {:.2} KB ({:.1}% reduction)",
            self.original_size as f64 / 1024.0,
            self.compressed_size as f64 / 1024.0,
            self.reduction_percent()
        )
    }
}

/// Output of a split: a single PDF or a ZIP of single-page PDFs.
#[derive(Debug, Clone)]
pub enum SplitOutput {
    Archive(Vec<u8>),
    Document(Vec<u8>),
}

impl SplitOutput {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Archive(bytes) | Self::Document(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Archive(bytes) | Self::Document(bytes) => bytes,
        }
    }
}

/// Whole-document operations over [`PageSource`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentComposer {
    recompressor: ImageRecompressor,
}

impl DocumentComposer {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Merge ----------------------------------------------------------------

    /// Concatenate the pages of `sources`, in order, into a new document.
    ///
    /// A single source yields a copy of it.
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub fn merge(&self, sources: &[PageSource]) -> Result<PageSource> {
        if sources.is_empty() {
            return Err(WandlerError::EmptyInput {
                required: 1,
                actual: 0,
            });
        }

        let (mut target, pages_id) = empty_document();
        for source in sources {
            PageCopier::new(source.document(), &mut target, pages_id)
                .copy_pages(source.page_ids())?;
        }

        let merged = PageSource::from_document(target);
        info!(pages = merged.page_count(), "PDFs merged");
        Ok(merged)
    }

    /// Parse and merge raw PDF buffers. At least two are required.
    pub fn merge_pdfs<B: AsRef<[u8]>>(&self, buffers: &[B]) -> Result<Vec<u8>> {
        if buffers.len() < 2 {
            return Err(WandlerError::EmptyInput {
                required: 2,
                actual: buffers.len(),
            });
        }
        let sources = buffers
            .iter()
            .map(|buffer| PageSource::open(buffer.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.merge(&sources)?.into_bytes()
    }

    // -- Split ----------------------------------------------------------------

    /// Dispatch a [`SplitRequest`].
    pub fn split(&self, source: &PageSource, request: SplitRequest) -> Result<SplitOutput> {
        match request {
            SplitRequest::EveryPage => self.split_every_page(source).map(SplitOutput::Archive),
            SplitRequest::Range { start, end } => self
                .split_range(source, start, end)?
                .into_bytes()
                .map(SplitOutput::Document),
        }
    }

    /// One single-page PDF per page, zipped as `page_1.pdf` … `page_N.pdf`.
    #[instrument(skip_all, fields(pages = source.page_count()))]
    pub fn split_every_page(&self, source: &PageSource) -> Result<Vec<u8>> {
        let mut archive = ArchiveWriter::new();
        for index in 0..source.page_count() {
            let page = source.extract_range(index, index)?.into_bytes()?;
            archive.add(&OutputName::split_entry(index + 1), &page)?;
        }
        debug!(entries = archive.len(), "Split archive assembled");
        archive.finish()
    }

    /// Pages `start..=end`, 1-based, as a new document.
    pub fn split_range(&self, source: &PageSource, start: usize, end: usize) -> Result<PageSource> {
        let (first, last) = SplitRequest::zero_based_range(start, end, source.page_count())?;
        source.extract_range(first, last)
    }

    // -- Compress -------------------------------------------------------------

    /// Re-encode every embedded image at the profile's JPEG quality, then
    /// prune unreachable objects, renumber, and deflate streams.
    ///
    /// Page count and order are preserved. An image that cannot be decoded
    /// aborts the whole operation.
    #[instrument(skip(self, source), fields(pages = source.page_count(), quality = profile.quality()))]
    pub fn compress(
        &self,
        mut source: PageSource,
        profile: CompressionProfile,
        original_size: usize,
    ) -> Result<CompressionReport> {
        let quality = profile.quality();
        let mut seen = BTreeSet::new();

        for page_index in 0..source.page_count() {
            for image in source.extract_images(page_index)? {
                // Shared images are re-encoded once.
                if !seen.insert(image.reference) {
                    continue;
                }
                let replacement = self.recompressor.recompress(&image, quality)?;
                self.recompressor
                    .substitute(&mut source, image.reference, replacement)?;
            }
        }

        let document = source.document_mut();
        let pruned = document.prune_objects();
        document.renumber_objects();
        document.compress();

        let bytes = source.into_bytes()?;
        let report = CompressionReport {
            original_size,
            compressed_size: bytes.len(),
            images_recompressed: seen.len(),
            bytes,
        };
        info!(
            images = report.images_recompressed,
            pruned = pruned.len(),
            original_size,
            compressed_size = report.compressed_size,
            "PDF compressed"
        );
        Ok(report)
    }

    /// Parse and compress a raw PDF buffer.
    pub fn compress_pdf(&self, data: &[u8], profile: CompressionProfile) -> Result<CompressionReport> {
        let source = PageSource::open(data)?;
        self.compress(source, profile, data.len())
    }
}
