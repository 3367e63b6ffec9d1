// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// wandler-document: In-memory document engine for the Wandler converter.
//
// Provides page-level PDF access (text, images, rasterisation, page ranges),
// whole-document composition (merge, split, compress), and transcoding to and
// from Word, PowerPoint, Excel and raster images. Every operation takes byte
// buffers or parsed documents and returns new buffers; nothing is cached.

pub mod archive;
pub mod compose;
pub mod image;
pub mod pdf;
pub mod raster;
pub mod transcode;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
pub(crate) mod testing;

// Re-export the primary structs so callers can use `wandler_document::PageSource` etc.
pub use compose::{CompressionReport, DocumentComposer, SplitOutput};
pub use self::image::{ImageProcessor, ImageRecompressor, RecompressedImage};
pub use pdf::{DocumentInfo, EmbeddedImage, ImageFormatTag, ImageRef, PageInfo, PageSource, PdfWriter};
pub use raster::{PageRasterizer, UnavailableRasterizer, default_rasterizer};
pub use transcode::FormatTranscoder;

#[cfg(feature = "mupdf")]
pub use raster::MupdfRasterizer;
