// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: page access, structural page copying, embedded images, and
// image-to-PDF generation.

pub(crate) mod copy;
pub(crate) mod samples;
pub mod images;
pub mod source;
pub mod writer;

pub use images::{EmbeddedImage, ImageFormatTag, ImageRef};
pub use source::{DocumentInfo, PageInfo, PageSource};
pub use writer::PdfWriter;
