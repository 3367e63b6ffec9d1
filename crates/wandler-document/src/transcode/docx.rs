// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WordprocessingML package writer.

use wandler_core::error::Result;

use super::ooxml::{Package, REL_OFFICE_DOCUMENT, Relationship, XmlPart, relationships};

const NS_WORDPROCESSING: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// US Letter in twentieths of a point, with one-inch margins.
const PAGE_WIDTH_TWIPS: &str = "12240";
const PAGE_HEIGHT_TWIPS: &str = "15840";
const MARGIN_TWIPS: &str = "1440";

/// Build a `.docx` with one paragraph per entry. Newlines inside an entry
/// become soft line breaks.
pub(crate) fn build_docx(paragraphs: &[String]) -> Result<Vec<u8>> {
    let mut package = Package::new();
    package.add_plain(
        "_rels/.rels",
        relationships(&[Relationship::new(
            "rId1",
            REL_OFFICE_DOCUMENT,
            "word/document.xml",
        )])?,
    );
    package.add("word/document.xml", DOCUMENT_CONTENT_TYPE, document_part(paragraphs)?);
    package.finish()
}

fn document_part(paragraphs: &[String]) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open("w:document", &[("xmlns:w", NS_WORDPROCESSING)])?;
    part.open("w:body", &[])?;

    for paragraph in paragraphs {
        part.open("w:p", &[])?;
        part.open("w:r", &[])?;
        for (index, line) in paragraph.split('\n').enumerate() {
            if index > 0 {
                part.empty("w:br", &[])?;
            }
            part.text("w:t", &[("xml:space", "preserve")], line)?;
        }
        part.close("w:r")?;
        part.close("w:p")?;
    }

    part.open("w:sectPr", &[])?;
    part.empty(
        "w:pgSz",
        &[("w:w", PAGE_WIDTH_TWIPS), ("w:h", PAGE_HEIGHT_TWIPS)],
    )?;
    part.empty(
        "w:pgMar",
        &[
            ("w:top", MARGIN_TWIPS),
            ("w:right", MARGIN_TWIPS),
            ("w:bottom", MARGIN_TWIPS),
            ("w:left", MARGIN_TWIPS),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    part.close("w:sectPr")?;

    part.close("w:body")?;
    part.close("w:document")?;
    Ok(part.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{element_texts, zip_entry};

    #[test]
    fn paragraphs_and_soft_breaks() {
        let docx = build_docx(&["first".to_string(), "two\nlines".to_string()]).unwrap();
        let document = zip_entry(&docx, "word/document.xml");
        assert_eq!(
            element_texts(&document, "w:p"),
            vec!["first".to_string(), "two\nlines".to_string()]
        );
    }

    #[test]
    fn empty_document_has_a_body() {
        let docx = build_docx(&[]).unwrap();
        let document = String::from_utf8(zip_entry(&docx, "word/document.xml")).unwrap();
        assert!(document.contains("<w:body>"));
        assert!(element_texts(document.as_bytes(), "w:p").is_empty());
    }
}
