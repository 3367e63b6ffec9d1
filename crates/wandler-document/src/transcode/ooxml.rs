// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared Open Packaging Conventions plumbing: XML part writer, content-type
// and relationship parts, and text sanitising.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use wandler_core::error::{Result, WandlerError};

use crate::archive::ArchiveWriter;

pub(crate) const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_PACKAGE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// A relationship entry in a `.rels` part.
pub(crate) struct Relationship<'a> {
    pub id: String,
    pub kind: &'a str,
    pub target: String,
}

impl<'a> Relationship<'a> {
    pub(crate) fn new(id: impl Into<String>, kind: &'a str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            target: target.into(),
        }
    }
}

/// Streaming writer for one XML part.
pub(crate) struct XmlPart {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlPart {
    /// Start a part with a standalone UTF-8 declaration.
    pub(crate) fn new() -> Result<Self> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_err)?;
        Ok(Self { writer })
    }

    pub(crate) fn open(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        self.writer
            .write_event(Event::Start(element(name, attributes)))
            .map_err(xml_err)?;
        Ok(())
    }

    pub(crate) fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        self.writer
            .write_event(Event::Empty(element(name, attributes)))
            .map_err(xml_err)?;
        Ok(())
    }

    pub(crate) fn close(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_err)?;
        Ok(())
    }

    /// `<name attrs>text</name>`, with the text escaped and sanitised.
    pub(crate) fn text(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> Result<()> {
        self.open(name, attributes)?;
        let clean = sanitize(text);
        if !clean.is_empty() {
            self.writer
                .write_event(Event::Text(BytesText::new(&clean)))
                .map_err(xml_err)?;
        }
        self.close(name)
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.writer.into_inner().into_inner()
    }
}

fn xml_err(err: impl std::fmt::Display) -> WandlerError {
    WandlerError::Package(format!("XML write failed: {}", err))
}

fn element<'a>(name: &'a str, attributes: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for attribute in attributes {
        start.push_attribute(*attribute);
    }
    start
}

/// Drop characters XML 1.0 cannot carry (C0 controls other than tab, line
/// feed and carriage return, and the U+FFFE/U+FFFF non-characters).
pub(crate) fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|ch| match *ch {
            '\t' | '\n' | '\r' => true,
            '\u{FFFE}' | '\u{FFFF}' => false,
            ch => ch >= '\u{20}',
        })
        .collect()
}

/// `[Content_Types].xml` with the `rels` and `xml` defaults plus one
/// override per `(part name, content type)`.
pub(crate) fn content_types(overrides: &[(String, &str)]) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    part.empty(
        "Default",
        &[
            ("Extension", "rels"),
            (
                "ContentType",
                "application/vnd.openxmlformats-package.relationships+xml",
            ),
        ],
    )?;
    part.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    for (part_name, content_type) in overrides {
        part.empty(
            "Override",
            &[("PartName", part_name.as_str()), ("ContentType", *content_type)],
        )?;
    }
    part.close("Types")?;
    Ok(part.finish())
}

/// A `.rels` part.
pub(crate) fn relationships(entries: &[Relationship<'_>]) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open("Relationships", &[("xmlns", NS_PACKAGE_RELATIONSHIPS)])?;
    for entry in entries {
        part.empty(
            "Relationship",
            &[
                ("Id", entry.id.as_str()),
                ("Type", entry.kind),
                ("Target", entry.target.as_str()),
            ],
        )?;
    }
    part.close("Relationships")?;
    Ok(part.finish())
}

/// Collects package parts, then zips them with `[Content_Types].xml` first.
pub(crate) struct Package {
    overrides: Vec<(String, &'static str)>,
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    pub(crate) fn new() -> Self {
        Self {
            overrides: Vec::new(),
            parts: Vec::new(),
        }
    }

    /// Add a part with an explicit content type override.
    pub(crate) fn add(&mut self, name: impl Into<String>, content_type: &'static str, data: Vec<u8>) {
        let name = name.into();
        self.overrides.push((format!("/{}", name), content_type));
        self.parts.push((name, data));
    }

    /// Add a part covered by a default content type (`.rels`, plain xml).
    pub(crate) fn add_plain(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.parts.push((name.into(), data));
    }

    pub(crate) fn finish(self) -> Result<Vec<u8>> {
        let mut archive = ArchiveWriter::new();
        archive.add("[Content_Types].xml", &content_types(&self.overrides)?)?;
        for (name, data) in &self.parts {
            archive.add(name, data)?;
        }
        archive.finish()
    }
}
