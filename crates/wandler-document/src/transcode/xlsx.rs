// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SpreadsheetML package writer: one sheet, one text column.

use wandler_core::error::Result;

use super::ooxml::{
    NS_RELATIONSHIPS, Package, REL_OFFICE_DOCUMENT, Relationship, XmlPart, relationships,
};

const NS_SPREADSHEET: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const WORKBOOK_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const WORKSHEET_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const STYLES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

pub(crate) const SHEET_NAME: &str = "Sheet1";

const STYLES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>"#,
    r#"<fills count="2"><fill><patternFill patternType="none"/></fill>"#,
    r#"<fill><patternFill patternType="gray125"/></fill></fills>"#,
    r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
    r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
    r#"<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>"#,
    r#"</styleSheet>"#,
);

/// Build an `.xlsx` whose first sheet holds `header` in A1 and one value per
/// following row, as inline strings.
pub(crate) fn build_xlsx(header: &str, rows: &[String]) -> Result<Vec<u8>> {
    let mut package = Package::new();
    package.add_plain(
        "_rels/.rels",
        relationships(&[Relationship::new(
            "rId1",
            REL_OFFICE_DOCUMENT,
            "xl/workbook.xml",
        )])?,
    );
    package.add("xl/workbook.xml", WORKBOOK_CONTENT_TYPE, workbook_part()?);
    package.add_plain(
        "xl/_rels/workbook.xml.rels",
        relationships(&[
            Relationship::new("rId1", REL_WORKSHEET, "worksheets/sheet1.xml"),
            Relationship::new("rId2", REL_STYLES, "styles.xml"),
        ])?,
    );
    package.add(
        "xl/worksheets/sheet1.xml",
        WORKSHEET_CONTENT_TYPE,
        worksheet_part(header, rows)?,
    );
    package.add("xl/styles.xml", STYLES_CONTENT_TYPE, STYLES_XML.as_bytes().to_vec());
    package.finish()
}

fn workbook_part() -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open(
        "workbook",
        &[("xmlns", NS_SPREADSHEET), ("xmlns:r", NS_RELATIONSHIPS)],
    )?;
    part.open("sheets", &[])?;
    part.empty(
        "sheet",
        &[("name", SHEET_NAME), ("sheetId", "1"), ("r:id", "rId1")],
    )?;
    part.close("sheets")?;
    part.close("workbook")?;
    Ok(part.finish())
}

fn worksheet_part(header: &str, rows: &[String]) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open("worksheet", &[("xmlns", NS_SPREADSHEET)])?;
    part.open("sheetData", &[])?;

    let values = std::iter::once(header).chain(rows.iter().map(String::as_str));
    for (index, value) in values.enumerate() {
        let row_number = (index + 1).to_string();
        let cell_ref = format!("A{}", row_number);
        part.open("row", &[("r", row_number.as_str())])?;
        part.open("c", &[("r", cell_ref.as_str()), ("t", "inlineStr")])?;
        part.open("is", &[])?;
        part.text("t", &[("xml:space", "preserve")], value)?;
        part.close("is")?;
        part.close("c")?;
        part.close("row")?;
    }

    part.close("sheetData")?;
    part.close("worksheet")?;
    Ok(part.finish())
}
