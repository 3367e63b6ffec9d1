// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PresentationML package writer. Produces a 4:3 deck with one slide master,
// a "Title Slide" and a "Blank" layout, and a default theme.

use wandler_core::error::Result;

use super::ooxml::{
    NS_RELATIONSHIPS, Package, REL_OFFICE_DOCUMENT, Relationship, XmlPart, relationships,
};

const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const PRESENTATION_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const SLIDE_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const MASTER_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const LAYOUT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const THEME_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

/// English Metric Units per inch.
pub(crate) const EMU_PER_INCH: i64 = 914_400;

/// 10in x 7.5in slide.
const SLIDE_WIDTH_EMU: i64 = 10 * EMU_PER_INCH;
const SLIDE_HEIGHT_EMU: i64 = 7 * EMU_PER_INCH + EMU_PER_INCH / 2;

/// Slide ids must start at 256.
const FIRST_SLIDE_ID: usize = 256;

/// Position and size of a shape, in EMU.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Frame {
    pub(crate) fn from_inches(x: f64, y: f64, width: f64, height: f64) -> Self {
        let emu = |inches: f64| (inches * EMU_PER_INCH as f64).round() as i64;
        Self {
            x: emu(x),
            y: emu(y),
            width: emu(width),
            height: emu(height),
        }
    }
}

/// Slide content supported by this writer.
pub(crate) enum Slide {
    /// Uses the "Title Slide" layout.
    Title { title: String, subtitle: String },
    /// Uses the "Blank" layout with one free text box; each line becomes a
    /// paragraph.
    TextBox { frame: Frame, text: String },
}

/// Build a `.pptx` containing `slides` in order.
pub(crate) fn build_pptx(slides: &[Slide]) -> Result<Vec<u8>> {
    let mut package = Package::new();
    package.add_plain(
        "_rels/.rels",
        relationships(&[Relationship::new(
            "rId1",
            REL_OFFICE_DOCUMENT,
            "ppt/presentation.xml",
        )])?,
    );

    package.add(
        "ppt/presentation.xml",
        PRESENTATION_CONTENT_TYPE,
        presentation_part(slides.len())?,
    );
    let mut presentation_rels = vec![
        Relationship::new("rId1", REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
        Relationship::new("rId2", REL_THEME, "theme/theme1.xml"),
    ];
    for number in 1..=slides.len() {
        presentation_rels.push(Relationship::new(
            slide_rel_id(number),
            REL_SLIDE,
            format!("slides/slide{}.xml", number),
        ));
    }
    package.add_plain(
        "ppt/_rels/presentation.xml.rels",
        relationships(&presentation_rels)?,
    );

    package.add(
        "ppt/slideMasters/slideMaster1.xml",
        MASTER_CONTENT_TYPE,
        SLIDE_MASTER_XML.as_bytes().to_vec(),
    );
    package.add_plain(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        relationships(&[
            Relationship::new("rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
            Relationship::new("rId2", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout2.xml"),
            Relationship::new("rId3", REL_THEME, "../theme/theme1.xml"),
        ])?,
    );

    for (number, layout) in [(1, TITLE_LAYOUT_XML), (2, BLANK_LAYOUT_XML)] {
        package.add(
            format!("ppt/slideLayouts/slideLayout{}.xml", number),
            LAYOUT_CONTENT_TYPE,
            layout.as_bytes().to_vec(),
        );
        package.add_plain(
            format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", number),
            relationships(&[Relationship::new(
                "rId1",
                REL_SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml",
            )])?,
        );
    }

    package.add(
        "ppt/theme/theme1.xml",
        THEME_CONTENT_TYPE,
        THEME_XML.as_bytes().to_vec(),
    );

    for (index, slide) in slides.iter().enumerate() {
        let number = index + 1;
        let layout = match slide {
            Slide::Title { .. } => "../slideLayouts/slideLayout1.xml",
            Slide::TextBox { .. } => "../slideLayouts/slideLayout2.xml",
        };
        package.add(
            format!("ppt/slides/slide{}.xml", number),
            SLIDE_CONTENT_TYPE,
            slide_part(slide)?,
        );
        package.add_plain(
            format!("ppt/slides/_rels/slide{}.xml.rels", number),
            relationships(&[Relationship::new("rId1", REL_SLIDE_LAYOUT, layout)])?,
        );
    }

    package.finish()
}

fn slide_rel_id(number: usize) -> String {
    // rId1 and rId2 are the master and theme.
    format!("rId{}", number + 2)
}

fn presentation_part(slide_count: usize) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open(
        "p:presentation",
        &[
            ("xmlns:a", NS_DRAWING),
            ("xmlns:r", NS_RELATIONSHIPS),
            ("xmlns:p", NS_PRESENTATION),
            ("saveSubsetFonts", "1"),
        ],
    )?;

    part.open("p:sldMasterIdLst", &[])?;
    part.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    part.close("p:sldMasterIdLst")?;

    if slide_count > 0 {
        part.open("p:sldIdLst", &[])?;
        for number in 1..=slide_count {
            let id = (FIRST_SLIDE_ID + number - 1).to_string();
            let rel_id = slide_rel_id(number);
            part.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel_id.as_str())])?;
        }
        part.close("p:sldIdLst")?;
    }

    let width = SLIDE_WIDTH_EMU.to_string();
    let height = SLIDE_HEIGHT_EMU.to_string();
    part.empty(
        "p:sldSz",
        &[
            ("cx", width.as_str()),
            ("cy", height.as_str()),
            ("type", "screen4x3"),
        ],
    )?;
    part.empty(
        "p:notesSz",
        &[("cx", height.as_str()), ("cy", width.as_str())],
    )?;
    part.close("p:presentation")?;
    Ok(part.finish())
}

fn slide_part(slide: &Slide) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open(
        "p:sld",
        &[
            ("xmlns:a", NS_DRAWING),
            ("xmlns:r", NS_RELATIONSHIPS),
            ("xmlns:p", NS_PRESENTATION),
        ],
    )?;
    part.open("p:cSld", &[])?;
    part.open("p:spTree", &[])?;
    group_header(&mut part)?;

    match slide {
        Slide::Title { title, subtitle } => {
            placeholder(&mut part, 2, "Title 1", &[("type", "ctrTitle")], title)?;
            placeholder(
                &mut part,
                3,
                "Subtitle 2",
                &[("type", "subTitle"), ("idx", "1")],
                subtitle,
            )?;
        }
        Slide::TextBox { frame, text } => text_box(&mut part, *frame, text)?,
    }

    part.close("p:spTree")?;
    part.close("p:cSld")?;
    part.open("p:clrMapOvr", &[])?;
    part.empty("a:masterClrMapping", &[])?;
    part.close("p:clrMapOvr")?;
    part.close("p:sld")?;
    Ok(part.finish())
}

fn group_header(part: &mut XmlPart) -> Result<()> {
    part.open("p:nvGrpSpPr", &[])?;
    part.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    part.empty("p:cNvGrpSpPr", &[])?;
    part.empty("p:nvPr", &[])?;
    part.close("p:nvGrpSpPr")?;
    part.empty("p:grpSpPr", &[])
}

fn placeholder(
    part: &mut XmlPart,
    shape_id: u32,
    name: &str,
    placeholder_attrs: &[(&str, &str)],
    text: &str,
) -> Result<()> {
    let id = shape_id.to_string();
    part.open("p:sp", &[])?;
    part.open("p:nvSpPr", &[])?;
    part.empty("p:cNvPr", &[("id", id.as_str()), ("name", name)])?;
    part.open("p:cNvSpPr", &[])?;
    part.empty("a:spLocks", &[("noGrp", "1")])?;
    part.close("p:cNvSpPr")?;
    part.open("p:nvPr", &[])?;
    part.empty("p:ph", placeholder_attrs)?;
    part.close("p:nvPr")?;
    part.close("p:nvSpPr")?;
    part.empty("p:spPr", &[])?;
    text_body(part, &[], text)?;
    part.close("p:sp")
}

fn text_box(part: &mut XmlPart, frame: Frame, text: &str) -> Result<()> {
    let (x, y) = (frame.x.to_string(), frame.y.to_string());
    let (cx, cy) = (frame.width.to_string(), frame.height.to_string());

    part.open("p:sp", &[])?;
    part.open("p:nvSpPr", &[])?;
    part.empty("p:cNvPr", &[("id", "2"), ("name", "TextBox 1")])?;
    part.empty("p:cNvSpPr", &[("txBox", "1")])?;
    part.empty("p:nvPr", &[])?;
    part.close("p:nvSpPr")?;

    part.open("p:spPr", &[])?;
    part.open("a:xfrm", &[])?;
    part.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    part.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    part.close("a:xfrm")?;
    part.open("a:prstGeom", &[("prst", "rect")])?;
    part.empty("a:avLst", &[])?;
    part.close("a:prstGeom")?;
    part.empty("a:noFill", &[])?;
    part.close("p:spPr")?;

    text_body(part, &[("wrap", "none")], text)?;
    part.close("p:sp")
}

/// `<p:txBody>` with one `<a:p>` per line of `text`.
fn text_body(part: &mut XmlPart, body_attrs: &[(&str, &str)], text: &str) -> Result<()> {
    part.open("p:txBody", &[])?;
    if body_attrs.is_empty() {
        part.empty("a:bodyPr", &[])?;
    } else {
        part.open("a:bodyPr", body_attrs)?;
        part.empty("a:spAutoFit", &[])?;
        part.close("a:bodyPr")?;
    }
    part.empty("a:lstStyle", &[])?;
    for line in text.split('\n') {
        part.open("a:p", &[])?;
        if !line.is_empty() {
            part.open("a:r", &[])?;
            part.empty("a:rPr", &[("lang", "en-US"), ("dirty", "0")])?;
            part.text("a:t", &[], line)?;
            part.close("a:r")?;
        }
        part.close("a:p")?;
    }
    part.close("p:txBody")
}

const SLIDE_MASTER_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
    r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>"#,
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
    r#"</p:spTree></p:cSld>"#,
    r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
    r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" "#,
    r#"folHlink="folHlink"/>"#,
    r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/>"#,
    r#"<p:sldLayoutId id="2147483650" r:id="rId2"/></p:sldLayoutIdLst>"#,
    r#"<p:txStyles><p:titleStyle><a:lvl1pPr algn="ctr"><a:defRPr sz="4400"/></a:lvl1pPr></p:titleStyle>"#,
    r#"<p:bodyStyle><a:lvl1pPr><a:defRPr sz="3200"/></a:lvl1pPr></p:bodyStyle>"#,
    r#"<p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle></p:txStyles>"#,
    r#"</p:sldMaster>"#,
);

const TITLE_LAYOUT_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="title" preserve="1">"#,
    r#"<p:cSld name="Title Slide"><p:spTree>"#,
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
    r#"<p:nvPr><p:ph type="ctrTitle"/></p:nvPr></p:nvSpPr>"#,
    r#"<p:spPr><a:xfrm><a:off x="685800" y="2130425"/><a:ext cx="7772400" cy="1470025"/></a:xfrm></p:spPr>"#,
    r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Subtitle 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
    r#"<p:nvPr><p:ph type="subTitle" idx="1"/></p:nvPr></p:nvSpPr>"#,
    r#"<p:spPr><a:xfrm><a:off x="1371600" y="3886200"/><a:ext cx="6400800" cy="1752600"/></a:xfrm></p:spPr>"#,
    r#"<p:txBody><a:bodyPr/><a:lstStyle><a:lvl1pPr marL="0" indent="0" algn="ctr"><a:buNone/></a:lvl1pPr>"#,
    r#"</a:lstStyle><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
);

const BLANK_LAYOUT_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1">"#,
    r#"<p:cSld name="Blank"><p:spTree>"#,
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
    r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
);

const THEME_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme">"#,
    r#"<a:themeElements><a:clrScheme name="Office">"#,
    r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#,
    r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#,
    r#"<a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2>"#,
    r#"<a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2>"#,
    r#"<a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4>"#,
    r#"<a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6>"#,
    r#"<a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink>"#,
    r#"</a:clrScheme><a:fontScheme name="Office">"#,
    r#"<a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
    r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
    r#"</a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"</a:fillStyleLst><a:lnStyleLst>"#,
    r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"</a:lnStyleLst><a:effectStyleLst>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"</a:effectStyleLst><a:bgFillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"</a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{element_texts, zip_entry, zip_entry_names};

    fn sample_deck() -> Vec<u8> {
        build_pptx(&[
            Slide::Title {
                title: "PDF Conversion".to_string(),
                subtitle: "Converted from report.pdf".to_string(),
            },
            Slide::TextBox {
                frame: Frame::from_inches(0.5, 1.0, 9.0, 6.0),
                text: "line one\nline two".to_string(),
            },
        ])
        .unwrap()
    }

    #[test]
    fn frame_converts_inches_to_emu() {
        let frame = Frame::from_inches(0.5, 1.0, 9.0, 6.0);
        assert_eq!(
            (frame.x, frame.y, frame.width, frame.height),
            (457_200, 914_400, 8_229_600, 5_486_400)
        );
    }

    #[test]
    fn deck_contains_every_slide_part() {
        let names = zip_entry_names(&sample_deck());
        for expected in [
            "ppt/presentation.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slideLayouts/slideLayout2.xml",
            "ppt/theme/theme1.xml",
        ] {
            assert!(names.iter().any(|name| name == expected), "missing {expected}");
        }
    }

    #[test]
    fn title_slide_carries_title_and_subtitle() {
        let slide = zip_entry(&sample_deck(), "ppt/slides/slide1.xml");
        assert_eq!(
            element_texts(&slide, "a:p"),
            vec!["PDF Conversion", "Converted from report.pdf"]
        );
    }

    #[test]
    fn text_box_has_one_paragraph_per_line() {
        let slide = zip_entry(&sample_deck(), "ppt/slides/slide2.xml");
        assert_eq!(element_texts(&slide, "a:p"), vec!["line one", "line two"]);
        let xml = String::from_utf8(slide).unwrap();
        assert!(xml.contains(r#"<a:off x="457200" y="914400"/>"#));
    }

    #[test]
    fn presentation_lists_slide_ids_from_256() {
        let presentation = String::from_utf8(zip_entry(&sample_deck(), "ppt/presentation.xml")).unwrap();
        assert!(presentation.contains(r#"<p:sldId id="256" r:id="rId3"/>"#));
        assert!(presentation.contains(r#"<p:sldId id="257" r:id="rId4"/>"#));
    }
}
