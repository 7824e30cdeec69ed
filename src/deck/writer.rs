//! PresentationML package writer.

use super::template;
use crate::error::Result;
use crate::model::{BodyLine, Deck, LineKind, SlideContent, TITLE_FONT_SIZE};
use crate::package::{
    mime, rel_types, slide_part, slide_rels_part, ContentTypes, PackageWriter, Relationships,
    CONTENT_TYPES_PART,
};
use crate::progress::{NoProgress, Progress, Step};
use quick_xml::escape::escape;
use serde::Serialize;
use std::path::{Path, PathBuf};

const NS_DECL: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const MASTER_PART: &str = "ppt/slideMasters/slideMaster1.xml";
const LAYOUT_PART: &str = "ppt/slideLayouts/slideLayout1.xml";
const THEME_PART: &str = "ppt/theme/theme1.xml";

/// First `p:sldId/@id`; lower values are reserved.
const FIRST_SLIDE_ID: u32 = 256;

/// Options for writing a deck.
#[derive(Debug, Clone)]
pub struct DeckOptions {
    /// Slide width in EMU
    pub slide_width: i64,

    /// Slide height in EMU
    pub slide_height: i64,

    /// Document title; defaults to the first slide title
    pub title: Option<String>,

    /// Author written to the core properties
    pub author: Option<String>,
}

impl Default for DeckOptions {
    /// 10in x 7.5in (4:3).
    fn default() -> Self {
        Self {
            slide_width: 9_144_000,
            slide_height: 6_858_000,
            title: None,
            author: None,
        }
    }
}

impl DeckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slide size in EMU.
    pub fn with_slide_size(mut self, width: i64, height: i64) -> Self {
        self.slide_width = width;
        self.slide_height = height;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// What a deck write produced.
#[derive(Debug, Clone, Serialize)]
pub struct DeckSummary {
    pub output: PathBuf,
    pub slides: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Writes a [`Deck`] as a new `.pptx` package.
#[derive(Debug, Clone, Default)]
pub struct DeckWriter {
    options: DeckOptions,
}

impl DeckWriter {
    pub fn new(options: DeckOptions) -> Self {
        Self { options }
    }

    /// Write `deck` to `output`.
    pub fn write(&self, deck: &Deck, output: impl AsRef<Path>) -> Result<DeckSummary> {
        self.write_with_progress(deck, output, &mut NoProgress)
    }

    /// Like [`write`](Self::write), reporting the final step to `progress`.
    pub fn write_with_progress(
        &self,
        deck: &Deck,
        output: impl AsRef<Path>,
        progress: &mut dyn Progress,
    ) -> Result<DeckSummary> {
        let output = output.as_ref();
        let title = self
            .options
            .title
            .clone()
            .or_else(|| deck.title().map(String::from));

        let mut writer = PackageWriter::create(output)?;
        writer.add_part(CONTENT_TYPES_PART, content_types(deck.len()).to_xml().as_bytes())?;
        writer.add_part("_rels/.rels", package_rels()?.to_xml().as_bytes())?;
        writer.add_part(
            "docProps/core.xml",
            core_props_xml(title.as_deref(), self.options.author.as_deref()).as_bytes(),
        )?;
        writer.add_part("docProps/app.xml", app_props_xml(deck.len()).as_bytes())?;

        let (pres_rels, slide_rel_ids) = presentation_rels(deck.len())?;
        writer.add_part(
            "ppt/presentation.xml",
            self.presentation_xml(&slide_rel_ids).as_bytes(),
        )?;
        writer.add_part("ppt/_rels/presentation.xml.rels", pres_rels.to_xml().as_bytes())?;
        writer.add_part("ppt/presProps.xml", template::pres_props_xml().as_bytes())?;
        writer.add_part("ppt/viewProps.xml", template::view_props_xml().as_bytes())?;
        writer.add_part("ppt/tableStyles.xml", template::table_styles_xml().as_bytes())?;
        writer.add_part(THEME_PART, template::theme_xml().as_bytes())?;

        writer.add_part(MASTER_PART, template::slide_master_xml().as_bytes())?;
        let mut master_rels = Relationships::new();
        master_rels.add(rel_types::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml")?;
        master_rels.add(rel_types::THEME, "../theme/theme1.xml")?;
        writer.add_part(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            master_rels.to_xml().as_bytes(),
        )?;

        writer.add_part(LAYOUT_PART, template::slide_layout_xml().as_bytes())?;
        let mut layout_rels = Relationships::new();
        layout_rels.add(rel_types::SLIDE_MASTER, "../slideMasters/slideMaster1.xml")?;
        writer.add_part(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            layout_rels.to_xml().as_bytes(),
        )?;

        for (index, slide) in deck.slides.iter().enumerate() {
            let number = index as u32 + 1;
            let mut rels = Relationships::new();
            rels.add(rel_types::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml")?;
            writer.add_part(&slide_part(number), slide_xml(slide).as_bytes())?;
            writer.add_part(&slide_rels_part(number), rels.to_xml().as_bytes())?;
        }

        writer.finish(output)?;
        log::debug!("wrote {} slides to {}", deck.len(), output.display());
        progress.on_step(&Step::Packaged {
            output: output.to_path_buf(),
        });

        Ok(DeckSummary {
            output: output.to_path_buf(),
            slides: deck.len(),
            title,
        })
    }

    fn presentation_xml(&self, slide_rel_ids: &[String]) -> String {
        let mut xml = String::with_capacity(1024 + slide_rel_ids.len() * 48);
        xml.push_str(XML_DECL);
        xml.push_str(&format!(r#"<p:presentation {} saveSubsetFonts="1">"#, NS_DECL));
        xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

        if !slide_rel_ids.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (offset, rel_id) in slide_rel_ids.iter().enumerate() {
                xml.push_str(&format!(
                    r#"<p:sldId id="{}" r:id="{}"/>"#,
                    FIRST_SLIDE_ID + offset as u32,
                    rel_id
                ));
            }
            xml.push_str("</p:sldIdLst>");
        }

        xml.push_str(&format!(
            r#"<p:sldSz cx="{}" cy="{}"/>"#,
            self.options.slide_width, self.options.slide_height
        ));
        xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str("</p:presentation>");
        xml
    }
}

fn content_types(slides: usize) -> ContentTypes {
    let mut types = ContentTypes::new();
    types.ensure_default("rels", mime::RELATIONSHIPS);
    types.ensure_default("xml", mime::XML);
    types.set_override("/ppt/presentation.xml", mime::PRESENTATION);
    types.set_override(&format!("/{}", MASTER_PART), mime::SLIDE_MASTER);
    types.set_override(&format!("/{}", LAYOUT_PART), mime::SLIDE_LAYOUT);
    for number in 1..=slides as u32 {
        types.set_override(&format!("/{}", slide_part(number)), mime::SLIDE);
    }
    types.set_override(&format!("/{}", THEME_PART), mime::THEME);
    types.set_override("/ppt/presProps.xml", mime::PRES_PROPS);
    types.set_override("/ppt/viewProps.xml", mime::VIEW_PROPS);
    types.set_override("/ppt/tableStyles.xml", mime::TABLE_STYLES);
    types.set_override("/docProps/core.xml", mime::CORE_PROPERTIES);
    types.set_override("/docProps/app.xml", mime::EXTENDED_PROPERTIES);
    types
}

fn package_rels() -> Result<Relationships> {
    let mut rels = Relationships::new();
    rels.add(rel_types::OFFICE_DOCUMENT, "ppt/presentation.xml")?;
    rels.add(rel_types::CORE_PROPERTIES, "docProps/core.xml")?;
    rels.add(rel_types::EXTENDED_PROPERTIES, "docProps/app.xml")?;
    Ok(rels)
}

/// Presentation relationships and the ids of the slide edges, in order.
fn presentation_rels(slides: usize) -> Result<(Relationships, Vec<String>)> {
    let mut rels = Relationships::new();
    rels.add(rel_types::SLIDE_MASTER, "slideMasters/slideMaster1.xml")?;
    let slide_ids = (1..=slides as u32)
        .map(|n| rels.add(rel_types::SLIDE, &format!("slides/slide{}.xml", n)))
        .collect::<Result<Vec<_>>>()?;
    rels.add(rel_types::PRES_PROPS, "presProps.xml")?;
    rels.add(rel_types::VIEW_PROPS, "viewProps.xml")?;
    rels.add(rel_types::THEME, "theme/theme1.xml")?;
    rels.add(rel_types::TABLE_STYLES, "tableStyles.xml")?;
    Ok((rels, slide_ids))
}

fn core_props_xml(title: Option<&str>, author: Option<&str>) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);
    if let Some(title) = title {
        xml.push_str(&format!("<dc:title>{}</dc:title>", escape(title)));
    }
    if let Some(author) = author {
        xml.push_str(&format!("<dc:creator>{}</dc:creator>", escape(author)));
    }
    xml.push_str("</cp:coreProperties>");
    xml
}

fn app_props_xml(slides: usize) -> String {
    format!(
        r#"{}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>slidekit</Application><Slides>{}</Slides></Properties>"#,
        XML_DECL, slides
    )
}

/// Markup of one title-and-content slide.
fn slide_xml(slide: &SlideContent) -> String {
    let mut xml = String::with_capacity(1024 + slide.body.len() * 160);
    xml.push_str(XML_DECL);
    xml.push_str(&format!("<p:sld {}>", NS_DECL));
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

    // Title placeholder
    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="2" name="Title 1"/>"#);
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    xml.push_str(r#"<p:nvPr><p:ph type="title"/></p:nvPr>"#);
    xml.push_str("</p:nvSpPr><p:spPr/>");
    xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
    match slide.title.as_deref() {
        Some(title) if !title.is_empty() => {
            xml.push_str("<a:p>");
            push_run(&mut xml, title, TITLE_FONT_SIZE, true);
            xml.push_str("</a:p>");
        }
        _ => xml.push_str(r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#),
    }
    xml.push_str("</p:txBody></p:sp>");

    // Body placeholder
    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="3" name="Content Placeholder 2"/>"#);
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    xml.push_str(r#"<p:nvPr><p:ph idx="1"/></p:nvPr>"#);
    xml.push_str("</p:nvSpPr><p:spPr/>");
    xml.push_str("<p:txBody><a:bodyPr><a:normAutofit/></a:bodyPr><a:lstStyle/>");
    if slide.body.is_empty() {
        xml.push_str(r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#);
    }
    for line in &slide.body {
        push_paragraph(&mut xml, line);
    }
    xml.push_str("</p:txBody></p:sp>");

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

fn push_paragraph(xml: &mut String, line: &BodyLine) {
    xml.push_str("<a:p>");
    match line.kind {
        LineKind::Bullet { level: 0 } => {}
        LineKind::Bullet { level } => xml.push_str(&format!(r#"<a:pPr lvl="{}"/>"#, level)),
        LineKind::Numbered => xml.push_str(
            r#"<a:pPr marL="457200" indent="-457200"><a:buFont typeface="+mj-lt"/><a:buAutoNum type="arabicPeriod"/></a:pPr>"#,
        ),
        LineKind::Bold | LineKind::Plain => {
            xml.push_str(r#"<a:pPr marL="0" indent="0"><a:buNone/></a:pPr>"#)
        }
    }
    push_run(xml, &line.text, line.kind.font_size(), line.kind.is_bold());
    xml.push_str("</a:p>");
}

/// Append a run; `size` is in points.
fn push_run(xml: &mut String, text: &str, size: u32, bold: bool) {
    xml.push_str(&format!(r#"<a:r><a:rPr lang="en-US" sz="{}""#, size * 100));
    if bold {
        xml.push_str(r#" b="1""#);
    }
    xml.push_str(r#" dirty="0"/>"#);
    xml.push_str(&format!("<a:t>{}</a:t></a:r>", escape(text)));
}
