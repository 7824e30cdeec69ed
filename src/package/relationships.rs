//! Part relationship graphs (`_rels/*.rels`).

use crate::error::{Error, Result};
use quick_xml::escape::escape;
use quick_xml::events::Event;

/// Namespace of relationships parts.
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Relationship type URIs used by slidekit.
pub mod rel_types {
    /// Audio referenced by `a:audioFile/@r:link`.
    pub const AUDIO: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/audio";
    /// PowerPoint 2010+ media referenced by `p14:media/@r:embed`.
    pub const MEDIA: &str = "http://schemas.microsoft.com/office/2007/relationships/media";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const PRES_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
    pub const VIEW_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
    pub const TABLE_STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
}

/// A relationship entry from a .rels file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, relative to the source part unless external
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Ordered relationship set of one part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

fn check_root(e: &quick_xml::events::BytesStart<'_>) -> Result<()> {
    if e.local_name().as_ref() == b"Relationships" {
        Ok(())
    } else {
        Err(Error::XmlParse(format!(
            "unexpected root element <{}>",
            String::from_utf8_lossy(e.name().as_ref())
        )))
    }
}

/// Numeric part of an `rId{N}` token.
fn rid_number(id: &str) -> Option<u32> {
    let digits = id.strip_prefix("rId")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a relationships part.
    ///
    /// Unlike a lenient reader, this rejects anything that is not a
    /// well-formed `<Relationships>` document, since the part is written
    /// back after editing.
    pub fn parse(xml: &str) -> Result<Self> {
        if xml.trim().is_empty() {
            return Ok(Self::new());
        }

        let mut rels = Self::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut saw_root = false;
        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| Error::XmlParse(e.to_string()))?;
            match event {
                Event::Start(e) => {
                    if depth == 0 {
                        check_root(&e)?;
                        saw_root = true;
                    } else if e.local_name().as_ref() == b"Relationship" {
                        rels.push(Self::read_entry(&e)?)?;
                    }
                    depth += 1;
                }
                Event::Empty(e) => {
                    if depth == 0 {
                        check_root(&e)?;
                        saw_root = true;
                    } else if e.local_name().as_ref() == b"Relationship" {
                        rels.push(Self::read_entry(&e)?)?;
                    }
                }
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(Error::XmlParse("missing <Relationships> root".to_string()));
        }
        if depth != 0 {
            return Err(Error::XmlParse("unexpected end of document".to_string()));
        }
        Ok(rels)
    }

    fn read_entry(e: &quick_xml::events::BytesStart<'_>) -> Result<Relationship> {
        let mut rel = Relationship {
            id: String::new(),
            rel_type: String::new(),
            target: String::new(),
            external: false,
        };

        for attr in e.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?.into_owned();
            match attr.key.as_ref() {
                b"Id" => rel.id = value,
                b"Type" => rel.rel_type = value,
                b"Target" => rel.target = value,
                b"TargetMode" => rel.external = value.eq_ignore_ascii_case("external"),
                _ => {}
            }
        }

        if rel.id.is_empty() {
            return Err(Error::XmlParse("relationship without Id".to_string()));
        }
        Ok(rel)
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.id == id)
    }

    /// Get relationships by type, in source order.
    pub fn get_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.rels.iter().filter(|r| r.rel_type == rel_type).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Next free `rId{N}`: one past the highest numeric id present.
    ///
    /// Fails when the highest id is already `u32::MAX`.
    pub fn next_id(&self) -> Result<String> {
        let max = self
            .rels
            .iter()
            .filter_map(|r| {
                let n = rid_number(&r.id);
                if n.is_none() {
                    log::debug!("ignoring non-numeric relationship id {:?}", r.id);
                }
                n
            })
            .max()
            .unwrap_or(0);
        let next = max
            .checked_add(1)
            .ok_or_else(|| Error::InvalidData(format!("relationship id rId{} cannot be followed", max)))?;
        Ok(format!("rId{}", next))
    }

    /// Append an internal relationship under a freshly allocated id.
    pub fn add(&mut self, rel_type: &str, target: &str) -> Result<String> {
        let id = self.next_id()?;
        self.rels.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            external: false,
        });
        Ok(id)
    }

    /// Append a relationship with an explicit id.
    pub fn push(&mut self, rel: Relationship) -> Result<()> {
        if self.get(&rel.id).is_some() {
            return Err(Error::InvalidData(format!(
                "duplicate relationship id {}",
                rel.id
            )));
        }
        self.rels.push(rel);
        Ok(())
    }

    /// Serialize to a relationships part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELATIONSHIPS_NS));

        for rel in &self.rels {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}""#,
                escape(rel.id.as_str()),
                escape(rel.rel_type.as_str()),
                escape(rel.target.as_str())
            ));
            if rel.external {
                xml.push_str(r#" TargetMode="External""#);
            }
            xml.push_str("/>");
        }

        xml.push_str("</Relationships>");
        xml
    }
}
