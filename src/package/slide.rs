//! Slide part markup.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};

/// A slide part held as text, with the shape ids it currently uses.
///
/// Edits are applied by streaming the document through a writer, so markup
/// outside the inserted nodes is carried over byte for byte.
#[derive(Debug, Clone)]
pub struct SlideDocument {
    part: String,
    xml: String,
    shape_ids: Vec<u32>,
}

/// Collect `cNvPr/@id` values, checking that a shape tree exists.
fn scan_shape_ids(part: &str, xml: &str) -> Result<Vec<u32>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut ids = Vec::new();
    let mut has_tree = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"spTree" => has_tree = true,
                b"cNvPr" => {
                    for attr in e.attributes() {
                        let attr = attr?;
                        if attr.key.as_ref() != b"id" {
                            continue;
                        }
                        let value = attr.unescape_value()?;
                        match value.trim().parse::<u32>() {
                            Ok(id) => ids.push(id),
                            Err(_) => log::debug!("{}: ignoring shape id {:?}", part, value),
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(format!("{}: {}", part, e))),
            _ => {}
        }
        buf.clear();
    }

    if !has_tree {
        return Err(Error::MissingComponent(format!("shape tree in {}", part)));
    }
    Ok(ids)
}

impl SlideDocument {
    /// Parse the slide stored at `part`.
    pub fn parse(part: &str, xml: String) -> Result<Self> {
        let shape_ids = scan_shape_ids(part, &xml)?;
        Ok(Self {
            part: part.to_string(),
            xml,
            shape_ids,
        })
    }

    /// Part name the slide was read from.
    pub fn part(&self) -> &str {
        &self.part
    }

    pub fn as_str(&self) -> &str {
        &self.xml
    }

    /// Highest numeric shape id, if any.
    pub fn max_shape_id(&self) -> Option<u32> {
        self.shape_ids.iter().copied().max()
    }

    /// One past the highest shape id, or 2 when the slide has none
    /// (id 1 belongs to the root group shape).
    pub fn next_shape_id(&self) -> Result<u32> {
        match self.max_shape_id() {
            None => Ok(2),
            Some(max) => max.checked_add(1).map(|id| id.max(2)).ok_or_else(|| {
                Error::InvalidData(format!("{}: shape id {} cannot be followed", self.part, max))
            }),
        }
    }

    /// Append `fragment` as the last child of the shape tree.
    ///
    /// The fragment must be a well-formed element; it is written verbatim.
    pub fn append_to_shape_tree(&mut self, fragment: &str) -> Result<()> {
        let mut reader = Reader::from_str(&self.xml);
        let mut writer = Writer::new(Vec::with_capacity(self.xml.len() + fragment.len()));
        let mut buf = Vec::new();
        let mut inserted = false;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| Error::XmlParse(format!("{}: {}", self.part, e)))?;
            match event {
                Event::End(e) if !inserted && e.local_name().as_ref() == b"spTree" => {
                    writer.get_mut().extend_from_slice(fragment.as_bytes());
                    writer.write_event(Event::End(e))?;
                    inserted = true;
                }
                Event::Empty(e) if !inserted && e.local_name().as_ref() == b"spTree" => {
                    let end = e.to_end().into_owned();
                    writer.write_event(Event::Start(e))?;
                    writer.get_mut().extend_from_slice(fragment.as_bytes());
                    writer.write_event(Event::End(end))?;
                    inserted = true;
                }
                Event::Eof => break,
                other => writer.write_event(other)?,
            }
            buf.clear();
        }

        if !inserted {
            return Err(Error::MissingComponent(format!(
                "shape tree in {}",
                self.part
            )));
        }

        let xml = String::from_utf8(writer.into_inner())
            .map_err(|e| Error::InvalidData(format!("{}: {}", self.part, e)))?;
        self.shape_ids = scan_shape_ids(&self.part, &xml)?;
        self.xml = xml;
        Ok(())
    }
}
