//! `[Content_Types].xml` registry.

use crate::error::{Error, Result};
use quick_xml::escape::escape;
use quick_xml::events::Event;

/// Namespace of the content types part.
pub const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// MIME types of the parts a presentation package holds.
pub mod mime {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const PRES_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
    pub const VIEW_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
    pub const TABLE_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const EXTENDED_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
}

/// A `<Default>` entry mapping a file extension to a MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultType {
    /// File extension without the dot
    pub extension: String,
    /// MIME type
    pub content_type: String,
}

/// An `<Override>` entry for a single part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideType {
    /// Absolute part name, e.g. `/ppt/slides/slide1.xml`
    pub part_name: String,
    /// MIME type
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Default(DefaultType),
    Override(OverrideType),
}

/// The package-wide content type registry.
///
/// Entries keep their source order so that writing the registry back only
/// changes what was explicitly added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    entries: Vec<Entry>,
}

impl ContentTypes {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `[Content_Types].xml` document.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut types = Self::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if matches!(e.local_name().as_ref(), b"Default" | b"Override") =>
                {
                    let is_default = e.local_name().as_ref() == b"Default";
                    let mut key = String::new();
                    let mut content_type = String::new();
                    for attr in e.attributes() {
                        let attr = attr?;
                        let value = attr.unescape_value()?.into_owned();
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => key = value,
                            b"ContentType" => content_type = value,
                            _ => {}
                        }
                    }

                    if key.is_empty() || content_type.is_empty() {
                        return Err(Error::InvalidData(format!(
                            "content type entry without {}",
                            if key.is_empty() { "name" } else { "ContentType" }
                        )));
                    }

                    types.entries.push(if is_default {
                        Entry::Default(DefaultType {
                            extension: key,
                            content_type,
                        })
                    } else {
                        Entry::Override(OverrideType {
                            part_name: key,
                            content_type,
                        })
                    });
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Iterate over `<Default>` entries.
    pub fn defaults(&self) -> impl Iterator<Item = &DefaultType> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Default(d) => Some(d),
            Entry::Override(_) => None,
        })
    }

    /// Iterate over `<Override>` entries.
    pub fn overrides(&self) -> impl Iterator<Item = &OverrideType> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Override(o) => Some(o),
            Entry::Default(_) => None,
        })
    }

    /// MIME type declared for an extension. Extensions compare
    /// case-insensitively.
    pub fn default_for(&self, extension: &str) -> Option<&str> {
        self.defaults()
            .find(|d| d.extension.eq_ignore_ascii_case(extension))
            .map(|d| d.content_type.as_str())
    }

    /// Declare `extension` as `content_type` unless it is already declared.
    ///
    /// Returns `true` when an entry was added.
    pub fn ensure_default(&mut self, extension: &str, content_type: &str) -> bool {
        if self.default_for(extension).is_some() {
            return false;
        }

        let entry = Entry::Default(DefaultType {
            extension: extension.to_string(),
            content_type: content_type.to_string(),
        });
        let at = self
            .entries
            .iter()
            .rposition(|e| matches!(e, Entry::Default(_)))
            .map(|i| i + 1)
            .unwrap_or(0);
        self.entries.insert(at, entry);
        true
    }

    /// Add or replace the override for `part_name`.
    pub fn set_override(&mut self, part_name: &str, content_type: &str) {
        for entry in &mut self.entries {
            if let Entry::Override(o) = entry {
                if o.part_name == part_name {
                    o.content_type = content_type.to_string();
                    return;
                }
            }
        }
        self.entries.push(Entry::Override(OverrideType {
            part_name: part_name.to_string(),
            content_type: content_type.to_string(),
        }));
    }

    /// Serialize the registry.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.entries.len() * 128);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, CONTENT_TYPES_NS));

        for entry in &self.entries {
            match entry {
                Entry::Default(d) => xml.push_str(&format!(
                    r#"<Default Extension="{}" ContentType="{}"/>"#,
                    escape(d.extension.as_str()),
                    escape(d.content_type.as_str())
                )),
                Entry::Override(o) => xml.push_str(&format!(
                    r#"<Override PartName="{}" ContentType="{}"/>"#,
                    escape(o.part_name.as_str()),
                    escape(o.content_type.as_str())
                )),
            }
        }

        xml.push_str("</Types>");
        xml
    }
}
