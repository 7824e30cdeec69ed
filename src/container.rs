//! Read-only ZIP container view of an OOXML package.

use crate::error::{Error, Result};
use crate::package::content_types::{mime, ContentTypes};
use crate::package::media::parse_numbered_name;
use crate::package::{CONTENT_TYPES_PART, MEDIA_DIR, SLIDES_DIR};
use serde::Serialize;
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// Summary of a presentation package, as printed by `slidekit info`.
#[derive(Debug, Clone, Serialize)]
pub struct PackageInfo {
    /// Number of `ppt/slides/slide{N}.xml` parts
    pub slide_count: usize,
    /// Media file names under `ppt/media/`
    pub media: Vec<String>,
    /// Default content types as (extension, MIME type)
    pub default_types: Vec<(String, String)>,
}

/// Rewrite an `encoding="UTF-16"` declaration once the text has been decoded.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if let Some(rest) = content.strip_prefix("<?xml") {
        if let Some(end) = rest.find("?>") {
            let decl = rest[..end]
                .replace("\"UTF-16\"", "\"UTF-8\"")
                .replace("'UTF-16'", "'UTF-8'")
                .replace("\"utf-16\"", "\"UTF-8\"")
                .replace("'utf-16'", "'UTF-8'");
            return format!("<?xml{}{}", decl, &rest[end..]);
        }
    }
    content.to_string()
}

/// Decode XML part bytes to a string.
///
/// Parts are normally UTF-8, but packages written by older tools may carry a
/// BOM or be UTF-16 encoded throughout.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    let invalid = |e: std::string::FromUtf8Error| {
        Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    };

    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec()).map_err(invalid),
        [0xFF, 0xFE, rest @ ..] => Ok(fix_xml_encoding_declaration(&decode_utf16(
            rest,
            u16::from_le_bytes,
        )?)),
        [0xFE, 0xFF, rest @ ..] => Ok(fix_xml_encoding_declaration(&decode_utf16(
            rest,
            u16::from_be_bytes,
        )?)),
        _ => match String::from_utf8(bytes.to_vec()) {
            Ok(s) => Ok(s),
            Err(_) if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 => {
                decode_utf16(bytes, u16::from_le_bytes)
            }
            Err(_) if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 => {
                decode_utf16(bytes, u16::from_be_bytes)
            }
            Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        },
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// OOXML container abstraction over a ZIP archive.
///
/// Used to inspect a package and to unpack it into a scratch directory
/// before editing.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Open an OOXML container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use slidekit::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("deck.pptx")?;
    /// println!("{} slides", container.slide_count());
    /// # Ok::<(), slidekit::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingPackage(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Create an OOXML container from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Read an XML part as a string, decoding UTF-16 parts if needed.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a binary part.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.borrow().file_names().any(|n| n == path)
    }

    /// List all entries in the archive.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }

    /// List entries under a prefix.
    pub fn list_files_with_prefix(&self, prefix: &str) -> Vec<String> {
        let archive = self.archive.borrow();
        archive
            .file_names()
            .filter(|n| n.starts_with(prefix))
            .map(String::from)
            .collect()
    }

    /// Number of `slide{N}.xml` parts directly under `ppt/slides/`.
    pub fn slide_count(&self) -> usize {
        let prefix = format!("{}/", SLIDES_DIR);
        self.list_files_with_prefix(&prefix)
            .iter()
            .filter_map(|name| name.strip_prefix(&prefix))
            .filter(|name| parse_numbered_name(name, "slide", ".xml").is_some())
            .count()
    }

    /// File names stored under `ppt/media/`, sorted.
    pub fn media_files(&self) -> Vec<String> {
        let prefix = format!("{}/", MEDIA_DIR);
        let mut names: Vec<String> = self
            .list_files_with_prefix(&prefix)
            .iter()
            .filter_map(|name| name.strip_prefix(&prefix))
            .filter(|name| !name.is_empty() && !name.contains('/'))
            .map(String::from)
            .collect();
        names.sort();
        names
    }

    /// Fail with [`Error::NotAPresentation`] unless the archive holds a
    /// PresentationML main part.
    pub fn ensure_presentation(&self) -> Result<()> {
        let declared = self
            .read_xml(CONTENT_TYPES_PART)
            .map(|xml| xml.contains(mime::PRESENTATION))
            .unwrap_or(false);

        if declared || self.exists("ppt/presentation.xml") {
            Ok(())
        } else {
            Err(Error::NotAPresentation)
        }
    }

    /// Unpack every entry into `dir`.
    pub fn extract_to(&self, dir: &Path) -> Result<()> {
        self.archive.borrow_mut().extract(dir)?;
        Ok(())
    }

    /// Collect a [`PackageInfo`] summary.
    pub fn info(&self) -> Result<PackageInfo> {
        let content_types = ContentTypes::parse(&self.read_xml(CONTENT_TYPES_PART)?)?;
        Ok(PackageInfo {
            slide_count: self.slide_count(),
            media: self.media_files(),
            default_types: content_types
                .defaults()
                .map(|d| (d.extension.clone(), d.content_type.clone()))
                .collect(),
        })
    }

    /// Resolve a relationship target against the part that owns it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let mut segments: Vec<&str> = base.split('/').collect();
        segments.pop();
        for segment in relative.split('/') {
            match segment {
                ".." => {
                    segments.pop();
                }
                "." | "" => {}
                other => segments.push(other),
            }
        }
        segments.join("/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .finish()
    }
}
