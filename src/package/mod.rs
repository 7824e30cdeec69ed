//! Editable, unpacked view of a PPTX package.
//!
//! A package is extracted into a scoped scratch directory, its parts are
//! edited in place, and the tree is zipped into a new file. The scratch
//! directory is removed when the [`PackageDir`] is dropped, on every exit
//! path.

pub mod content_types;
pub mod media;
pub mod relationships;
pub mod slide;

pub use content_types::{mime, ContentTypes, DefaultType, OverrideType};
pub use media::{next_asset_number, parse_numbered_name, AssetKind, PlacedAsset};
pub use relationships::{rel_types, Relationship, Relationships};
pub use slide::SlideDocument;

use crate::container::{decode_xml_bytes, OoxmlContainer};
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Package-wide content type registry part.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Folder holding embedded media.
pub const MEDIA_DIR: &str = "ppt/media";

/// Folder holding slide parts.
pub const SLIDES_DIR: &str = "ppt/slides";

/// Part name of slide `number`.
pub fn slide_part(number: u32) -> String {
    format!("{}/slide{}.xml", SLIDES_DIR, number)
}

/// Relationships part name of slide `number`.
pub fn slide_rels_part(number: u32) -> String {
    format!("{}/_rels/slide{}.xml.rels", SLIDES_DIR, number)
}

/// An extracted package living in a scratch directory.
#[derive(Debug)]
pub struct PackageDir {
    scratch: TempDir,
}

impl PackageDir {
    /// Unpack the package at `path` into a fresh scratch directory.
    pub fn extract(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let container = OoxmlContainer::open(path)?;
        container.ensure_presentation()?;

        let scratch = tempfile::Builder::new().prefix("slidekit-").tempdir()?;
        container.extract_to(scratch.path())?;
        log::debug!(
            "extracted {} to {}",
            path.display(),
            scratch.path().display()
        );

        Ok(Self { scratch })
    }

    /// Root of the extracted tree.
    pub fn root(&self) -> &Path {
        self.scratch.path()
    }

    /// Filesystem path of a part given by its package-relative name.
    pub fn part_path(&self, part: &str) -> PathBuf {
        part.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root().to_path_buf(), |acc, s| acc.join(s))
    }

    /// Check whether a part exists.
    pub fn has_part(&self, part: &str) -> bool {
        self.part_path(part).is_file()
    }

    /// Read an XML part as text.
    pub fn read_xml(&self, part: &str) -> Result<String> {
        let path = self.part_path(part);
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::MissingComponent(part.to_string()),
            _ => Error::Io(e),
        })?;
        decode_xml_bytes(&bytes)
    }

    /// Write an XML part, creating parent folders as needed.
    pub fn write_xml(&self, part: &str, xml: &str) -> Result<()> {
        let path = self.part_path(part);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, xml)?;
        Ok(())
    }

    /// Folder holding embedded media.
    pub fn media_dir(&self) -> PathBuf {
        self.part_path(MEDIA_DIR)
    }

    /// Number of `slide{N}.xml` files under `ppt/slides/`.
    pub fn slide_count(&self) -> Result<usize> {
        let dir = self.part_path(SLIDES_DIR);
        if !dir.is_dir() {
            return Ok(0);
        }

        let mut count = 0;
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if parse_numbered_name(name, "slide", ".xml").is_some() {
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Fail with [`Error::SlideNotFound`] unless slide `number` exists.
    pub fn require_slide(&self, number: u32) -> Result<()> {
        if self.has_part(&slide_part(number)) {
            Ok(())
        } else {
            Err(Error::SlideNotFound {
                slide: number,
                available: self.slide_count()?,
            })
        }
    }

    /// Zip the tree into `output`.
    ///
    /// `[Content_Types].xml` is written first and the remaining files follow
    /// in sorted path order.
    pub fn repackage(&self, output: &Path) -> Result<()> {
        let mut writer = PackageWriter::create(output)?;

        let content_types = self.part_path(CONTENT_TYPES_PART);
        if content_types.is_file() {
            writer.add_file(CONTENT_TYPES_PART, &content_types)?;
        }

        for entry in WalkDir::new(self.root()).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(self.root())
                .map_err(|e| Error::InvalidData(e.to_string()))?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if name == CONTENT_TYPES_PART {
                continue;
            }
            writer.add_file(&name, entry.path())?;
        }

        writer.finish(output)
    }
}

/// Writes a ZIP package to a temporary file beside its destination and moves
/// it into place only once complete.
pub struct PackageWriter {
    temp: NamedTempFile,
    zip: ZipWriter<File>,
    options: SimpleFileOptions,
}

impl PackageWriter {
    /// Start a package that will end up at `output`.
    pub fn create(output: &Path) -> Result<Self> {
        let parent = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let temp = NamedTempFile::new_in(parent)?;
        let zip = ZipWriter::new(temp.reopen()?);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        Ok(Self { temp, zip, options })
    }

    /// Add a part from memory.
    pub fn add_part(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(data)?;
        Ok(())
    }

    /// Add a part by streaming a file from disk.
    pub fn add_file(&mut self, name: &str, path: &Path) -> Result<()> {
        self.zip.start_file(name, self.options)?;
        let mut file = File::open(path)?;
        io::copy(&mut file, &mut self.zip)?;
        Ok(())
    }

    /// Finish the archive and move it to `output`.
    pub fn finish(self, output: &Path) -> Result<()> {
        let PackageWriter { temp, zip, .. } = self;
        let mut file = zip.finish()?;
        file.flush()?;
        temp.persist(output).map_err(|e| Error::Io(e.error))?;
        log::debug!("wrote package {}", output.display());
        Ok(())
    }
}
