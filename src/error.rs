//! Error types for the slidekit library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for slidekit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, editing or writing a package.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input package does not exist.
    #[error("Package not found: {}", .0.display())]
    MissingPackage(PathBuf),

    /// The audio file to embed does not exist.
    #[error("Audio file not found: {}", .0.display())]
    MissingAudioFile(PathBuf),

    /// Slide numbers are 1-indexed.
    #[error("Invalid slide number {0}: slide numbers start at 1")]
    InvalidSlideNumber(u32),

    /// The requested slide is not part of the package.
    #[error("Slide {slide} does not exist (package has {available} slides)")]
    SlideNotFound {
        /// Requested 1-indexed slide number
        slide: u32,
        /// Number of slide parts found in the package
        available: usize,
    },

    /// An existing relationships part could not be parsed.
    #[error("Malformed relationship file {path}: {reason}")]
    MalformedRelationshipFile {
        /// Part path inside the package
        path: String,
        /// Parser message
        reason: String,
    },

    /// The markdown input does not exist.
    #[error("Markdown file not found: {}", .0.display())]
    MissingMarkdown(PathBuf),

    /// A batch directory held no audio files with a slide suffix.
    #[error("No numbered audio files found in {}", .0.display())]
    NoAudioFiles(PathBuf),

    /// The output path resolves to the input package.
    #[error("Output would overwrite the input package: {}", .0.display())]
    OutputIsInput(PathBuf),

    /// The archive is a ZIP file but not a presentation.
    #[error("Not a PowerPoint presentation")]
    NotAPresentation,

    /// Error reading or writing a ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the package.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Io(err.into())
    }
}
