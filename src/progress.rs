//! Progress reporting for package edits.
//!
//! The library never prints. Callers that want the step-by-step lines of a
//! run implement [`Progress`]; every method has a no-op default.

use std::fmt;
use std::path::PathBuf;

/// A completed step of an embedding or conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The package was unpacked into the scratch directory.
    Extracted { package: PathBuf },
    /// The audio file was copied into the media folder.
    CopiedAudio { file_name: String },
    /// The icon image was written into the media folder.
    CreatedIcon { file_name: String },
    /// A default content type was checked.
    ContentType { extension: String, added: bool },
    /// Relationships were appended to a slide.
    AddedRelationships { slide: u32, count: usize },
    /// The audio control was inserted into a slide's shape tree.
    InsertedShape { slide: u32, shape_id: u32 },
    /// A batch file was not matched to any slide.
    SkippedFile { file_name: String },
    /// A markdown document was split into slides.
    ParsedSlides { count: usize },
    /// The output package was written.
    Packaged { output: PathBuf },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Extracted { package } => write!(f, "Extracted {}", package.display()),
            Step::CopiedAudio { file_name } => write!(f, "Copied audio to {}", file_name),
            Step::CreatedIcon { file_name } => write!(f, "Created audio icon {}", file_name),
            Step::ContentType {
                extension,
                added: true,
            } => write!(f, "Registered {} content type", extension),
            Step::ContentType {
                extension,
                added: false,
            } => write!(f, "{} content type already registered", extension),
            Step::AddedRelationships { slide, count } => {
                write!(f, "Added {} relationships to slide {}", count, slide)
            }
            Step::InsertedShape { slide, shape_id } => {
                write!(f, "Added audio shape {} to slide {}", shape_id, slide)
            }
            Step::SkippedFile { file_name } => {
                write!(f, "Skipped {} (no slide number suffix)", file_name)
            }
            Step::ParsedSlides { count } => write!(f, "Found {} slides", count),
            Step::Packaged { output } => write!(f, "Created {}", output.display()),
        }
    }
}

/// Receiver of progress steps.
pub trait Progress {
    /// Called after each completed step.
    fn on_step(&mut self, step: &Step) {
        let _ = step;
    }
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Keeps every step, mostly useful in tests.
#[derive(Debug, Default, Clone)]
pub struct StepLog {
    pub steps: Vec<Step>,
}

impl Progress for StepLog {
    fn on_step(&mut self, step: &Step) {
        self.steps.push(step.clone());
    }
}
