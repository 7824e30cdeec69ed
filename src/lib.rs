//! # slidekit
//!
//! Embed MP3 narration into PowerPoint slides and build decks from Markdown.
//!
//! ## Quick Start
//!
//! ```no_run
//! use slidekit::{embed_audio, markdown_to_pptx};
//!
//! // Add a click-to-play audio control to slide 2
//! let report = embed_audio("talk.pptx", 2, "narration.mp3")?;
//! println!("Created {}", report.output.display());
//!
//! // Turn a Marp-style markdown file into talk.pptx
//! let summary = markdown_to_pptx("talk.md", None::<&str>)?;
//! println!("{} slides", summary.slides);
//! # Ok::<(), slidekit::Error>(())
//! ```
//!
//! ## Configured embedding
//!
//! ```no_run
//! use slidekit::embed::{AudioEmbedder, EmbedOptions, IconPolicy};
//!
//! let options = EmbedOptions::new()
//!     .with_icon_policy(IconPolicy::Hidden)
//!     .with_output("talk_narrated.pptx");
//!
//! // Every `*-N.mp3` file in `audio/` goes to slide N
//! let report = AudioEmbedder::new(options).embed_batch("talk.pptx", "audio")?;
//! println!("{} files embedded", report.embedded.len());
//! # Ok::<(), slidekit::Error>(())
//! ```
//!
//! ## Features
//!
//! - `embed` (default): audio embedding into existing packages
//! - `deck` (default): Markdown to PPTX conversion

pub mod container;
pub mod error;
pub mod model;
pub mod package;
pub mod progress;

#[cfg(feature = "embed")]
pub mod embed;

#[cfg(feature = "deck")]
pub mod deck;

#[cfg(feature = "deck")]
pub mod markdown;

// Re-exports
pub use container::{OoxmlContainer, PackageInfo};
pub use error::{Error, Result};
pub use model::{BodyLine, Deck, LineKind, SlideContent};
pub use progress::{NoProgress, Progress, Step};

#[cfg(feature = "embed")]
pub use embed::{AudioEmbedder, EmbedOptions, EmbedReport, IconPlacement, IconPolicy};

#[cfg(feature = "deck")]
pub use deck::{DeckOptions, DeckSummary, DeckWriter};

use std::path::Path;

/// Embed `audio` into slide `slide` (1-indexed) with default options.
///
/// The result is written beside the input as `<name>_with_audio.pptx`.
///
/// # Example
///
/// ```no_run
/// let report = slidekit::embed_audio("deck.pptx", 1, "intro.mp3")?;
/// assert_eq!(report.embedded.len(), 1);
/// # Ok::<(), slidekit::Error>(())
/// ```
#[cfg(feature = "embed")]
pub fn embed_audio(
    package: impl AsRef<Path>,
    slide: u32,
    audio: impl AsRef<Path>,
) -> Result<EmbedReport> {
    AudioEmbedder::default().embed(package, slide, audio)
}

/// Embed every `*-N.mp3` file of `audio_dir` into slide N with default
/// options.
#[cfg(feature = "embed")]
pub fn embed_batch(package: impl AsRef<Path>, audio_dir: impl AsRef<Path>) -> Result<EmbedReport> {
    AudioEmbedder::default().embed_batch(package, audio_dir)
}

/// Summarize a presentation package.
pub fn inspect(package: impl AsRef<Path>) -> Result<PackageInfo> {
    let package = package.as_ref();
    if !package.is_file() {
        return Err(Error::MissingPackage(package.to_path_buf()));
    }
    let container = OoxmlContainer::open(package)?;
    container.ensure_presentation()?;
    container.info()
}

/// Convert a markdown file into a deck.
///
/// Without `output` the deck is written next to the input with `.md`
/// replaced by `.pptx`.
#[cfg(feature = "deck")]
pub fn markdown_to_pptx(
    input: impl AsRef<Path>,
    output: Option<impl AsRef<Path>>,
) -> Result<DeckSummary> {
    markdown_to_pptx_with_progress(input, output, &DeckOptions::default(), &mut NoProgress)
}

/// Like [`markdown_to_pptx`], with deck options and progress reporting.
#[cfg(feature = "deck")]
pub fn markdown_to_pptx_with_progress(
    input: impl AsRef<Path>,
    output: Option<impl AsRef<Path>>,
    options: &DeckOptions,
    progress: &mut dyn Progress,
) -> Result<DeckSummary> {
    let input = input.as_ref();
    let deck = markdown::MarkdownParser::open(input)?.parse();
    progress.on_step(&Step::ParsedSlides { count: deck.len() });

    let output = match output {
        Some(path) => path.as_ref().to_path_buf(),
        None => markdown::default_deck_path(input),
    };
    DeckWriter::new(options.clone()).write_with_progress(&deck, output, progress)
}
