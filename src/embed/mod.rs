//! Audio embedding into existing presentations.
//!
//! An embed stores the MP3 under `ppt/media/`, registers its content type,
//! links it from the slide through an audio relationship and a media
//! relationship, and (unless hidden) adds a speaker icon shape bound to both.

pub mod batch;
pub mod embedder;
pub mod markup;
pub mod options;

pub use batch::{match_audio_files, slide_suffix, AudioMatch, AudioMatches};
pub use embedder::{AudioEmbedder, EmbedReport, SlideEmbedding};
pub use options::{default_output_path, EmbedOptions, IconPlacement, IconPolicy};
