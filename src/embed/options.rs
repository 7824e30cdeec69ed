//! Embedding options configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Bundled 32x32 speaker icon used as the on-slide control.
pub const DEFAULT_ICON_PNG: &[u8] = include_bytes!("../../assets/audio-icon.png");

/// Whether the audio gets a visible control on the slide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconPolicy {
    /// Insert a clickable speaker icon bound to the audio
    #[default]
    Visible,
    /// Only store the media and its relationships; the slide markup is
    /// left untouched
    Hidden,
}

/// Position and size of the audio control, in EMU (914400 per inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconPlacement {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Default for IconPlacement {
    /// A 1/3 inch square near the middle of a 10in x 7.5in slide.
    fn default() -> Self {
        Self {
            x: 4_419_600,
            y: 3_276_600,
            cx: 304_800,
            cy: 304_800,
        }
    }
}

/// Options for embedding audio into a package.
#[derive(Debug, Clone, Default)]
pub struct EmbedOptions {
    /// Visible icon control or relationship-only embedding
    pub icon_policy: IconPolicy,

    /// Where the icon is drawn
    pub placement: IconPlacement,

    /// PNG to use instead of the bundled icon
    pub icon_file: Option<PathBuf>,

    /// Output path; defaults to `<input>_with_audio.pptx`
    pub output: Option<PathBuf>,
}

impl EmbedOptions {
    /// Create new embed options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the icon policy.
    pub fn with_icon_policy(mut self, policy: IconPolicy) -> Self {
        self.icon_policy = policy;
        self
    }

    /// Set the icon position and size.
    pub fn with_placement(mut self, placement: IconPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Use a custom PNG for the icon.
    pub fn with_icon_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.icon_file = Some(path.into());
        self
    }

    /// Write the result to `path`.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Output path for a given input package.
    ///
    /// Fails when the path resolves to `input` itself.
    pub fn output_for(&self, input: &Path) -> Result<PathBuf> {
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(input));
        if let (Ok(out), Ok(inp)) = (fs::canonicalize(&output), fs::canonicalize(input)) {
            if out == inp {
                return Err(Error::OutputIsInput(output));
            }
        }
        Ok(output)
    }
}

/// `<dir>/<stem>_with_audio.pptx` for `<dir>/<stem>.<ext>`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}_with_audio.pptx", stem))
}
