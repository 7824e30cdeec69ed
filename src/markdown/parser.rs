//! Markdown slide parser implementation.

use crate::error::{Error, Result};
use crate::model::{BodyLine, Deck, LineKind, SlideContent};
use std::fs;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Parser for slide-oriented markdown (Marp-style `---` separators).
pub struct MarkdownParser {
    source: String,
}

impl MarkdownParser {
    /// Open a markdown file for parsing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::MissingMarkdown(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        let source = String::from_utf8(bytes)
            .map_err(|e| Error::InvalidData(format!("{} is not UTF-8: {}", path.display(), e)))?;
        Ok(Self::from_str(&source))
    }

    /// Create a parser over markdown text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(source: &str) -> Self {
        Self {
            source: source.nfc().collect(),
        }
    }

    /// Parse the document into a deck.
    pub fn parse(&self) -> Deck {
        let mut segments = split_segments(&self.source);
        if segments.first().is_some_and(|s| s.contains("marp:")) {
            segments.remove(0);
        }

        let mut deck = Deck::new();
        for segment in segments {
            deck.add_slide(parse_slide(segment));
        }
        deck
    }
}

/// Non-blank segments between `---` separator lines.
fn split_segments(source: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for line in source.lines() {
        if line.trim() == "---" {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    segments.push(current);

    segments.retain(|s| !s.trim().is_empty());
    segments
}

fn parse_slide(segment: String) -> SlideContent {
    let mut slide = SlideContent::new();

    for line in segment.lines() {
        if line.starts_with("# ") || line.starts_with("## ") {
            slide.title = Some(line.trim_start_matches('#').trim().to_string());
        } else if line.starts_with("### ") {
            slide.push(BodyLine::plain(line.trim_start_matches('#').trim()));
        } else if let Some(body) = classify_line(line) {
            slide.push(body);
        }
    }

    slide
}

/// Map one content line to a body paragraph; blank lines yield `None`.
fn classify_line(line: &str) -> Option<BodyLine> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(text) = trimmed.strip_prefix("- ") {
        let nested = line.starts_with("  ") || line.starts_with('\t');
        let level = if nested { 1 } else { 0 };
        return Some(BodyLine::bullet(text.trim(), level));
    }

    if let Some(text) = strip_number_marker(trimmed) {
        return Some(BodyLine::new(text, LineKind::Numbered));
    }

    if trimmed.len() > 4 && trimmed.starts_with("**") && trimmed.ends_with("**") {
        return Some(BodyLine::new(trimmed.trim_matches('*').trim(), LineKind::Bold));
    }

    Some(BodyLine::plain(trimmed))
}

/// Text after a leading `<digits>.` marker.
fn strip_number_marker(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return None;
    }
    rest.strip_prefix('.').map(str::trim_start)
}
