//! Deck, slide and body line structures.

use serde::{Deserialize, Serialize};

/// Font size of slide titles, in points.
pub const TITLE_FONT_SIZE: u32 = 32;

/// How a body line is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LineKind {
    /// Bulleted item at the given nesting level (0 = top level)
    Bullet { level: u8 },
    /// Auto-numbered item
    Numbered,
    /// Emphasized standalone line
    Bold,
    /// Plain paragraph
    #[default]
    Plain,
}

impl LineKind {
    /// Font size in points.
    pub fn font_size(&self) -> u32 {
        match self {
            LineKind::Bullet { level: 0 } => 18,
            LineKind::Bullet { .. } => 16,
            LineKind::Numbered => 18,
            LineKind::Bold => 20,
            LineKind::Plain => 18,
        }
    }

    /// Whether runs are bold.
    pub fn is_bold(&self) -> bool {
        matches!(self, LineKind::Bold)
    }

    /// Paragraph indentation level.
    pub fn level(&self) -> u8 {
        match self {
            LineKind::Bullet { level } => *level,
            _ => 0,
        }
    }
}

/// One paragraph of a slide body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLine {
    pub text: String,
    #[serde(flatten)]
    pub kind: LineKind,
}

impl BodyLine {
    /// Create a line of the given kind.
    pub fn new(text: impl Into<String>, kind: LineKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// Create a plain line.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, LineKind::Plain)
    }

    /// Create a bullet at `level`.
    pub fn bullet(text: impl Into<String>, level: u8) -> Self {
        Self::new(text, LineKind::Bullet { level })
    }
}

/// A title-and-content slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideContent {
    /// Slide title; slides without one get an empty title placeholder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Body paragraphs in order
    #[serde(default)]
    pub body: Vec<BodyLine>,
}

impl SlideContent {
    /// Create an empty slide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slide with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Vec::new(),
        }
    }

    /// Append a body line.
    pub fn push(&mut self, line: BodyLine) {
        self.body.push(line);
    }

    /// Check if the slide has neither title nor body.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_empty()
    }
}

/// An ordered list of slides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub slides: Vec<SlideContent>,
}

impl Deck {
    /// Create an empty deck.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slide.
    pub fn add_slide(&mut self, slide: SlideContent) {
        self.slides.push(slide);
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Title of the first slide that has one.
    pub fn title(&self) -> Option<&str> {
        self.slides.iter().find_map(|s| s.title.as_deref())
    }
}
