//! Markdown slide source.
//!
//! Slides are separated by lines holding only `---`. A leading block
//! containing `marp:` is front matter and is dropped. In each slide the last
//! `#` or `##` heading becomes the title and the remaining lines become body
//! paragraphs.

mod parser;

pub use parser::MarkdownParser;

use std::path::{Path, PathBuf};

/// `slides.md` → `slides.pptx`; any other name gets `.pptx` appended.
pub fn default_deck_path(input: &Path) -> PathBuf {
    let is_md = input
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("md"));
    if is_md {
        input.with_extension("pptx")
    } else {
        let mut name = input.as_os_str().to_os_string();
        name.push(".pptx");
        PathBuf::from(name)
    }
}
