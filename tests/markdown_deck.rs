//! Markdown to PPTX conversion tests.

mod common;

use common::{entry_names, read_part};
use slidekit::progress::{Step, StepLog};
use slidekit::{markdown_to_pptx, markdown_to_pptx_with_progress, DeckOptions, Error};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TALK: &str = "---
marp: true
theme: default
---

# Large Language Models

A short tour

---

## How they work

- Tokens in
  - Embeddings
- Tokens out
1. Pretrain
2. Fine-tune
**Scale matters**

---

## Résumé

### Takeaways
Plain closing line
";

#[test]
fn test_converts_each_segment() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("llm.md");
    fs::write(&input, TALK).unwrap();

    let mut log = StepLog::default();
    let summary =
        markdown_to_pptx_with_progress(&input, None::<&Path>, &DeckOptions::default(), &mut log)
            .unwrap();

    assert_eq!(summary.output, dir.path().join("llm.pptx"));
    assert_eq!(summary.slides, 3);
    assert_eq!(summary.title.as_deref(), Some("Large Language Models"));
    assert_eq!(log.steps[0], Step::ParsedSlides { count: 3 });

    let names = entry_names(&summary.output);
    assert_eq!(names[0], "[Content_Types].xml");
    for part in [
        "ppt/presentation.xml",
        "ppt/slideMasters/slideMaster1.xml",
        "ppt/slideLayouts/slideLayout1.xml",
        "ppt/theme/theme1.xml",
        "ppt/slides/slide3.xml",
        "docProps/core.xml",
    ] {
        assert!(names.iter().any(|n| n == part), "missing {}", part);
    }
    assert!(!names.iter().any(|n| n == "ppt/slides/slide4.xml"));

    let first = read_part(&summary.output, "ppt/slides/slide1.xml");
    assert!(first.contains(r#"sz="3200" b="1" dirty="0"/><a:t>Large Language Models</a:t>"#));
    assert!(first.contains("<a:t>A short tour</a:t>"));
    assert!(!first.contains("marp"));

    let second = read_part(&summary.output, "ppt/slides/slide2.xml");
    assert!(second.contains(r#"<a:pPr lvl="1"/><a:r><a:rPr lang="en-US" sz="1600" dirty="0"/><a:t>Embeddings</a:t>"#));
    assert_eq!(second.matches("<a:buAutoNum").count(), 2);
    assert!(second.contains("<a:t>Pretrain</a:t>"));
    assert!(second.contains(r#"sz="2000" b="1" dirty="0"/><a:t>Scale matters</a:t>"#));

    let third = read_part(&summary.output, "ppt/slides/slide3.xml");
    assert!(third.contains("<a:t>Résumé</a:t>"));
    assert!(third.contains("<a:t>Takeaways</a:t>"));
}

#[test]
fn test_explicit_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "# Only slide\n").unwrap();
    let output = dir.path().join("out").join("deck.pptx");
    fs::create_dir_all(output.parent().unwrap()).unwrap();

    let summary = markdown_to_pptx(&input, Some(&output)).unwrap();
    assert_eq!(summary.output, output);
    assert!(output.is_file());
}

#[test]
fn test_missing_markdown() {
    let dir = TempDir::new().unwrap();
    let result = markdown_to_pptx(dir.path().join("absent.md"), None::<&Path>);
    assert!(matches!(result, Err(Error::MissingMarkdown(_))));
}

#[cfg(feature = "embed")]
#[test]
fn test_generated_deck_accepts_audio() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("talk.md");
    fs::write(&input, "# One\n- a\n---\n# Two\n- b\n").unwrap();
    let deck = markdown_to_pptx(&input, None::<&Path>).unwrap();

    let audio = dir.path().join("two.mp3");
    fs::write(&audio, common::FAKE_MP3).unwrap();
    let report = slidekit::embed_audio(&deck.output, 2, &audio).unwrap();

    // Title and body placeholders hold ids 2 and 3
    assert_eq!(report.embedded[0].shape_id, Some(4));
    assert_eq!(report.embedded[0].audio_rel_id, "rId3");

    let info = slidekit::inspect(&report.output).unwrap();
    assert_eq!(info.slide_count, 2);
    assert_eq!(info.media, vec!["image1.png".to_string(), "media1.mp3".to_string()]);
}
