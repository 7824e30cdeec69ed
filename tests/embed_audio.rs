//! End-to-end audio embedding tests.

mod common;

use common::{content_types, entry_names, has_part, read_bytes, read_part, slide_xml, Fixture, FAKE_MP3};
use slidekit::embed::{AudioEmbedder, EmbedOptions, IconPolicy};
use slidekit::package::PackageDir;
use slidekit::progress::{Step, StepLog};
use slidekit::Error;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const AUDIO_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/audio";
const MEDIA_REL: &str = "http://schemas.microsoft.com/office/2007/relationships/media";
const IMAGE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn package(&self, fixture: Fixture) -> PathBuf {
        let path = self.path("deck.pptx");
        fixture.write(&path);
        path
    }

    fn audio(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, FAKE_MP3).unwrap();
        path
    }
}

fn count_defaults(ct: &str, extension: &str) -> usize {
    ct.to_lowercase()
        .matches(&format!(r#"extension="{}""#, extension))
        .count()
}

fn has_rel(rels: &str, id: &str, rel_type: &str, target: &str) -> bool {
    rels.contains(&format!(
        r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
        id, rel_type, target
    ))
}

#[test]
fn test_embed_into_second_slide() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(3));
    let audio = ws.audio("narration.mp3");

    let report = AudioEmbedder::default().embed(&package, 2, &audio).unwrap();
    let output = ws.path("deck_with_audio.pptx");
    assert_eq!(report.output, output);
    assert_eq!(report.icon_policy, IconPolicy::Visible);

    let item = &report.embedded[0];
    assert_eq!(item.slide, 2);
    assert_eq!(item.audio_asset, "media1.mp3");
    assert_eq!(item.icon_asset.as_deref(), Some("image1.png"));
    assert_eq!(item.media_rel_id, "rId2");
    assert_eq!(item.audio_rel_id, "rId3");
    assert_eq!(item.icon_rel_id.as_deref(), Some("rId4"));
    assert_eq!(item.shape_id, Some(5));

    assert_eq!(read_bytes(&output, "ppt/media/media1.mp3"), FAKE_MP3);
    assert!(has_part(&output, "ppt/media/image1.png"));

    let ct = read_part(&output, "[Content_Types].xml");
    assert!(ct.contains(r#"<Default Extension="mp3" ContentType="audio/mpeg"/>"#));
    assert!(ct.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
    assert!(ct.find(r#"Extension="png""#).unwrap() < ct.find("<Override").unwrap());

    let rels = read_part(&output, "ppt/slides/_rels/slide2.xml.rels");
    assert!(rels.contains(r#"Id="rId1""#));
    assert!(has_rel(&rels, "rId2", MEDIA_REL, "../media/media1.mp3"));
    assert!(has_rel(&rels, "rId3", AUDIO_REL, "../media/media1.mp3"));
    assert!(has_rel(&rels, "rId4", IMAGE_REL, "../media/image1.png"));

    let slide = read_part(&output, "ppt/slides/slide2.xml");
    assert_eq!(slide.matches("<p:pic ").count(), 1);
    assert!(slide.contains(r#"<p:cNvPr id="5" name="audio-2">"#));
    assert!(slide.contains(r#"<a:audioFile r:link="rId3"/>"#));
    assert!(slide.contains(r#"<p14:media xmlns:p14="http://schemas.microsoft.com/office/powerpoint/2010/main" r:embed="rId2"/>"#));
    assert!(slide.contains(r#"<a:blip r:embed="rId4"/>"#));
    assert!(slide.contains("Body &amp; notes"));

    // Other slides are carried over untouched
    assert_eq!(read_part(&output, "ppt/slides/slide1.xml"), slide_xml(1));
    assert_eq!(read_part(&output, "ppt/slides/slide3.xml"), slide_xml(3));
    assert_eq!(entry_names(&output)[0], "[Content_Types].xml");

    // Input is left as it was
    assert!(!has_part(&package, "ppt/media/media1.mp3"));
}

#[test]
fn test_progress_steps() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(3));
    let audio = ws.audio("narration.mp3");

    let mut log = StepLog::default();
    AudioEmbedder::default()
        .embed_with_progress(&package, 2, &audio, &mut log)
        .unwrap();

    assert!(matches!(log.steps[0], Step::Extracted { .. }));
    assert_eq!(
        log.steps[1..7],
        [
            Step::CopiedAudio {
                file_name: "media1.mp3".to_string()
            },
            Step::CreatedIcon {
                file_name: "image1.png".to_string()
            },
            Step::ContentType {
                extension: "mp3".to_string(),
                added: true
            },
            Step::ContentType {
                extension: "png".to_string(),
                added: true
            },
            Step::AddedRelationships { slide: 2, count: 3 },
            Step::InsertedShape {
                slide: 2,
                shape_id: 5
            },
        ]
    );
    assert!(matches!(log.steps.last(), Some(Step::Packaged { .. })));
}

#[test]
fn test_invalid_slide_number() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(3));
    let audio = ws.audio("a.mp3");

    let result = AudioEmbedder::default().embed(&package, 0, &audio);
    assert!(matches!(result, Err(Error::InvalidSlideNumber(0))));
}

#[test]
fn test_slide_out_of_range_writes_nothing() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(3));
    let audio = ws.audio("a.mp3");

    let result = AudioEmbedder::default().embed(&package, 5, &audio);
    assert!(matches!(
        result,
        Err(Error::SlideNotFound {
            slide: 5,
            available: 3
        })
    ));
    assert!(!ws.path("deck_with_audio.pptx").exists());
}

#[test]
fn test_missing_inputs() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(3));
    let audio = ws.audio("a.mp3");
    let embedder = AudioEmbedder::default();

    assert!(matches!(
        embedder.embed(&package, 1, ws.path("missing.mp3")),
        Err(Error::MissingAudioFile(_))
    ));
    assert!(matches!(
        embedder.embed(ws.path("missing.pptx"), 1, &audio),
        Err(Error::MissingPackage(_))
    ));
}

#[test]
fn test_output_over_input_is_rejected() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(2));
    let audio = ws.audio("a.mp3");
    let before = fs::read(&package).unwrap();

    let embedder = AudioEmbedder::new(EmbedOptions::new().with_output(&package));
    let result = embedder.embed(&package, 1, &audio);
    assert!(matches!(result, Err(Error::OutputIsInput(_))));
    assert_eq!(fs::read(&package).unwrap(), before);
}

#[test]
fn test_not_a_presentation() {
    let ws = Workspace::new();
    let package = ws.package(
        Fixture::deck(1)
            .without_part("[Content_Types].xml")
            .without_part("ppt/presentation.xml"),
    );
    let audio = ws.audio("a.mp3");

    let result = AudioEmbedder::default().embed(&package, 1, &audio);
    assert!(matches!(result, Err(Error::NotAPresentation)));

    let garbage = ws.path("garbage.pptx");
    fs::write(&garbage, b"definitely not a zip").unwrap();
    let result = AudioEmbedder::default().embed(&garbage, 1, &audio);
    assert!(matches!(result, Err(Error::ZipArchive(_))));
}

#[test]
fn test_malformed_relationships_abort() {
    let ws = Workspace::new();
    let broken = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="t" Target="x"/>"#;
    let package = ws.package(
        Fixture::deck(3).with_part("ppt/slides/_rels/slide2.xml.rels", broken),
    );
    let audio = ws.audio("a.mp3");

    match AudioEmbedder::default().embed(&package, 2, &audio) {
        Err(Error::MalformedRelationshipFile { path, .. }) => {
            assert_eq!(path, "ppt/slides/_rels/slide2.xml.rels");
        }
        other => panic!("expected malformed relationships, got {:?}", other),
    }
    assert!(!ws.path("deck_with_audio.pptx").exists());
}

#[test]
fn test_missing_relationships_part_is_created() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(2).without_part("ppt/slides/_rels/slide1.xml.rels"));
    let audio = ws.audio("a.mp3");

    let report = AudioEmbedder::default().embed(&package, 1, &audio).unwrap();
    let rels = read_part(&report.output, "ppt/slides/_rels/slide1.xml.rels");
    assert!(has_rel(&rels, "rId1", MEDIA_REL, "../media/media1.mp3"));
    assert!(has_rel(&rels, "rId2", AUDIO_REL, "../media/media1.mp3"));
    assert!(has_rel(&rels, "rId3", IMAGE_REL, "../media/image1.png"));
}

#[test]
fn test_existing_media_and_content_types() {
    let ws = Workspace::new();
    let ct = content_types(2).replacen(
        "<Override",
        r#"<Default Extension="MP3" ContentType="audio/mpeg"/><Override"#,
        1,
    );
    let package = ws.package(
        Fixture::deck(2)
            .with_part("[Content_Types].xml", ct)
            .with_part("ppt/media/media1.mp3", FAKE_MP3)
            .with_part("ppt/media/media4.mp3", FAKE_MP3)
            .with_part("ppt/media/image2.png", b"png".to_vec()),
    );
    let audio = ws.audio("a.mp3");

    let report = AudioEmbedder::default().embed(&package, 1, &audio).unwrap();
    let item = &report.embedded[0];
    assert_eq!(item.audio_asset, "media5.mp3");
    assert_eq!(item.icon_asset.as_deref(), Some("image3.png"));

    let ct = read_part(&report.output, "[Content_Types].xml");
    assert_eq!(count_defaults(&ct, "mp3"), 1);
    assert_eq!(count_defaults(&ct, "png"), 1);
}

#[test]
fn test_exhausted_numbering_is_rejected() {
    let ws = Workspace::new();
    let audio = ws.audio("a.mp3");

    let package = ws.package(Fixture::deck(2).with_part("ppt/media/media4294967295.mp3", FAKE_MP3));
    let result = AudioEmbedder::default().embed(&package, 1, &audio);
    assert!(matches!(result, Err(Error::InvalidData(_))));
    assert!(!ws.path("deck_with_audio.pptx").exists());

    let crowded = slide_xml(1).replace(r#"id="4""#, r#"id="4294967295""#);
    let package = ws.package(Fixture::deck(2).with_part("ppt/slides/slide1.xml", crowded));
    let result = AudioEmbedder::default().embed(&package, 1, &audio);
    assert!(matches!(result, Err(Error::InvalidData(_))));
    assert!(!ws.path("deck_with_audio.pptx").exists());
}

#[test]
fn test_repeated_embeds_do_not_collide() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(3));
    let audio = ws.audio("a.mp3");

    let first = AudioEmbedder::default().embed(&package, 2, &audio).unwrap();
    let second = AudioEmbedder::new(EmbedOptions::new().with_output(ws.path("twice.pptx")))
        .embed(&first.output, 2, &audio)
        .unwrap();

    let item = &second.embedded[0];
    assert_eq!(item.audio_asset, "media2.mp3");
    assert_eq!(item.icon_asset.as_deref(), Some("image2.png"));
    assert_eq!(item.media_rel_id, "rId5");
    assert_eq!(item.audio_rel_id, "rId6");
    assert_eq!(item.icon_rel_id.as_deref(), Some("rId7"));
    assert_eq!(item.shape_id, Some(6));

    let output = &second.output;
    let ct = read_part(output, "[Content_Types].xml");
    assert_eq!(count_defaults(&ct, "mp3"), 1);

    let slide = read_part(output, "ppt/slides/slide2.xml");
    assert_eq!(slide.matches("<p:pic ").count(), 2);
    assert!(slide.contains(r#"<p:cNvPr id="6" name="audio-2">"#));
}

#[test]
fn test_hidden_policy_leaves_slide_markup() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(3));
    let audio = ws.audio("a.mp3");

    let options = EmbedOptions::new().with_icon_policy(IconPolicy::Hidden);
    let report = AudioEmbedder::new(options).embed(&package, 2, &audio).unwrap();
    let item = &report.embedded[0];
    assert!(item.icon_asset.is_none());
    assert!(item.shape_id.is_none());

    let output = &report.output;
    assert_eq!(read_part(output, "ppt/slides/slide2.xml"), slide_xml(2));
    assert!(!has_part(output, "ppt/media/image1.png"));

    let rels = read_part(output, "ppt/slides/_rels/slide2.xml.rels");
    assert!(has_rel(&rels, "rId2", MEDIA_REL, "../media/media1.mp3"));
    assert!(has_rel(&rels, "rId3", AUDIO_REL, "../media/media1.mp3"));
    assert!(!rels.contains(IMAGE_REL));

    let ct = read_part(output, "[Content_Types].xml");
    assert_eq!(count_defaults(&ct, "mp3"), 1);
    assert_eq!(count_defaults(&ct, "png"), 0);
}

#[test]
fn test_custom_icon() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(1));
    let audio = ws.audio("a.mp3");
    let icon = ws.path("speaker.png");
    fs::write(&icon, b"\x89PNG custom").unwrap();

    let report = AudioEmbedder::new(EmbedOptions::new().with_icon_file(&icon))
        .embed(&package, 1, &audio)
        .unwrap();
    assert_eq!(
        read_bytes(&report.output, "ppt/media/image1.png"),
        b"\x89PNG custom"
    );
}

#[test]
fn test_untouched_round_trip() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(3));
    let copy = ws.path("copy.pptx");

    PackageDir::extract(&package).unwrap().repackage(&copy).unwrap();

    let before: BTreeSet<String> = entry_names(&package).into_iter().collect();
    let after: BTreeSet<String> = entry_names(&copy).into_iter().collect();
    assert_eq!(before, after);
    for name in &before {
        assert_eq!(read_bytes(&package, name), read_bytes(&copy, name), "{}", name);
    }
}

#[test]
fn test_batch_embeds_numbered_files() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(3));
    ws.audio("audio/audio-3.mp3");
    ws.audio("audio/audio-1.mp3");
    ws.audio("audio/intro.mp3");
    fs::write(ws.path("audio/notes-2.txt"), b"notes").unwrap();

    let mut log = StepLog::default();
    let report = AudioEmbedder::default()
        .embed_batch_with_progress(&package, ws.path("audio"), &mut log)
        .unwrap();

    let slides: Vec<u32> = report.embedded.iter().map(|e| e.slide).collect();
    assert_eq!(slides, vec![1, 3]);
    assert_eq!(report.skipped, vec!["intro.mp3".to_string()]);
    assert_eq!(report.embedded[0].audio_asset, "media1.mp3");
    assert_eq!(report.embedded[1].audio_asset, "media2.mp3");
    assert!(log.steps.contains(&Step::SkippedFile {
        file_name: "intro.mp3".to_string()
    }));

    let output = &report.output;
    let rels = read_part(output, "ppt/slides/_rels/slide3.xml.rels");
    assert!(has_rel(&rels, "rId3", AUDIO_REL, "../media/media2.mp3"));
    assert!(has_rel(&rels, "rId4", IMAGE_REL, "../media/image2.png"));
    assert_eq!(read_part(output, "ppt/slides/slide2.xml"), slide_xml(2));

    let ct = read_part(output, "[Content_Types].xml");
    assert_eq!(count_defaults(&ct, "mp3"), 1);
    assert_eq!(count_defaults(&ct, "png"), 1);
}

#[test]
fn test_batch_same_slide_twice() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(3));
    ws.audio("audio/a-2.mp3");
    ws.audio("audio/b-2.mp3");

    let report = AudioEmbedder::default()
        .embed_batch(&package, ws.path("audio"))
        .unwrap();
    let ids: Vec<Option<u32>> = report.embedded.iter().map(|e| e.shape_id).collect();
    assert_eq!(ids, vec![Some(5), Some(6)]);

    let slide = read_part(&report.output, "ppt/slides/slide2.xml");
    assert_eq!(slide.matches("<p:pic ").count(), 2);
}

#[test]
fn test_batch_validates_every_slide_first() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(3));
    ws.audio("audio/audio-1.mp3");
    ws.audio("audio/audio-9.mp3");

    let result = AudioEmbedder::default().embed_batch(&package, ws.path("audio"));
    assert!(matches!(
        result,
        Err(Error::SlideNotFound {
            slide: 9,
            available: 3
        })
    ));
    assert!(!ws.path("deck_with_audio.pptx").exists());
}

#[test]
fn test_batch_without_numbered_files() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(3));
    ws.audio("audio/intro.mp3");

    let result = AudioEmbedder::default().embed_batch(&package, ws.path("audio"));
    assert!(matches!(result, Err(Error::NoAudioFiles(_))));
}

#[test]
fn test_report_serializes() {
    let ws = Workspace::new();
    let package = ws.package(Fixture::deck(1));
    let audio = ws.audio("a.mp3");

    let report = slidekit::embed_audio(&package, 1, &audio).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["icon_policy"], "visible");
    assert_eq!(json["embedded"][0]["audio_rel_id"], "rId3");
    assert!(Path::new(json["output"].as_str().unwrap()).ends_with("deck_with_audio.pptx"));
}
