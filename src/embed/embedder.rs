//! Slide audio embedder.

use super::batch::{match_audio_files, AudioMatch};
use super::markup::{audio_picture, new_creation_id, AudioControlRefs};
use super::options::{EmbedOptions, IconPolicy, DEFAULT_ICON_PNG};
use crate::error::{Error, Result};
use crate::package::media::{place_bytes, place_file};
use crate::package::{
    rel_types, slide_part, slide_rels_part, AssetKind, ContentTypes, PackageDir, Relationships,
    SlideDocument, CONTENT_TYPES_PART,
};
use crate::progress::{NoProgress, Progress, Step};
use serde::Serialize;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

/// What was added to one slide.
#[derive(Debug, Clone, Serialize)]
pub struct SlideEmbedding {
    /// 1-indexed slide number
    pub slide: u32,
    /// Audio file that was embedded
    pub source: PathBuf,
    /// File name under `ppt/media/`
    pub audio_asset: String,
    /// Icon file name under `ppt/media/`, when visible
    pub icon_asset: Option<String>,
    /// Id of the vendor media relationship
    pub media_rel_id: String,
    /// Id of the audio relationship
    pub audio_rel_id: String,
    /// Id of the icon image relationship
    pub icon_rel_id: Option<String>,
    /// Shape id of the inserted control
    pub shape_id: Option<u32>,
}

/// Outcome of an embedding run.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedReport {
    /// The package that was written
    pub output: PathBuf,
    pub icon_policy: IconPolicy,
    /// One entry per embedded audio file, in processing order
    pub embedded: Vec<SlideEmbedding>,
    /// Batch files that matched no slide
    pub skipped: Vec<String>,
}

/// The existing parts of one slide, parsed before anything is changed.
struct SlideParts {
    rels_part: String,
    rels: Relationships,
    markup: Option<SlideDocument>,
}

/// Embeds MP3 audio into slides of a PPTX package.
///
/// # Example
///
/// ```no_run
/// use slidekit::embed::{AudioEmbedder, EmbedOptions};
///
/// let report = AudioEmbedder::new(EmbedOptions::default())
///     .embed("talk.pptx", 2, "narration.mp3")?;
/// println!("wrote {}", report.output.display());
/// # Ok::<(), slidekit::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct AudioEmbedder {
    options: EmbedOptions,
}

impl AudioEmbedder {
    /// Create an embedder with the given options.
    pub fn new(options: EmbedOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EmbedOptions {
        &self.options
    }

    /// Embed `audio` into slide `slide` (1-indexed) of `package`.
    pub fn embed(
        &self,
        package: impl AsRef<Path>,
        slide: u32,
        audio: impl AsRef<Path>,
    ) -> Result<EmbedReport> {
        self.embed_with_progress(package, slide, audio, &mut NoProgress)
    }

    /// Like [`embed`](Self::embed), reporting each step to `progress`.
    pub fn embed_with_progress(
        &self,
        package: impl AsRef<Path>,
        slide: u32,
        audio: impl AsRef<Path>,
        progress: &mut dyn Progress,
    ) -> Result<EmbedReport> {
        let package = package.as_ref();
        let audio = audio.as_ref();

        if !package.is_file() {
            return Err(Error::MissingPackage(package.to_path_buf()));
        }
        if !audio.is_file() {
            return Err(Error::MissingAudioFile(audio.to_path_buf()));
        }
        if slide < 1 {
            return Err(Error::InvalidSlideNumber(slide));
        }

        let job = AudioMatch {
            slide,
            path: audio.to_path_buf(),
        };
        self.run(package, &[job], Vec::new(), progress)
    }

    /// Embed every `*-N.mp3` file of `audio_dir` into slide N.
    pub fn embed_batch(
        &self,
        package: impl AsRef<Path>,
        audio_dir: impl AsRef<Path>,
    ) -> Result<EmbedReport> {
        self.embed_batch_with_progress(package, audio_dir, &mut NoProgress)
    }

    /// Like [`embed_batch`](Self::embed_batch), reporting each step to
    /// `progress`.
    pub fn embed_batch_with_progress(
        &self,
        package: impl AsRef<Path>,
        audio_dir: impl AsRef<Path>,
        progress: &mut dyn Progress,
    ) -> Result<EmbedReport> {
        let package = package.as_ref();
        if !package.is_file() {
            return Err(Error::MissingPackage(package.to_path_buf()));
        }

        let matches = match_audio_files(audio_dir.as_ref())?;
        for file_name in &matches.skipped {
            progress.on_step(&Step::SkippedFile {
                file_name: file_name.clone(),
            });
        }
        self.run(package, &matches.matched, matches.skipped, progress)
    }

    /// Icon bytes for the configured policy.
    fn load_icon(&self) -> Result<Option<Cow<'static, [u8]>>> {
        match (&self.options.icon_policy, &self.options.icon_file) {
            (IconPolicy::Hidden, _) => Ok(None),
            (IconPolicy::Visible, Some(path)) => Ok(Some(Cow::Owned(fs::read(path)?))),
            (IconPolicy::Visible, None) => Ok(Some(Cow::Borrowed(DEFAULT_ICON_PNG))),
        }
    }

    fn run(
        &self,
        package: &Path,
        jobs: &[AudioMatch],
        skipped: Vec<String>,
        progress: &mut dyn Progress,
    ) -> Result<EmbedReport> {
        let icon = self.load_icon()?;
        let visible = icon.is_some();
        let output = self.options.output_for(package)?;

        let pkg = PackageDir::extract(package)?;
        progress.on_step(&Step::Extracted {
            package: package.to_path_buf(),
        });

        // Everything is parsed up front so a bad slide fails the run before
        // the first edit.
        let mut content_types = ContentTypes::parse(&pkg.read_xml(CONTENT_TYPES_PART)?)?;
        let mut checked = Vec::new();
        for job in jobs {
            if !checked.contains(&job.slide) {
                load_slide_parts(&pkg, job.slide, visible)?;
                checked.push(job.slide);
            }
        }

        let mut embedded = Vec::with_capacity(jobs.len());
        let mut types_changed = false;
        for job in jobs {
            let parts = load_slide_parts(&pkg, job.slide, visible)?;
            let result = self.embed_slide(
                &pkg,
                job,
                parts,
                icon.as_deref(),
                &mut content_types,
                &mut types_changed,
                progress,
            )?;
            log::info!(
                "embedded {} into slide {}",
                job.path.display(),
                job.slide
            );
            embedded.push(result);
        }

        if types_changed {
            pkg.write_xml(CONTENT_TYPES_PART, &content_types.to_xml())?;
        }

        pkg.repackage(&output)?;
        progress.on_step(&Step::Packaged {
            output: output.clone(),
        });

        Ok(EmbedReport {
            output,
            icon_policy: self.options.icon_policy,
            embedded,
            skipped,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn embed_slide(
        &self,
        pkg: &PackageDir,
        job: &AudioMatch,
        parts: SlideParts,
        icon: Option<&[u8]>,
        content_types: &mut ContentTypes,
        types_changed: &mut bool,
        progress: &mut dyn Progress,
    ) -> Result<SlideEmbedding> {
        let SlideParts {
            rels_part,
            mut rels,
            markup,
        } = parts;
        let media_dir = pkg.media_dir();

        let audio_asset = place_file(&media_dir, AssetKind::Audio, &job.path)?;
        progress.on_step(&Step::CopiedAudio {
            file_name: audio_asset.file_name.clone(),
        });

        let icon_asset = icon
            .map(|bytes| place_bytes(&media_dir, AssetKind::Icon, bytes))
            .transpose()?;
        if let Some(asset) = &icon_asset {
            progress.on_step(&Step::CreatedIcon {
                file_name: asset.file_name.clone(),
            });
        }

        let kinds = std::iter::once(&audio_asset)
            .chain(icon_asset.as_ref())
            .map(|asset| asset.kind);
        for kind in kinds {
            let added = content_types.ensure_default(kind.extension(), kind.content_type());
            *types_changed |= added;
            progress.on_step(&Step::ContentType {
                extension: kind.extension().to_string(),
                added,
            });
        }

        let audio_target = audio_asset.slide_target();
        let media_rel_id = rels.add(rel_types::MEDIA, &audio_target)?;
        let audio_rel_id = rels.add(rel_types::AUDIO, &audio_target)?;
        let icon_rel_id = icon_asset
            .as_ref()
            .map(|asset| rels.add(rel_types::IMAGE, &asset.slide_target()))
            .transpose()?;
        pkg.write_xml(&rels_part, &rels.to_xml())?;
        progress.on_step(&Step::AddedRelationships {
            slide: job.slide,
            count: if icon_rel_id.is_some() { 3 } else { 2 },
        });

        let mut shape_id = None;
        if let (Some(mut doc), Some(icon_rel)) = (markup, icon_rel_id.as_deref()) {
            let id = doc.next_shape_id()?;
            let refs = AudioControlRefs {
                audio: &audio_rel_id,
                media: &media_rel_id,
                icon: icon_rel,
            };
            let fragment = audio_picture(
                id,
                &format!("audio-{}", job.slide),
                &refs,
                &self.options.placement,
                &new_creation_id(),
            );
            doc.append_to_shape_tree(&fragment)?;
            pkg.write_xml(doc.part(), doc.as_str())?;
            progress.on_step(&Step::InsertedShape {
                slide: job.slide,
                shape_id: id,
            });
            shape_id = Some(id);
        }

        Ok(SlideEmbedding {
            slide: job.slide,
            source: job.path.clone(),
            audio_asset: audio_asset.file_name,
            icon_asset: icon_asset.map(|a| a.file_name),
            media_rel_id,
            audio_rel_id,
            icon_rel_id,
            shape_id,
        })
    }
}

/// Read and parse the parts of `slide` that embedding edits.
fn load_slide_parts(pkg: &PackageDir, slide: u32, with_markup: bool) -> Result<SlideParts> {
    pkg.require_slide(slide)?;

    let rels_part = slide_rels_part(slide);
    let rels = if pkg.has_part(&rels_part) {
        let xml = pkg.read_xml(&rels_part)?;
        Relationships::parse(&xml).map_err(|e| Error::MalformedRelationshipFile {
            path: rels_part.clone(),
            reason: e.to_string(),
        })?
    } else {
        Relationships::new()
    };

    let markup = if with_markup {
        let part = slide_part(slide);
        let xml = pkg.read_xml(&part)?;
        Some(SlideDocument::parse(&part, xml)?)
    } else {
        None
    };

    Ok(SlideParts {
        rels_part,
        rels,
        markup,
    })
}
