//! Matching a directory of audio files to slides.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// An audio file paired with the slide it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioMatch {
    pub slide: u32,
    pub path: PathBuf,
}

/// Result of scanning an audio directory.
#[derive(Debug, Clone, Default)]
pub struct AudioMatches {
    /// Matched files ordered by slide, then file name
    pub matched: Vec<AudioMatch>,
    /// MP3 files without a usable slide suffix
    pub skipped: Vec<String>,
}

/// Slide number encoded as the trailing digits of a file stem
/// (`audio-3` → 3, `intro12` → 12). Zero is not a slide.
pub fn slide_suffix(stem: &str) -> Option<u32> {
    let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    stem[stem.len() - digits..]
        .parse()
        .ok()
        .filter(|&n: &u32| n >= 1)
}

/// Scan `dir` for `*.mp3` files and pair each with a slide.
pub fn match_audio_files(dir: &Path) -> Result<AudioMatches> {
    if !dir.is_dir() {
        return Err(Error::MissingAudioFile(dir.to_path_buf()));
    }

    let mut matches = AudioMatches::default();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_mp3 = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("mp3"));
        if !is_mp3 {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        let slide = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(slide_suffix);
        match slide {
            Some(slide) => matches.matched.push(AudioMatch { slide, path }),
            None => {
                log::warn!("{} has no slide number suffix, skipping", file_name);
                matches.skipped.push(file_name);
            }
        }
    }

    matches
        .matched
        .sort_by(|a, b| a.slide.cmp(&b.slide).then_with(|| a.path.cmp(&b.path)));
    matches.skipped.sort();

    if matches.matched.is_empty() {
        return Err(Error::NoAudioFiles(dir.to_path_buf()));
    }
    Ok(matches)
}
