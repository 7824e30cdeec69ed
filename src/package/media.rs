//! Numbered media assets under `ppt/media/`.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Kinds of asset the embedder stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// `media{N}.mp3`
    Audio,
    /// `image{N}.png`
    Icon,
}

impl AssetKind {
    /// File name prefix before the number.
    pub fn prefix(&self) -> &'static str {
        match self {
            AssetKind::Audio => "media",
            AssetKind::Icon => "image",
        }
    }

    /// Extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            AssetKind::Audio => "mp3",
            AssetKind::Icon => "png",
        }
    }

    /// MIME type registered for the extension.
    pub fn content_type(&self) -> &'static str {
        match self {
            AssetKind::Audio => "audio/mpeg",
            AssetKind::Icon => "image/png",
        }
    }

    fn suffix(&self) -> String {
        format!(".{}", self.extension())
    }

    /// File name for asset number `n`.
    pub fn file_name(&self, n: u32) -> String {
        format!("{}{}{}", self.prefix(), n, self.suffix())
    }
}

/// An asset written into the media folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedAsset {
    pub kind: AssetKind,
    pub number: u32,
    pub file_name: String,
}

impl PlacedAsset {
    /// Relationship target as seen from a slide part.
    pub fn slide_target(&self) -> String {
        format!("../media/{}", self.file_name)
    }
}

/// Number in a `{prefix}{digits}{suffix}` file name.
///
/// Anything else, including an empty or non-numeric middle, yields `None`.
pub fn parse_numbered_name(name: &str, prefix: &str, suffix: &str) -> Option<u32> {
    let digits = name.strip_prefix(prefix)?.strip_suffix(suffix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// One past the highest `{prefix}{N}{suffix}` number in `folder`, or 1 when
/// the folder is empty or absent.
pub fn next_asset_number(folder: &Path, prefix: &str, suffix: &str) -> Result<u32> {
    if !folder.is_dir() {
        return Ok(1);
    }

    let mut max = 0;
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        match parse_numbered_name(name, prefix, suffix) {
            Some(n) => max = max.max(n),
            None if name.starts_with(prefix) && name.ends_with(suffix) => {
                log::debug!("ignoring malformed asset name {}", name);
            }
            None => {}
        }
    }
    max.checked_add(1).ok_or_else(|| {
        Error::InvalidData(format!(
            "{}: {}{}{} cannot be followed",
            folder.display(),
            prefix,
            max,
            suffix
        ))
    })
}

/// Copy `source` into `folder` under the next free name for `kind`.
pub fn place_file(folder: &Path, kind: AssetKind, source: &Path) -> Result<PlacedAsset> {
    let asset = reserve(folder, kind)?;
    fs::copy(source, folder.join(&asset.file_name))?;
    Ok(asset)
}

/// Write `data` into `folder` under the next free name for `kind`.
pub fn place_bytes(folder: &Path, kind: AssetKind, data: &[u8]) -> Result<PlacedAsset> {
    let asset = reserve(folder, kind)?;
    fs::write(folder.join(&asset.file_name), data)?;
    Ok(asset)
}

fn reserve(folder: &Path, kind: AssetKind) -> Result<PlacedAsset> {
    fs::create_dir_all(folder)?;
    let number = next_asset_number(folder, kind.prefix(), &kind.suffix())?;
    Ok(PlacedAsset {
        kind,
        number,
        file_name: kind.file_name(number),
    })
}
