use std::fmt;

use thiserror::Error;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "avi", "mkv"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
    Image,
}

impl MediaKind {
    /// Maps a MIME type by its top-level prefix. Anything that is not
    /// `audio/*`, `video/*` or `image/*` is unsupported.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let top = mime.trim().split('/').next()?.to_ascii_lowercase();
        match top.as_str() {
            "audio" => Some(Self::Audio),
            "video" => Some(Self::Video),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    /// Infers the kind of a URL or path from its extension. Unknown or
    /// missing extensions fall back to audio.
    pub fn from_locator(locator: &str) -> Self {
        match locator_extension(locator) {
            Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => Self::Video,
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => Self::Image,
            _ => Self::Audio,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Image => "image",
        }
    }

    /// Audio and video have a real audio track that feeds the analyser.
    pub fn has_audio(self) -> bool {
        matches!(self, Self::Audio | Self::Video)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("unsupported media type `{0}`")]
    Unsupported(String),
    #[error("empty media locator")]
    EmptyLocator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistItem {
    pub name: String,
    pub locator: String,
    pub kind: MediaKind,
}

impl PlaylistItem {
    pub fn new(name: impl Into<String>, locator: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
            kind,
        }
    }

    /// Builds an item from a URL or filesystem path, inferring the kind from
    /// the extension.
    pub fn from_locator(locator: &str) -> Result<Self, MediaError> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(MediaError::EmptyLocator);
        }
        Ok(Self::new(
            display_name(locator),
            locator,
            MediaKind::from_locator(locator),
        ))
    }

    /// Builds an item for a dropped/selected file whose MIME type is known.
    pub fn from_mime(name: &str, locator: &str, mime: &str) -> Result<Self, MediaError> {
        if locator.trim().is_empty() {
            return Err(MediaError::EmptyLocator);
        }
        let kind = MediaKind::from_mime(mime).ok_or_else(|| MediaError::Unsupported(mime.to_string()))?;
        let name = if name.trim().is_empty() {
            display_name(locator)
        } else {
            strip_extension(name.trim()).to_string()
        };
        Ok(Self::new(name, locator.trim(), kind))
    }
}

fn strip_query(locator: &str) -> &str {
    let end = locator.find(['?', '#']).unwrap_or(locator.len());
    &locator[..end]
}

fn last_segment(locator: &str) -> &str {
    let path = strip_query(locator).trim_end_matches(['/', '\\']);
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

fn locator_extension(locator: &str) -> Option<String> {
    let segment = last_segment(locator);
    let dot = segment.rfind('.')?;
    if dot + 1 >= segment.len() {
        return None;
    }
    Some(segment[dot + 1..].to_ascii_lowercase())
}

pub fn display_name(locator: &str) -> String {
    let segment = last_segment(locator);
    let name = strip_extension(segment);
    if name.is_empty() {
        locator.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_groups_map_to_kinds() {
        assert_eq!(MediaKind::from_locator("clip.MKV"), MediaKind::Video);
        assert_eq!(MediaKind::from_locator("https://x.test/a/cover.webp?w=400"), MediaKind::Image);
        assert_eq!(MediaKind::from_locator("https://x.test/stream"), MediaKind::Audio);
        assert_eq!(MediaKind::from_locator("song.flac#t=10"), MediaKind::Audio);
    }

    #[test]
    fn display_name_drops_directories_and_extension() {
        assert_eq!(display_name("/music/Midnight Protocol.mp3"), "Midnight Protocol");
        assert_eq!(display_name("https://cdn.test/mix/SoundHelix-Song-1.mp3?dl=1"), "SoundHelix-Song-1");
        assert_eq!(display_name(".hidden"), ".hidden");
    }
}
