//! Insert models for the record store.
//!
//! Read models live in `quietcut_common::clip`; the types here describe rows
//! before the database has assigned them an id.

use std::path::PathBuf;

use quietcut_common::clip::{
    DEFAULT_FONT_FILE, DEFAULT_FONT_SIZE, DEFAULT_IMAGE_DURATION, DEFAULT_IMAGE_FILE,
    DEFAULT_SPEED, DEFAULT_TEXT_DURATION,
};
use quietcut_common::ClipKind;

/// A probed source video about to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSource {
    pub path: PathBuf,
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub duration: f64,
    pub audio_rate: u32,
    pub keyframes: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVideoClip {
    pub start: String,
    pub end: String,
    pub speed: f64,
}

impl NewVideoClip {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            speed: DEFAULT_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewImageClip {
    pub timestamp: String,
    pub duration: f64,
    pub input_file: PathBuf,
}

impl NewImageClip {
    /// An image clip showing `input_file` for the default duration.
    pub fn new(timestamp: impl Into<String>, input_file: impl Into<PathBuf>) -> Self {
        Self {
            timestamp: timestamp.into(),
            duration: DEFAULT_IMAGE_DURATION,
            input_file: input_file.into(),
        }
    }
}

impl Default for NewImageClip {
    fn default() -> Self {
        Self::new("0:00:00", DEFAULT_IMAGE_FILE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTextClip {
    pub timestamp: String,
    pub text: String,
    pub duration: f64,
    pub font_file: PathBuf,
    pub font_size: u32,
}

impl NewTextClip {
    /// A text clip with the default duration, font and size.
    pub fn new(timestamp: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            text: text.into(),
            duration: DEFAULT_TEXT_DURATION,
            font_file: PathBuf::from(DEFAULT_FONT_FILE),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Any clip about to be stored.
#[derive(Debug, Clone, PartialEq)]
pub enum NewClip {
    Video(NewVideoClip),
    Image(NewImageClip),
    Text(NewTextClip),
}

impl NewClip {
    pub fn kind(&self) -> ClipKind {
        match self {
            Self::Video(_) => ClipKind::Video,
            Self::Image(_) => ClipKind::Image,
            Self::Text(_) => ClipKind::Text,
        }
    }
}

impl From<NewVideoClip> for NewClip {
    fn from(clip: NewVideoClip) -> Self {
        Self::Video(clip)
    }
}

impl From<NewImageClip> for NewClip {
    fn from(clip: NewImageClip) -> Self {
        Self::Image(clip)
    }
}

impl From<NewTextClip> for NewClip {
    fn from(clip: NewTextClip) -> Self {
        Self::Text(clip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let video = NewVideoClip::new("00:00:01.000000", "00:00:02.000000");
        assert_eq!(video.speed, 1.0);

        let image = NewImageClip::default();
        assert_eq!(image.timestamp, "0:00:00");
        assert_eq!(image.duration, 3.0);
        assert_eq!(image.input_file, PathBuf::from("thumbnail.png"));

        let text = NewTextClip::new("0:01:00", "Setup");
        assert_eq!(text.duration, 2.0);
        assert_eq!(text.font_size, 60);
        assert_eq!(
            text.font_file,
            PathBuf::from("/usr/share/fonts/TTF/FiraMono-Medium.ttf")
        );
    }

    #[test]
    fn test_kind() {
        let clip: NewClip = NewTextClip::new("0:00:00", "Intro").into();
        assert_eq!(clip.kind(), ClipKind::Text);
        let clip: NewClip = NewImageClip::default().into();
        assert_eq!(clip.kind(), ClipKind::Image);
    }
}
