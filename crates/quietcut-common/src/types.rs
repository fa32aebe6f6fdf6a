//! Core type definitions shared by the clip model and storage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of rendered clip.
///
/// The declaration order is the tie-break used when two clips share a
/// timestamp: a title image comes before a chapter card, which comes before
/// the footage it introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    /// A still image looped over silent audio.
    Image,
    /// A text card rendered on a solid background.
    Text,
    /// A segment cut from the source video.
    Video,
}

impl ClipKind {
    /// Prefix used for rendered file names, e.g. `videoclip`.
    #[must_use]
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::Image => "imageclip",
            Self::Text => "textclip",
            Self::Video => "videoclip",
        }
    }
}

impl fmt::Display for ClipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Text => write!(f, "text"),
            Self::Video => write!(f, "video"),
        }
    }
}
