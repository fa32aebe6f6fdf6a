//! The source and clip data model.
//!
//! A [`Source`] is one probed input video. It owns any number of clips of
//! three kinds, unified by the [`Clip`] sum type: footage cut from the
//! source ([`VideoClip`]), a looped still ([`ImageClip`]) and a title card
//! ([`TextClip`]). Clips are written once by the build stage and only read
//! afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::timestamp::timestamp_to_seconds;
use crate::{ClipId, ClipKind, Result, SourceId};

/// Default playback speed of a video clip.
pub const DEFAULT_SPEED: f64 = 1.0;
/// Default on-screen time of an image clip, in seconds.
pub const DEFAULT_IMAGE_DURATION: f64 = 3.0;
/// Default image rendered by an image clip.
pub const DEFAULT_IMAGE_FILE: &str = "thumbnail.png";
/// Default on-screen time of a text clip, in seconds.
pub const DEFAULT_TEXT_DURATION: f64 = 2.0;
/// Default font used by text clips.
pub const DEFAULT_FONT_FILE: &str = "/usr/share/fonts/TTF/FiraMono-Medium.ttf";
/// Default font size of text clips.
pub const DEFAULT_FONT_SIZE: u32 = 60;

/// A probed source video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    pub id: SourceId,
    pub path: PathBuf,
    /// Optional trim window start, as a timestamp.
    pub window_start: Option<String>,
    /// Optional trim window end, as a timestamp.
    pub window_end: Option<String>,
    /// Full duration in seconds.
    pub duration: f64,
    /// Audio sample rate in Hz.
    pub audio_rate: u32,
    /// Keyframe presentation times in seconds, ascending.
    pub keyframes: Vec<f64>,
    pub created_at: DateTime<Utc>,
}

/// A segment of the source video kept in the output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoClip {
    pub id: ClipId,
    pub source_id: SourceId,
    pub start: String,
    pub end: String,
    /// Playback speed. Only shortens the output duration; the video stream
    /// itself is not retimed.
    pub speed: f64,
}

impl VideoClip {
    /// Length of the segment in source seconds.
    pub fn duration(&self) -> Result<f64> {
        Ok(timestamp_to_seconds(&self.end)? - timestamp_to_seconds(&self.start)?)
    }
}

/// A still image shown over silent audio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageClip {
    pub id: ClipId,
    pub source_id: SourceId,
    pub timestamp: String,
    pub duration: f64,
    pub input_file: PathBuf,
}

/// A centred line of text on a solid background.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextClip {
    pub id: ClipId,
    pub source_id: SourceId,
    pub timestamp: String,
    pub text: String,
    pub duration: f64,
    pub font_file: PathBuf,
    pub font_size: u32,
}

/// Any clip that ends up in the rendered timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Clip {
    Video(VideoClip),
    Image(ImageClip),
    Text(TextClip),
}

impl Clip {
    pub fn kind(&self) -> ClipKind {
        match self {
            Self::Video(_) => ClipKind::Video,
            Self::Image(_) => ClipKind::Image,
            Self::Text(_) => ClipKind::Text,
        }
    }

    pub fn id(&self) -> ClipId {
        match self {
            Self::Video(c) => c.id,
            Self::Image(c) => c.id,
            Self::Text(c) => c.id,
        }
    }

    pub fn source_id(&self) -> SourceId {
        match self {
            Self::Video(c) => c.source_id,
            Self::Image(c) => c.source_id,
            Self::Text(c) => c.source_id,
        }
    }

    /// Position of the clip in the source timeline. For video clips this is
    /// the segment start.
    pub fn timestamp(&self) -> &str {
        match self {
            Self::Video(c) => &c.start,
            Self::Image(c) => &c.timestamp,
            Self::Text(c) => &c.timestamp,
        }
    }

    pub fn timestamp_seconds(&self) -> Result<f64> {
        timestamp_to_seconds(self.timestamp())
    }

    /// On-screen duration in seconds.
    pub fn duration(&self) -> Result<f64> {
        match self {
            Self::Video(c) => c.duration(),
            Self::Image(c) => Ok(c.duration),
            Self::Text(c) => Ok(c.duration),
        }
    }

    /// Deterministic output file name, e.g. `videoclip_0007.mkv`.
    ///
    /// # Examples
    ///
    /// ```
    /// use quietcut_common::{Clip, ClipId, SourceId, VideoClip};
    ///
    /// let clip = Clip::Video(VideoClip {
    ///     id: ClipId::from(7),
    ///     source_id: SourceId::from(1),
    ///     start: "00:00:01.000000".into(),
    ///     end: "00:00:02.000000".into(),
    ///     speed: 1.0,
    /// });
    /// assert_eq!(clip.output_file_name(), "videoclip_0007.mkv");
    /// ```
    pub fn output_file_name(&self) -> String {
        format!("{}_{:04}.mkv", self.kind().file_prefix(), self.id().get())
    }
}

/// Sort clips into playback order.
///
/// Clips are ordered by timestamp; ties go image, text, video and then by id.
///
/// # Errors
///
/// Fails if any clip carries an unparseable timestamp.
pub fn timeline_order(clips: Vec<Clip>) -> Result<Vec<Clip>> {
    let mut keyed = clips
        .into_iter()
        .map(|clip| Ok((clip.timestamp_seconds()?, clip)))
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by(|(a_ts, a), (b_ts, b)| {
        a_ts.total_cmp(b_ts)
            .then(a.kind().cmp(&b.kind()))
            .then(a.id().cmp(&b.id()))
    });

    Ok(keyed.into_iter().map(|(_, clip)| clip).collect())
}
