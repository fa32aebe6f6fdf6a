//! Chapter listings.
//!
//! A chapter is a text clip placed on the trimmed timeline. Its offset is
//! the length of everything that plays before it.

use std::fmt;
use std::io::Write;

use anyhow::Result;
use quietcut_common::timestamp::{seconds_to_timestamp, timestamp_to_seconds};
use quietcut_common::{Clip, SourceId, TextClip};
use quietcut_db::ClipRepository;

/// A chapter title and its offset in the rendered output.
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub offset: f64,
    pub text: String,
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "⌨️ ({}) {}", seconds_to_timestamp(self.offset), self.text)
    }
}

/// Compute one chapter per text clip.
///
/// A chapter's offset is the summed duration of every clip in `clips` whose
/// timestamp is strictly earlier than the text clip's own.
pub fn chapters(clips: &[Clip], texts: &[TextClip]) -> Result<Vec<Chapter>> {
    let mut timed = Vec::with_capacity(clips.len());
    for clip in clips {
        timed.push((clip.timestamp_seconds()?, clip.duration()?));
    }

    let mut chapters = Vec::with_capacity(texts.len());
    for text in texts {
        let at = timestamp_to_seconds(&text.timestamp)?;
        let offset: f64 = timed
            .iter()
            .filter(|(timestamp, _)| *timestamp < at)
            .map(|(_, duration)| duration)
            .sum();
        chapters.push(Chapter {
            offset,
            text: text.text.clone(),
        });
    }

    Ok(chapters)
}

/// Chapters of one stored source, in ToC order.
pub fn chapters_from_store<R: ClipRepository>(repo: &R, source_id: SourceId) -> Result<Vec<Chapter>> {
    let clips = repo.clips(source_id)?;
    let texts = repo.text_clips(source_id)?;
    chapters(&clips, &texts)
}

/// Write one chapter per line.
pub fn write_chapters(out: &mut dyn Write, chapters: &[Chapter]) -> Result<()> {
    for chapter in chapters {
        writeln!(out, "{}", chapter)?;
    }
    out.flush()?;
    Ok(())
}
