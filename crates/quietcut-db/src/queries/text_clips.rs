//! Text clip queries.

use std::path::PathBuf;

use quietcut_common::timestamp::timestamp_to_seconds;
use quietcut_common::{ClipId, Error, Result, SourceId, TextClip};
use rusqlite::{Connection, Row};

use super::insert_error;
use crate::models::NewTextClip;

/// Store a text clip of `source_id`.
pub fn create_text_clip(
    conn: &Connection,
    source_id: SourceId,
    clip: &NewTextClip,
) -> Result<TextClip> {
    timestamp_to_seconds(&clip.timestamp)?;
    if clip.duration <= 0.0 {
        return Err(Error::invalid_input(format!(
            "text clip duration must be positive, got {}",
            clip.duration
        )));
    }
    if clip.font_size == 0 {
        return Err(Error::invalid_input("text clip font size must be positive"));
    }

    conn.execute(
        "INSERT INTO text_clips (source_id, timestamp, text, duration, font_file, font_size)
         VALUES (:source_id, :timestamp, :text, :duration, :font_file, :font_size)",
        rusqlite::named_params! {
            ":source_id": source_id.get(),
            ":timestamp": clip.timestamp,
            ":text": clip.text,
            ":duration": clip.duration,
            ":font_file": clip.font_file.to_string_lossy().into_owned(),
            ":font_size": clip.font_size,
        },
    )
    .map_err(|e| insert_error(e, source_id))?;

    Ok(TextClip {
        id: ClipId::from(conn.last_insert_rowid()),
        source_id,
        timestamp: clip.timestamp.clone(),
        text: clip.text.clone(),
        duration: clip.duration,
        font_file: clip.font_file.clone(),
        font_size: clip.font_size,
    })
}

/// List the text clips of a source in insertion order.
pub fn list_text_clips(conn: &Connection, source_id: SourceId) -> Result<Vec<TextClip>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, source_id, timestamp, text, duration, font_file, font_size
             FROM text_clips WHERE source_id = ?1 ORDER BY id",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let clips = stmt
        .query_map([source_id.get()], row_to_text_clip)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(clips)
}

fn row_to_text_clip(row: &Row) -> rusqlite::Result<TextClip> {
    Ok(TextClip {
        id: ClipId::from(row.get::<_, i64>(0)?),
        source_id: SourceId::from(row.get::<_, i64>(1)?),
        timestamp: row.get(2)?,
        text: row.get(3)?,
        duration: row.get(4)?,
        font_file: PathBuf::from(row.get::<_, String>(5)?),
        font_size: row.get(6)?,
    })
}
