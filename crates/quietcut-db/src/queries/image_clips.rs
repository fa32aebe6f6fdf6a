//! Image clip queries.

use std::path::PathBuf;

use quietcut_common::timestamp::timestamp_to_seconds;
use quietcut_common::{ClipId, Error, ImageClip, Result, SourceId};
use rusqlite::{Connection, Row};

use super::insert_error;
use crate::models::NewImageClip;

/// Store an image clip of `source_id`.
pub fn create_image_clip(
    conn: &Connection,
    source_id: SourceId,
    clip: &NewImageClip,
) -> Result<ImageClip> {
    timestamp_to_seconds(&clip.timestamp)?;
    if clip.duration <= 0.0 {
        return Err(Error::invalid_input(format!(
            "image clip duration must be positive, got {}",
            clip.duration
        )));
    }

    conn.execute(
        "INSERT INTO image_clips (source_id, timestamp, duration, input_file)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            source_id.get(),
            clip.timestamp,
            clip.duration,
            clip.input_file.to_string_lossy().into_owned(),
        ],
    )
    .map_err(|e| insert_error(e, source_id))?;

    Ok(ImageClip {
        id: ClipId::from(conn.last_insert_rowid()),
        source_id,
        timestamp: clip.timestamp.clone(),
        duration: clip.duration,
        input_file: clip.input_file.clone(),
    })
}

/// List the image clips of a source in insertion order.
pub fn list_image_clips(conn: &Connection, source_id: SourceId) -> Result<Vec<ImageClip>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, source_id, timestamp, duration, input_file
             FROM image_clips WHERE source_id = ?1 ORDER BY id",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let clips = stmt
        .query_map([source_id.get()], row_to_image_clip)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(clips)
}

fn row_to_image_clip(row: &Row) -> rusqlite::Result<ImageClip> {
    Ok(ImageClip {
        id: ClipId::from(row.get::<_, i64>(0)?),
        source_id: SourceId::from(row.get::<_, i64>(1)?),
        timestamp: row.get(2)?,
        duration: row.get(3)?,
        input_file: PathBuf::from(row.get::<_, String>(4)?),
    })
}
