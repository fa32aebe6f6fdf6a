//! Source video queries.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use quietcut_common::timestamp::timestamp_to_seconds;
use quietcut_common::{Error, Result, Source, SourceId};
use rusqlite::{Connection, Row};

use super::conversion_error;
use crate::models::NewSource;

const COLUMNS: &str =
    "id, path, window_start, window_end, duration, audio_rate, keyframes, created_at";

/// Store a probed source.
///
/// Keyframes are kept as a JSON array.
///
/// # Errors
///
/// Returns [`Error::Format`] if a window timestamp is malformed, and
/// [`Error::InvalidInput`] if the keyframes are not ascending.
pub fn create_source(conn: &Connection, source: &NewSource) -> Result<Source> {
    for ts in [&source.window_start, &source.window_end].into_iter().flatten() {
        timestamp_to_seconds(ts)?;
    }
    if source.keyframes.windows(2).any(|w| w[0] > w[1]) {
        return Err(Error::invalid_input("keyframes must be in ascending order"));
    }

    let keyframes = serde_json::to_string(&source.keyframes)
        .map_err(|e| Error::internal(format!("Failed to encode keyframes: {}", e)))?;
    let created_at = Utc::now();

    conn.execute(
        "INSERT INTO sources (path, window_start, window_end, duration, audio_rate, keyframes, created_at)
         VALUES (:path, :window_start, :window_end, :duration, :audio_rate, :keyframes, :created_at)",
        rusqlite::named_params! {
            ":path": source.path.to_string_lossy().into_owned(),
            ":window_start": source.window_start,
            ":window_end": source.window_end,
            ":duration": source.duration,
            ":audio_rate": source.audio_rate,
            ":keyframes": keyframes,
            ":created_at": created_at.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Source {
        id: SourceId::from(conn.last_insert_rowid()),
        path: source.path.clone(),
        window_start: source.window_start.clone(),
        window_end: source.window_end.clone(),
        duration: source.duration,
        audio_rate: source.audio_rate,
        keyframes: source.keyframes.clone(),
        created_at,
    })
}

/// List all sources in insertion order.
pub fn list_sources(conn: &Connection) -> Result<Vec<Source>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {} FROM sources ORDER BY id", COLUMNS))
        .map_err(|e| Error::database(e.to_string()))?;

    let sources = stmt
        .query_map([], row_to_source)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(sources)
}

fn row_to_source(row: &Row) -> rusqlite::Result<Source> {
    let keyframes: String = row.get(6)?;
    let created_at: String = row.get(7)?;

    Ok(Source {
        id: SourceId::from(row.get::<_, i64>(0)?),
        path: PathBuf::from(row.get::<_, String>(1)?),
        window_start: row.get(2)?,
        window_end: row.get(3)?,
        duration: row.get(4)?,
        audio_rate: row.get(5)?,
        keyframes: serde_json::from_str(&keyframes).map_err(|e| conversion_error(6, e))?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| conversion_error(7, e))?
            .with_timezone(&Utc),
    })
}
