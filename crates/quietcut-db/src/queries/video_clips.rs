//! Video clip queries.

use quietcut_common::timestamp::timestamp_to_seconds;
use quietcut_common::{ClipId, Error, Result, SourceId, VideoClip};
use rusqlite::{Connection, Row};

use super::insert_error;
use crate::models::NewVideoClip;

/// Store a segment of `source_id`.
///
/// # Errors
///
/// Returns [`Error::Format`] for malformed timestamps,
/// [`Error::InvalidInput`] if the segment is empty or the speed is not
/// positive, and [`Error::NotFound`] if the source does not exist.
pub fn create_video_clip(
    conn: &Connection,
    source_id: SourceId,
    clip: &NewVideoClip,
) -> Result<VideoClip> {
    let start = timestamp_to_seconds(&clip.start)?;
    let end = timestamp_to_seconds(&clip.end)?;
    if end <= start {
        return Err(Error::invalid_input(format!(
            "video clip ends at {} before it starts at {}",
            clip.end, clip.start
        )));
    }
    if clip.speed <= 0.0 {
        return Err(Error::invalid_input(format!(
            "video clip speed must be positive, got {}",
            clip.speed
        )));
    }

    conn.execute(
        "INSERT INTO video_clips (source_id, start_time, end_time, speed)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![source_id.get(), clip.start, clip.end, clip.speed],
    )
    .map_err(|e| insert_error(e, source_id))?;

    Ok(VideoClip {
        id: ClipId::from(conn.last_insert_rowid()),
        source_id,
        start: clip.start.clone(),
        end: clip.end.clone(),
        speed: clip.speed,
    })
}

/// List the video clips of a source in insertion order.
pub fn list_video_clips(conn: &Connection, source_id: SourceId) -> Result<Vec<VideoClip>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, source_id, start_time, end_time, speed
             FROM video_clips WHERE source_id = ?1 ORDER BY id",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let clips = stmt
        .query_map([source_id.get()], row_to_video_clip)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(clips)
}

fn row_to_video_clip(row: &Row) -> rusqlite::Result<VideoClip> {
    Ok(VideoClip {
        id: ClipId::from(row.get::<_, i64>(0)?),
        source_id: SourceId::from(row.get::<_, i64>(1)?),
        start: row.get(2)?,
        end: row.get(3)?,
        speed: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::{conn, source};

    #[test]
    fn test_create_and_list() {
        let conn = conn();
        let source = source(&conn);

        let first = create_video_clip(
            &conn,
            source.id,
            &NewVideoClip::new("00:00:00.000000", "00:00:05.249000"),
        )
        .unwrap();
        let second = create_video_clip(
            &conn,
            source.id,
            &NewVideoClip::new("00:00:05.751000", "00:00:20.000000"),
        )
        .unwrap();

        let clips = list_video_clips(&conn, source.id).unwrap();
        assert_eq!(clips, vec![first, second]);
        assert_eq!(clips[0].speed, 1.0);
        assert!((clips[0].duration().unwrap() - 5.249).abs() < 1e-9);
    }

    #[test]
    fn test_missing_source() {
        let conn = conn();
        let err = create_video_clip(
            &conn,
            SourceId::from(9),
            &NewVideoClip::new("0:00:00", "0:00:01"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_rejects_bad_segments() {
        let conn = conn();
        let source = source(&conn);

        let err = create_video_clip(&conn, source.id, &NewVideoClip::new("0:00:05", "0:00:05"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = create_video_clip(&conn, source.id, &NewVideoClip::new("5", "0:00:06"))
            .unwrap_err();
        assert!(matches!(err, Error::Format { .. }));

        let mut clip = NewVideoClip::new("0:00:01", "0:00:02");
        clip.speed = 0.0;
        let err = create_video_clip(&conn, source.id, &clip).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_cascade_on_source_delete() {
        let conn = conn();
        let source = source(&conn);
        create_video_clip(&conn, source.id, &NewVideoClip::new("0:00:00", "0:00:01")).unwrap();

        conn.execute("DELETE FROM sources WHERE id = ?1", [source.id.get()])
            .unwrap();
        assert!(list_video_clips(&conn, source.id).unwrap().is_empty());
    }
}
