//! Database query modules.
//!
//! This module organizes all database operations into logical groups:
//! - sources: Probed source videos and their keyframes
//! - video_clips: Segments kept from a source
//! - image_clips: Still images shown over silence
//! - text_clips: Title and chapter cards

pub mod image_clips;
pub mod sources;
pub mod text_clips;
pub mod video_clips;

use quietcut_common::{Error, SourceId};

/// Map an insert failure, reporting a missing parent source as `NotFound`.
pub(crate) fn insert_error(e: rusqlite::Error, source_id: SourceId) -> Error {
    if e.to_string().contains("FOREIGN KEY constraint failed") {
        Error::not_found(format!("source {}", source_id))
    } else {
        Error::database(e.to_string())
    }
}

/// Wrap a column decoding failure so it surfaces from a row mapper.
pub(crate) fn conversion_error<E>(column: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
}
