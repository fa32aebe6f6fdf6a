//! Repository interface over the record store.
//!
//! The pipeline talks to storage only through [`ClipRepository`]. The
//! SQLite implementation writes a whole build in one transaction, so a
//! failed build leaves no partial source behind.

use std::path::Path;

use quietcut_common::{Clip, Error, Result, Source, SourceId, TextClip};

use crate::models::{NewClip, NewSource};
use crate::pool::{get_conn, init_memory_pool, init_pool, DbPool};
use crate::queries::{image_clips, sources, text_clips, video_clips};

/// Storage operations needed by the pipeline stages.
pub trait ClipRepository {
    /// Store a source together with its clips, all or nothing.
    ///
    /// Returns the stored records with their assigned ids, clips in the
    /// order given.
    fn save_build(&self, source: &NewSource, clips: &[NewClip]) -> Result<(Source, Vec<Clip>)>;

    /// All stored sources, oldest first.
    fn sources(&self) -> Result<Vec<Source>>;

    /// Every clip of a source, in storage order (images, texts, videos).
    fn clips(&self, source_id: SourceId) -> Result<Vec<Clip>>;

    /// The text clips of a source, in the order they were stored.
    fn text_clips(&self, source_id: SourceId) -> Result<Vec<TextClip>>;
}

/// [`ClipRepository`] backed by a SQLite file.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    /// Open (or create) the store at `path`, applying pending migrations.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            pool: init_pool(path)?,
        })
    }

    /// Create a fresh store at `path`, replacing any existing file.
    pub fn create(path: &Path) -> Result<Self> {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::info!("Removed existing database {:?}", path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::Io(e)),
        }
        Self::open(path)
    }

    /// Open an existing store, failing if `path` does not exist.
    pub fn open_existing(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::not_found(format!("database {}", path.display())));
        }
        Self::open(path)
    }

    /// A store that lives only as long as the repository.
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            pool: init_memory_pool()?,
        })
    }
}

impl ClipRepository for SqliteRepository {
    fn save_build(&self, source: &NewSource, clips: &[NewClip]) -> Result<(Source, Vec<Clip>)> {
        let mut conn = get_conn(&self.pool)?;
        let tx = conn
            .transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        let stored_source = sources::create_source(&tx, source)?;
        let mut stored = Vec::with_capacity(clips.len());
        for clip in clips {
            let clip = match clip {
                NewClip::Video(c) => {
                    Clip::Video(video_clips::create_video_clip(&tx, stored_source.id, c)?)
                }
                NewClip::Image(c) => {
                    Clip::Image(image_clips::create_image_clip(&tx, stored_source.id, c)?)
                }
                NewClip::Text(c) => {
                    Clip::Text(text_clips::create_text_clip(&tx, stored_source.id, c)?)
                }
            };
            stored.push(clip);
        }

        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::debug!(
            "Stored source {} with {} clips",
            stored_source.id,
            stored.len()
        );

        Ok((stored_source, stored))
    }

    fn sources(&self) -> Result<Vec<Source>> {
        let conn = get_conn(&self.pool)?;
        sources::list_sources(&conn)
    }

    fn clips(&self, source_id: SourceId) -> Result<Vec<Clip>> {
        let conn = get_conn(&self.pool)?;

        let mut clips: Vec<Clip> = image_clips::list_image_clips(&conn, source_id)?
            .into_iter()
            .map(Clip::Image)
            .collect();
        clips.extend(
            text_clips::list_text_clips(&conn, source_id)?
                .into_iter()
                .map(Clip::Text),
        );
        clips.extend(
            video_clips::list_video_clips(&conn, source_id)?
                .into_iter()
                .map(Clip::Video),
        );

        Ok(clips)
    }

    fn text_clips(&self, source_id: SourceId) -> Result<Vec<TextClip>> {
        let conn = get_conn(&self.pool)?;
        text_clips::list_text_clips(&conn, source_id)
    }
}
