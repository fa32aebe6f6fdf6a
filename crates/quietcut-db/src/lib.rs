//! Quietcut-DB: Database schema, migrations, and query operations
//!
//! This crate provides the record store of quietcut: one SQLite file per
//! source video, holding the source and the clips derived from it. It uses
//! rusqlite with r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Insert models for new records
//! - `queries` - Per-table query operations
//! - `repository` - The storage interface used by the pipeline
//!
//! # Example
//!
//! ```no_run
//! use quietcut_db::models::{NewClip, NewSource, NewVideoClip};
//! use quietcut_db::{ClipRepository, SqliteRepository};
//! use std::path::Path;
//!
//! let repo = SqliteRepository::create(Path::new("/videos/talk.db")).unwrap();
//! let source = NewSource {
//!     path: "/videos/talk.mp4".into(),
//!     window_start: None,
//!     window_end: None,
//!     duration: 20.0,
//!     audio_rate: 48000,
//!     keyframes: vec![0.0, 5.0],
//! };
//! let clips = vec![NewClip::from(NewVideoClip::new("00:00:00.000000", "00:00:05.249000"))];
//! let (source, clips) = repo.save_build(&source, &clips).unwrap();
//! println!("Stored {} clips for source {}", clips.len(), source.id);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod repository;

pub use repository::{ClipRepository, SqliteRepository};
