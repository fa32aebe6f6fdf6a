//! Locations derived from an input video or its record store.
//!
//! A source `talk.mp4` is recorded in `talk.db`, and its clips are rendered
//! under `talk/clips/` next to a `talk/list.txt` manifest.

use std::path::{Path, PathBuf};

/// Directory (relative to the output root) that receives rendered clips.
pub const CLIPS_DIR: &str = "clips";

/// File name of the concat manifest written into the output root.
pub const MANIFEST_FILE: &str = "list.txt";

/// Record store path for an input video: the same path with a `.db` extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use quietcut_common::paths::database_path;
///
/// assert_eq!(database_path(Path::new("/videos/talk.mp4")), Path::new("/videos/talk.db"));
/// ```
pub fn database_path(input: &Path) -> PathBuf {
    input.with_extension("db")
}

/// Default output root for a record store: the store path without extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use quietcut_common::paths::output_root;
///
/// assert_eq!(output_root(Path::new("/videos/talk.db")), Path::new("/videos/talk"));
/// ```
pub fn output_root(database: &Path) -> PathBuf {
    database.with_extension("")
}
