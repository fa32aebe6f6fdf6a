//! The three stages of a trim: build the record store, list chapters, and
//! render clips.

pub mod build;
pub mod render;
pub mod toc;

pub use build::{build_database, plan_build, BuildOptions, BuildOutcome, BuildPlan, BuildSummary};
pub use render::{render_clips, RenderOptions, RenderOutcome};
pub use toc::{chapters_from_store, Chapter};

use anyhow::{Context, Result};
use quietcut_av::get_tool_path;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::ToolsConfig;

/// Locate a tool, honoring the configured path.
///
/// When `required` is false a missing tool falls back to its configured path
/// or bare name, so commands can still be printed.
pub fn tool_path(name: &str, configured: Option<&Path>, required: bool) -> Result<PathBuf> {
    match get_tool_path(name, configured) {
        Ok(path) => Ok(path),
        Err(_) if !required => {
            tracing::warn!("{} not found, printing commands with a bare name", name);
            Ok(configured.map_or_else(|| PathBuf::from(name), Path::to_path_buf))
        }
        Err(e) => Err(e).with_context(|| format!("{} is required", name)),
    }
}

/// Resolved locations of ffmpeg and ffprobe.
#[derive(Debug, Clone)]
pub struct Tools {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Tools {
    /// Resolve both tools, failing if either is missing.
    pub fn resolve(config: &ToolsConfig) -> Result<Self> {
        Ok(Self {
            ffmpeg: tool_path("ffmpeg", config.ffmpeg_path.as_deref(), true)?,
            ffprobe: tool_path("ffprobe", config.ffprobe_path.as_deref(), true)?,
        })
    }
}

/// Open the destination of chapter listings: a file, or stdout for `-` or
/// `None`.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if p != Path::new("-") => {
            let file = std::fs::File::create(p)
                .with_context(|| format!("Failed to create output file: {:?}", p))?;
            Ok(Box::new(std::io::BufWriter::new(file)))
        }
        _ => Ok(Box::new(std::io::stdout().lock())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_path_optional_fallback() {
        let path = tool_path("nonexistent_tool_12345", None, false).unwrap();
        assert_eq!(path, PathBuf::from("nonexistent_tool_12345"));

        let configured = Path::new("/nonexistent/bin/ffmpeg");
        let path = tool_path("nonexistent_tool_12345", Some(configured), false).unwrap();
        assert_eq!(path, configured);
    }

    #[test]
    fn test_tool_path_required() {
        assert!(tool_path("nonexistent_tool_12345", None, true).is_err());
    }

    #[test]
    fn test_open_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toc.txt");
        {
            let mut out = open_output(Some(&path)).unwrap();
            writeln!(out, "chapter").unwrap();
        }
        assert_eq!(std::fs::read_to_string(path).unwrap(), "chapter\n");
    }
}
