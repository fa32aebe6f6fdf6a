//! # quietcut-av
//!
//! ffmpeg plumbing for silence-based trimming.
//!
//! This crate provides functionality for:
//! - Detecting silences and deriving the audible intervals to keep
//! - Probing keyframe positions with ffprobe
//! - Resolving keyframe-aligned seeks
//! - Building the ffmpeg invocation that renders each clip
//!
//! Tools are always invoked with structured argument lists, never through a
//! shell.
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use quietcut_av::silence::{detect_silence, keep_segments, SilenceDetectConfig, TrimWindow};
//! use std::path::Path;
//!
//! let config = SilenceDetectConfig::default();
//! let report = detect_silence(Path::new("ffmpeg"), Path::new("talk.mp4"), &config)?;
//! let intervals = report.audible_intervals()?;
//! let segments = keep_segments(
//!     &intervals,
//!     TrimWindow::default(),
//!     report.total_duration,
//!     config.min_duration,
//! );
//! println!("keeping {} segments", segments.len());
//! # Ok::<(), quietcut_av::Error>(())
//! ```

pub mod command;
mod error;
pub mod keyframes;
pub mod render;
pub mod seek;
pub mod silence;
pub mod tools;
pub mod workspace;

// Re-exports
pub use command::{ToolCommand, ToolOutput};
pub use error::{Error, Result};
pub use keyframes::probe_keyframes;
pub use render::{ClipRenderer, RenderSettings};
pub use seek::{resolve_seek, SeekPoint};
pub use silence::{detect_silence, Interval, Segment, SilenceDetectConfig, SilenceReport, TrimWindow};
pub use tools::{check_tool, check_tools, get_tool_path, require_tool, ToolInfo};
pub use workspace::ClipWorkspace;
