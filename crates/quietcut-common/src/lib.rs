//! Quietcut-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across quietcut:
//!
//! - **Typed IDs**: Integer newtypes for sources and clips
//! - **Clip model**: Sources and the three clip variants that get rendered
//! - **Timestamps**: Conversion between seconds and `HH:MM:SS.ffffff`
//! - **Path Utilities**: Locations derived from an input video
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use quietcut_common::timestamp::{seconds_to_timestamp, timestamp_to_seconds};
//!
//! assert_eq!(seconds_to_timestamp(3723.5), "01:02:03.500000");
//! assert_eq!(timestamp_to_seconds("01:02:03.5").unwrap(), 3723.5);
//! ```

pub mod clip;
pub mod error;
pub mod ids;
pub mod paths;
pub mod timestamp;
pub mod types;

pub use clip::{Clip, ImageClip, Source, TextClip, VideoClip};
pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
