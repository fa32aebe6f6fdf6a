//! Keyframe-aligned seeking.
//!
//! An input seek (`-ss` before `-i`) jumps straight to a keyframe, which is
//! fast but coarse. An output seek (`-ss` after `-i`) is frame accurate but
//! decodes everything before it. Cutting a clip combines both: a coarse seek
//! to just before the keyframe preceding the target, then a short fine seek
//! covering the remainder.

use crate::{Error, Result};

/// How far before the preceding keyframe the coarse seek lands, in seconds.
pub const KEYFRAME_BACKOFF: f64 = 1.0;

/// A two-stage seek to a target time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekPoint {
    /// The keyframe at or before the target.
    pub keyframe: f64,
    /// Input seek position, [`KEYFRAME_BACKOFF`] before `keyframe` and never
    /// below zero.
    pub coarse: f64,
    /// Output seek applied after the coarse one; `coarse + fine == target`.
    pub fine: f64,
}

/// Resolve the seek for `target` against ascending `keyframes`.
///
/// The preceding keyframe is the last one at or before `target`, so a
/// target sitting exactly on a keyframe uses that keyframe.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if `target` precedes the first keyframe or
/// there are no keyframes at all.
///
/// # Example
///
/// ```
/// use quietcut_av::seek::resolve_seek;
///
/// let seek = resolve_seek(&[0.0, 5.0, 10.0, 15.0], 12.0)?;
/// assert_eq!(seek.keyframe, 10.0);
/// assert_eq!(seek.coarse, 9.0);
/// assert_eq!(seek.fine, 3.0);
/// # Ok::<(), quietcut_av::Error>(())
/// ```
pub fn resolve_seek(keyframes: &[f64], target: f64) -> Result<SeekPoint> {
    let insertion = keyframes.partition_point(|&k| k <= target);
    if insertion == 0 {
        return Err(Error::OutOfRange {
            target,
            first_keyframe: keyframes.first().copied(),
        });
    }

    let keyframe = keyframes[insertion - 1];
    let coarse = (keyframe - KEYFRAME_BACKOFF).max(0.0);

    Ok(SeekPoint {
        keyframe,
        coarse,
        fine: target - coarse,
    })
}
