//! Keyframe discovery with ffprobe.

use std::path::Path;

use crate::{Error, Result, ToolCommand};

const TOOL: &str = "ffprobe";

/// Build the ffprobe invocation listing `pts_time,flags` for every packet of
/// the first video stream.
pub fn keyframes_command(ffprobe: &Path, input: &Path) -> ToolCommand {
    let mut cmd = ToolCommand::new(ffprobe);
    cmd.args([
        "-loglevel",
        "error",
        "-select_streams",
        "v:0",
        "-show_entries",
        "packet=pts_time,flags",
        "-of",
        "csv=print_section=0",
    ])
    .arg(input);
    cmd
}

/// Probe the keyframe times of `input`, in ascending order.
///
/// # Errors
///
/// Fails if ffprobe cannot be run or its output cannot be parsed.
pub fn probe_keyframes(ffprobe: &Path, input: &Path) -> Result<Vec<f64>> {
    #[cfg(feature = "tracing")]
    tracing::info!("Probing keyframes of {:?}", input);

    let output = keyframes_command(ffprobe, input).execute()?;
    let keyframes = parse_keyframes(&output.stdout)?;

    #[cfg(feature = "tracing")]
    tracing::debug!("Found {} keyframes", keyframes.len());

    Ok(keyframes)
}

/// Parse ffprobe's `pts_time,flags` rows, keeping keyframe packets.
///
/// Packets without a timestamp (`N/A`) are skipped. The result is sorted
/// because packets arrive in decode order.
///
/// # Errors
///
/// Returns [`Error::ParseError`] on a keyframe row whose time is not a
/// number.
pub fn parse_keyframes(output: &str) -> Result<Vec<f64>> {
    let mut keyframes = Vec::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (pts, flags) = line.split_once(',').unwrap_or((line, ""));
        if !flags.contains('K') || pts == "N/A" {
            continue;
        }

        let time: f64 = pts
            .parse()
            .map_err(|_| Error::parse_error(TOOL, format!("bad packet time {pts:?}")))?;
        keyframes.push(time);
    }

    keyframes.sort_by(f64::total_cmp);
    Ok(keyframes)
}
