//! Silence detection and derivation of the audible intervals to keep.
//!
//! ffmpeg's `silencedetect` filter reports silent stretches on stderr as
//! `silence_start: <t>` / `silence_end: <t>` lines. The audible intervals
//! are the gaps between them. Each kept interval is then widened by half the
//! minimum silence duration, recovering the audio the detector swallowed at
//! both edges of every silence.

use std::path::Path;

use crate::{Error, Result, ToolCommand};

const TOOL: &str = "ffmpeg";

/// Margin subtracted from the padding so neighbouring clips never touch.
const PAD_MARGIN: f64 = 0.001;

macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).expect("valid regex literal"))
    }};
}

/// Parameters of the `silencedetect` filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceDetectConfig {
    /// Noise floor in dB; quieter audio counts as silence.
    pub threshold_db: f64,
    /// Minimum length of a silence, in seconds.
    pub min_duration: f64,
}

impl Default for SilenceDetectConfig {
    fn default() -> Self {
        Self {
            threshold_db: -26.0,
            min_duration: 0.5,
        }
    }
}

/// Everything extracted from one `silencedetect` run.
#[derive(Debug, Clone, PartialEq)]
pub struct SilenceReport {
    /// Total duration of the input, in seconds.
    pub total_duration: f64,
    /// Audio sample rate in Hz.
    pub audio_rate: u32,
    /// Silence start times, rounded to milliseconds, in stream order.
    pub silence_starts: Vec<f64>,
    /// Silence end times, rounded to milliseconds, in stream order.
    pub silence_ends: Vec<f64>,
}

/// A time range in seconds with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Optional bounds restricting which part of the source is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrimWindow {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

/// A kept interval before and after padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// The audible interval exactly as detected.
    pub audible: Interval,
    /// The interval that gets cut from the source.
    pub padded: Interval,
}

/// Build the ffmpeg invocation that runs silence detection on `input`.
pub fn silencedetect_command(
    ffmpeg: &Path,
    input: &Path,
    config: &SilenceDetectConfig,
) -> ToolCommand {
    let mut cmd = ToolCommand::new(ffmpeg);
    cmd.args(["-hide_banner", "-vn", "-i"])
        .arg(input)
        .arg("-af")
        .arg(format!(
            "silencedetect=noise={}dB:duration={}",
            config.threshold_db, config.min_duration
        ))
        .args(["-f", "null", "-"]);
    cmd
}

/// Run silence detection on `input` and parse the result.
///
/// # Errors
///
/// Fails if ffmpeg cannot be run or exits unsuccessfully, or if its output
/// lacks the duration or audio sample rate.
pub fn detect_silence(
    ffmpeg: &Path,
    input: &Path,
    config: &SilenceDetectConfig,
) -> Result<SilenceReport> {
    #[cfg(feature = "tracing")]
    tracing::info!(
        "Detecting silence in {:?} (noise {} dB, min {} s)",
        input,
        config.threshold_db,
        config.min_duration
    );

    let output = silencedetect_command(ffmpeg, input, config).execute()?;
    let report = parse_silencedetect(&output.stderr)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Found {} silences in {:.3}s of audio at {} Hz",
        report.silence_starts.len(),
        report.total_duration,
        report.audio_rate
    );

    Ok(report)
}

/// Parse the diagnostic output of a `silencedetect` run.
///
/// # Errors
///
/// Returns [`Error::ParseError`] if the `Duration:` or audio sample rate
/// announcement is missing.
pub fn parse_silencedetect(stderr: &str) -> Result<SilenceReport> {
    let audio_rate = regex!(r"Audio: [^,]*, (\d+) Hz")
        .captures(stderr)
        .and_then(|c| c[1].parse::<u32>().ok())
        .ok_or_else(|| Error::parse_error(TOOL, "audio sample rate not found"))?;

    let total_duration = regex!(r"Duration: (\d+):(\d{2}):(\d{2}(?:\.\d+)?)")
        .captures(stderr)
        .and_then(|c| {
            let hours: f64 = c[1].parse().ok()?;
            let minutes: f64 = c[2].parse().ok()?;
            let seconds: f64 = c[3].parse().ok()?;
            Some(hours * 3600.0 + minutes * 60.0 + seconds)
        })
        .ok_or_else(|| Error::parse_error(TOOL, "duration not found"))?;

    let mut silence_starts = Vec::new();
    let mut silence_ends = Vec::new();
    for caps in regex!(r"(silence_start|silence_end): (-?\d+(?:\.\d*)?)").captures_iter(stderr) {
        let value: f64 = caps[2]
            .parse()
            .map_err(|_| Error::parse_error(TOOL, format!("bad timestamp {:?}", &caps[2])))?;
        let value = round_millis(value.max(0.0));

        if &caps[1] == "silence_start" {
            silence_starts.push(value);
        } else {
            silence_ends.push(value);
        }
    }

    Ok(SilenceReport {
        total_duration,
        audio_rate,
        silence_starts,
        silence_ends,
    })
}

fn round_millis(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl SilenceReport {
    /// The audible intervals between the detected silences.
    ///
    /// Audio is taken to be audible from t=0 and silent after the end of the
    /// stream, so with no silences at all the whole input is one interval.
    /// A silence still open at the end of the stream simply ends the last
    /// interval.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the start and end markers cannot be
    /// paired up.
    pub fn audible_intervals(&self) -> Result<Vec<Interval>> {
        let mut starts = Vec::with_capacity(self.silence_ends.len() + 1);
        starts.push(0.0);
        starts.extend_from_slice(&self.silence_ends);

        let mut ends = self.silence_starts.clone();
        if ends.len() == self.silence_ends.len() {
            ends.push(self.total_duration);
        } else if ends.len() != starts.len() {
            return Err(Error::parse_error(
                TOOL,
                format!(
                    "{} silence starts do not pair with {} silence ends",
                    self.silence_starts.len(),
                    self.silence_ends.len()
                ),
            ));
        }

        Ok(starts
            .into_iter()
            .zip(ends)
            .map(|(start, end)| Interval { start, end })
            .filter(|i| i.start < i.end)
            .collect())
    }
}

/// Apply the trim window to `intervals` and pad what remains.
///
/// Intervals starting at or before the window start, or ending at or after
/// the window end, are dropped entirely. Every kept interval is widened by
/// `min_silence / 2 - 0.001` on both sides, clamped to the window (or to
/// `[0, total_duration]` when no window is set).
pub fn keep_segments(
    intervals: &[Interval],
    window: TrimWindow,
    total_duration: f64,
    min_silence: f64,
) -> Vec<Segment> {
    let pad = min_silence / 2.0 - PAD_MARGIN;
    let lower = window.start.unwrap_or(0.0);
    let upper = window.end.unwrap_or(total_duration);

    intervals
        .iter()
        .filter(|i| window.start.map_or(true, |start| i.start > start))
        .filter(|i| window.end.map_or(true, |end| i.end < end))
        .map(|i| Segment {
            audible: *i,
            padded: Interval {
                start: (i.start - pad).max(lower),
                end: (i.end + pad).min(upper),
            },
        })
        .filter(|s| s.padded.start < s.padded.end)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const HEADER: &str = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'talk.mp4':
  Duration: 00:00:20.00, start: 0.000000, bitrate: 1205 kb/s
  Stream #0:0[0x1](und): Video: h264 (High) (avc1 / 0x31637661), yuv420p, 1920x1080, 1070 kb/s, 30 fps
  Stream #0:1[0x2](und): Audio: aac (LC) (mp4a / 0x6134706D), 48000 Hz, stereo, fltp, 128 kb/s
";

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn parses_duration_rate_and_markers() {
        let stderr = format!(
            "{HEADER}[silencedetect @ 0x1] silence_start: 5.00049\n\
             [silencedetect @ 0x1] silence_end: 6 | silence_duration: 0.99951\n\
             size=N/A time=00:00:20.00 bitrate=N/A speed= 500x\n"
        );

        let report = parse_silencedetect(&stderr).unwrap();
        assert_eq!(report.audio_rate, 48000);
        assert_close(report.total_duration, 20.0);
        assert_eq!(report.silence_starts, vec![5.0]);
        assert_eq!(report.silence_ends, vec![6.0]);
    }

    #[test]
    fn long_duration_is_parsed() {
        let stderr = HEADER.replace("00:00:20.00", "01:02:03.50");
        let report = parse_silencedetect(&stderr).unwrap();
        assert_close(report.total_duration, 3723.5);
    }

    #[test]
    fn missing_duration_is_a_parse_error() {
        let stderr = HEADER.replace("Duration: 00:00:20.00", "Duration: N/A");
        assert_matches!(
            parse_silencedetect(&stderr),
            Err(Error::ParseError { message, .. }) if message.contains("duration")
        );
    }

    #[test]
    fn missing_audio_rate_is_a_parse_error() {
        let stderr = HEADER.replace("48000 Hz", "stereo");
        assert_matches!(
            parse_silencedetect(&stderr),
            Err(Error::ParseError { message, .. }) if message.contains("sample rate")
        );
    }

    #[test]
    fn negative_silence_start_clamps_to_zero() {
        let stderr = format!("{HEADER}silence_start: -0.0213\nsilence_end: 1.5\n");
        let report = parse_silencedetect(&stderr).unwrap();
        assert_eq!(report.silence_starts, vec![0.0]);
    }

    #[test]
    fn no_silence_yields_whole_input() {
        let report = SilenceReport {
            total_duration: 10.0,
            audio_rate: 44100,
            silence_starts: vec![],
            silence_ends: vec![],
        };

        let intervals = report.audible_intervals().unwrap();
        assert_eq!(
            intervals,
            vec![Interval {
                start: 0.0,
                end: 10.0
            }]
        );
    }

    #[test]
    fn one_silence_splits_into_two_intervals() {
        let report = SilenceReport {
            total_duration: 20.0,
            audio_rate: 48000,
            silence_starts: vec![5.0],
            silence_ends: vec![6.0],
        };

        let intervals = report.audible_intervals().unwrap();
        assert_eq!(
            intervals,
            vec![
                Interval { start: 0.0, end: 5.0 },
                Interval { start: 6.0, end: 20.0 },
            ]
        );
        assert_close(intervals[1].duration(), 14.0);
    }

    #[test]
    fn silence_running_to_the_end_closes_last_interval() {
        let report = SilenceReport {
            total_duration: 20.0,
            audio_rate: 48000,
            silence_starts: vec![5.0, 18.0],
            silence_ends: vec![6.0],
        };

        let intervals = report.audible_intervals().unwrap();
        assert_eq!(
            intervals,
            vec![
                Interval { start: 0.0, end: 5.0 },
                Interval { start: 6.0, end: 18.0 },
            ]
        );
    }

    #[test]
    fn leading_silence_drops_empty_interval() {
        let report = SilenceReport {
            total_duration: 20.0,
            audio_rate: 48000,
            silence_starts: vec![0.0],
            silence_ends: vec![2.0],
        };

        let intervals = report.audible_intervals().unwrap();
        assert_eq!(intervals, vec![Interval { start: 2.0, end: 20.0 }]);
    }

    #[test]
    fn unpaired_markers_are_rejected() {
        let report = SilenceReport {
            total_duration: 20.0,
            audio_rate: 48000,
            silence_starts: vec![5.0],
            silence_ends: vec![6.0, 7.0, 8.0],
        };
        assert_matches!(report.audible_intervals(), Err(Error::ParseError { .. }));
    }

    #[test]
    fn padding_is_clamped_to_bounds() {
        let intervals = [
            Interval { start: 0.0, end: 5.0 },
            Interval { start: 6.0, end: 20.0 },
        ];

        let segments = keep_segments(&intervals, TrimWindow::default(), 20.0, 0.5);
        assert_eq!(segments.len(), 2);

        assert_close(segments[0].padded.start, 0.0);
        assert_close(segments[0].padded.end, 5.249);
        assert_close(segments[1].padded.start, 5.751);
        assert_close(segments[1].padded.end, 20.0);

        assert_eq!(segments[0].audible, intervals[0]);
        assert_eq!(segments[1].audible, intervals[1]);
    }

    #[test]
    fn window_start_drops_intervals_instead_of_trimming() {
        let intervals = [
            Interval { start: 0.0, end: 5.0 },
            Interval { start: 2.0, end: 3.0 },
            Interval { start: 6.0, end: 20.0 },
        ];
        let window = TrimWindow {
            start: Some(2.0),
            end: None,
        };

        let segments = keep_segments(&intervals, window, 20.0, 0.5);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].audible, intervals[2]);
        assert_close(segments[0].padded.start, 5.751);
    }

    #[test]
    fn window_end_drops_late_intervals_and_clamps_padding() {
        let intervals = [
            Interval { start: 0.0, end: 5.0 },
            Interval { start: 6.0, end: 20.0 },
        ];
        let window = TrimWindow {
            start: None,
            end: Some(5.1),
        };

        let segments = keep_segments(&intervals, window, 20.0, 0.5);
        assert_eq!(segments.len(), 1);
        assert_close(segments[0].padded.end, 5.1);
    }

    #[test]
    fn padding_start_clamps_to_window_start() {
        let intervals = [Interval { start: 2.1, end: 4.0 }];
        let window = TrimWindow {
            start: Some(2.0),
            end: None,
        };

        let segments = keep_segments(&intervals, window, 20.0, 0.5);
        assert_close(segments[0].padded.start, 2.0);
    }

    #[test]
    fn command_uses_silencedetect_filter() {
        let cmd = silencedetect_command(
            Path::new("ffmpeg"),
            Path::new("my talk.mp4"),
            &SilenceDetectConfig::default(),
        );
        assert_eq!(
            cmd.arg_strings(),
            vec![
                "-hide_banner",
                "-vn",
                "-i",
                "my talk.mp4",
                "-af",
                "silencedetect=noise=-26dB:duration=0.5",
                "-f",
                "null",
                "-",
            ]
        );
    }
}
