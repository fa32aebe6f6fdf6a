//! The `create-database` stage.
//!
//! Probes the input, turns its audible intervals into video clips, adds the
//! optional thumbnail and chapter cards, and stores everything in a fresh
//! record store.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quietcut_av::silence::keep_segments;
use quietcut_av::{detect_silence, probe_keyframes, Segment, SilenceDetectConfig, SilenceReport, TrimWindow};
use quietcut_common::timestamp::{seconds_to_timestamp, timestamp_to_seconds};
use quietcut_common::{Clip, Source};
use quietcut_db::models::{NewClip, NewImageClip, NewSource, NewTextClip, NewVideoClip};
use quietcut_db::{ClipRepository, SqliteRepository};

use super::toc::Chapter;
use super::Tools;
use crate::config::OverlayConfig;
use crate::toc::TocEntry;

/// Timestamp of the thumbnail clip.
const THUMBNAIL_TIMESTAMP: &str = "0:00:00";

/// Inputs of the build stage.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub input: PathBuf,
    pub detection: SilenceDetectConfig,
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub toc: Vec<TocEntry>,
    pub thumbnail: Option<PathBuf>,
    pub overlay: OverlayConfig,
}

/// Figures reported after silence detection, before the trim window applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildSummary {
    pub audio_rate: u32,
    pub previous_duration: f64,
    pub new_duration: f64,
    pub interval_count: usize,
}

/// Everything the build stage will store, computed without side effects.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub source: NewSource,
    pub clips: Vec<NewClip>,
    pub summary: BuildSummary,
    pub segments: Vec<Segment>,
    pub chapters: Vec<Chapter>,
}

/// Result of a completed build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub database: PathBuf,
    pub source: Source,
    pub clips: Vec<Clip>,
    pub summary: BuildSummary,
    pub chapters: Vec<Chapter>,
}

/// Turn probe results into the records to store.
///
/// Chapter offsets count the unpadded length of every kept segment whose
/// padded start precedes the chapter, plus the cards shown up to and
/// including this one.
pub fn plan_build(
    options: &BuildOptions,
    report: &SilenceReport,
    keyframes: Vec<f64>,
) -> Result<BuildPlan> {
    let min_duration = options.detection.min_duration;
    if !(min_duration.is_finite() && min_duration > 0.0) {
        anyhow::bail!("Minimum silence duration must be positive, got {}", min_duration);
    }

    let intervals = report
        .audible_intervals()
        .context("Failed to pair silence markers")?;

    let summary = BuildSummary {
        audio_rate: report.audio_rate,
        previous_duration: report.total_duration,
        new_duration: intervals.iter().map(|i| i.duration()).sum(),
        interval_count: intervals.len(),
    };

    let window = TrimWindow {
        start: parse_bound(options.window_start.as_deref())?,
        end: parse_bound(options.window_end.as_deref())?,
    };
    if let (Some(start), Some(end)) = (window.start, window.end) {
        if start >= end {
            anyhow::bail!(
                "Trim window start {} is not before its end {}",
                seconds_to_timestamp(start),
                seconds_to_timestamp(end)
            );
        }
    }

    let segments = keep_segments(
        &intervals,
        window,
        report.total_duration,
        min_duration,
    );
    tracing::info!(
        "Keeping {} of {} audible intervals",
        segments.len(),
        intervals.len()
    );

    let mut clips: Vec<NewClip> = Vec::new();

    if let Some(thumbnail) = &options.thumbnail {
        let mut image = NewImageClip::new(THUMBNAIL_TIMESTAMP, thumbnail.clone());
        image.duration = options.overlay.image_duration;
        clips.push(image.into());
    }

    let mut chapters = Vec::with_capacity(options.toc.len());
    let mut cards = 0.0;
    for entry in &options.toc {
        let at = timestamp_to_seconds(&entry.timestamp)?;
        let text = NewTextClip {
            timestamp: entry.timestamp.clone(),
            text: entry.text.clone(),
            duration: options.overlay.text_duration,
            font_file: options.overlay.font_file.clone(),
            font_size: options.overlay.font_size,
        };
        cards += text.duration;
        clips.push(text.into());

        let kept: f64 = segments
            .iter()
            .filter(|s| s.padded.start < at)
            .map(|s| s.audible.duration())
            .sum();
        chapters.push(Chapter {
            offset: kept + cards,
            text: entry.text.clone(),
        });
    }

    clips.extend(segments.iter().map(|s| {
        NewClip::from(NewVideoClip::new(
            seconds_to_timestamp(s.padded.start),
            seconds_to_timestamp(s.padded.end),
        ))
    }));

    let source = NewSource {
        path: options.input.clone(),
        window_start: options.window_start.clone(),
        window_end: options.window_end.clone(),
        duration: report.total_duration,
        audio_rate: report.audio_rate,
        keyframes,
    };

    Ok(BuildPlan {
        source,
        clips,
        summary,
        segments,
        chapters,
    })
}

fn parse_bound(timestamp: Option<&str>) -> Result<Option<f64>> {
    timestamp
        .map(|ts| timestamp_to_seconds(ts).with_context(|| format!("Invalid trim bound {:?}", ts)))
        .transpose()
}

/// Run the build stage, replacing any record store at `database`.
pub fn build_database(tools: &Tools, options: &BuildOptions, database: &Path) -> Result<BuildOutcome> {
    if !options.input.is_file() {
        anyhow::bail!("Input file does not exist: {:?}", options.input);
    }
    if database == options.input {
        anyhow::bail!("Refusing to overwrite input {:?} with its database", options.input);
    }

    let repo = SqliteRepository::create(database)
        .with_context(|| format!("Failed to create database {:?}", database))?;

    let keyframes = probe_keyframes(&tools.ffprobe, &options.input)
        .with_context(|| format!("Failed to probe keyframes of {:?}", options.input))?;
    let report = detect_silence(&tools.ffmpeg, &options.input, &options.detection)
        .with_context(|| format!("Failed to detect silence in {:?}", options.input))?;

    let plan = plan_build(options, &report, keyframes)?;
    let (source, clips) = repo
        .save_build(&plan.source, &plan.clips)
        .context("Failed to store build")?;

    tracing::info!(
        "Stored {} clips for {:?} in {:?}",
        clips.len(),
        options.input,
        database
    );

    Ok(BuildOutcome {
        database: database.to_path_buf(),
        source,
        clips,
        summary: plan.summary,
        chapters: plan.chapters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quietcut_av::silence::parse_silencedetect;

    const STDERR: &str = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'talk.mp4':
  Duration: 00:00:20.00, start: 0.000000, bitrate: 1205 kb/s
  Stream #0:1[0x2](und): Audio: aac (LC) (mp4a / 0x6134706D), 48000 Hz, stereo, fltp, 128 kb/s
[silencedetect @ 0x1] silence_start: 5
[silencedetect @ 0x1] silence_end: 6 | silence_duration: 1
";

    fn options() -> BuildOptions {
        BuildOptions {
            input: PathBuf::from("talk.mp4"),
            detection: SilenceDetectConfig::default(),
            window_start: None,
            window_end: None,
            toc: Vec::new(),
            thumbnail: None,
            overlay: OverlayConfig::default(),
        }
    }

    fn video_bounds(clips: &[NewClip]) -> Vec<(String, String)> {
        clips
            .iter()
            .filter_map(|c| match c {
                NewClip::Video(v) => Some((v.start.clone(), v.end.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_plan_pads_segments() {
        let report = parse_silencedetect(STDERR).unwrap();
        let plan = plan_build(&options(), &report, vec![0.0, 5.0, 10.0]).unwrap();

        assert_eq!(
            plan.summary,
            BuildSummary {
                audio_rate: 48000,
                previous_duration: 20.0,
                new_duration: 19.0,
                interval_count: 2,
            }
        );
        assert_eq!(
            video_bounds(&plan.clips),
            vec![
                ("00:00:00.000000".to_string(), "00:00:05.249000".to_string()),
                ("00:00:05.751000".to_string(), "00:00:20.000000".to_string()),
            ]
        );
        assert_eq!(plan.source.keyframes, vec![0.0, 5.0, 10.0]);
        assert_eq!(plan.source.audio_rate, 48000);
        assert!(plan.chapters.is_empty());
    }

    #[test]
    fn test_plan_adds_overlays_and_chapters() {
        let report = parse_silencedetect(STDERR).unwrap();
        let mut options = options();
        options.thumbnail = Some(PathBuf::from("cover.png"));
        options.toc = vec![
            TocEntry {
                timestamp: "0:00:00".to_string(),
                text: "Intro".to_string(),
            },
            TocEntry {
                timestamp: "0:00:10".to_string(),
                text: "Demo".to_string(),
            },
        ];

        let plan = plan_build(&options, &report, vec![0.0]).unwrap();
        let kinds: Vec<_> = plan.clips.iter().map(NewClip::kind).collect();
        use quietcut_common::ClipKind::*;
        assert_eq!(kinds, vec![Image, Text, Text, Video, Video]);

        assert_eq!(plan.chapters[0].text, "Intro");
        assert!((plan.chapters[0].offset - 2.0).abs() < 1e-9);
        // both segments start before 10s: 5 + 14 raw seconds, plus two cards
        assert!((plan.chapters[1].offset - 23.0).abs() < 1e-9);

        match &plan.clips[0] {
            NewClip::Image(image) => {
                assert_eq!(image.timestamp, "0:00:00");
                assert_eq!(image.duration, 3.0);
                assert_eq!(image.input_file, PathBuf::from("cover.png"));
            }
            other => panic!("expected image clip, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_applies_window() {
        let report = parse_silencedetect(STDERR).unwrap();
        let mut options = options();
        options.window_start = Some("0:00:02".to_string());

        let plan = plan_build(&options, &report, vec![0.0]).unwrap();
        assert_eq!(
            video_bounds(&plan.clips),
            vec![("00:00:05.751000".to_string(), "00:00:20.000000".to_string())]
        );
        assert_eq!(plan.summary.interval_count, 2);
        assert_eq!(plan.source.window_start.as_deref(), Some("0:00:02"));
    }

    #[test]
    fn test_plan_rejects_inverted_window() {
        let report = parse_silencedetect(STDERR).unwrap();
        let mut options = options();
        options.window_start = Some("0:00:10".to_string());
        options.window_end = Some("0:00:05".to_string());

        assert!(plan_build(&options, &report, vec![0.0]).is_err());
    }

    #[test]
    fn test_plan_rejects_bad_window_timestamp() {
        let report = parse_silencedetect(STDERR).unwrap();
        let mut options = options();
        options.window_end = Some("soon".to_string());

        let err = plan_build(&options, &report, vec![0.0]).unwrap_err();
        assert!(err.to_string().contains("Invalid trim bound"));
    }

    #[test]
    fn test_plan_rejects_non_finite_min_duration() {
        let report = parse_silencedetect(STDERR).unwrap();
        for min_duration in [f64::NAN, f64::INFINITY, 0.0] {
            let mut options = options();
            options.detection.min_duration = min_duration;

            let err = plan_build(&options, &report, vec![0.0]).unwrap_err();
            assert!(err.to_string().contains("must be positive"));
        }
    }

    #[test]
    fn test_build_requires_input() {
        let dir = tempfile::tempdir().unwrap();
        let tools = Tools {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        };
        let mut options = options();
        options.input = dir.path().join("missing.mp4");

        let err = build_database(&tools, &options, &dir.path().join("missing.db")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(!dir.path().join("missing.db").exists());
    }
}
