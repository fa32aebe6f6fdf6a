use quietcut_av::{RenderSettings, SilenceDetectConfig};
use quietcut_common::clip::{
    DEFAULT_FONT_FILE, DEFAULT_FONT_SIZE, DEFAULT_IMAGE_DURATION, DEFAULT_TEXT_DURATION,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectionConfig {
    /// Noise floor in dB below which audio counts as silence (default: -26)
    #[serde(default = "default_threshold_db")]
    pub threshold_db: f64,

    /// Shortest silence worth cutting, in seconds (default: 0.5)
    #[serde(default = "default_min_silence_duration")]
    pub min_silence_duration: f64,
}

fn default_threshold_db() -> f64 {
    -26.0
}

fn default_min_silence_duration() -> f64 {
    0.5
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold_db: default_threshold_db(),
            min_silence_duration: default_min_silence_duration(),
        }
    }
}

impl From<&DetectionConfig> for SilenceDetectConfig {
    fn from(config: &DetectionConfig) -> Self {
        Self {
            threshold_db: config.threshold_db,
            min_duration: config.min_silence_duration,
        }
    }
}

/// Output format of generated clips.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub video_codec: String,
    pub audio_codec: String,
    pub pixel_format: String,
    pub background_color: String,
    pub font_color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let settings = RenderSettings::default();
        Self {
            width: settings.width,
            height: settings.height,
            frame_rate: settings.frame_rate,
            video_codec: settings.video_codec,
            audio_codec: settings.audio_codec,
            pixel_format: settings.pixel_format,
            background_color: settings.background_color,
            font_color: settings.font_color,
        }
    }
}

impl From<&RenderConfig> for RenderSettings {
    fn from(config: &RenderConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            frame_rate: config.frame_rate,
            video_codec: config.video_codec.clone(),
            audio_codec: config.audio_codec.clone(),
            pixel_format: config.pixel_format.clone(),
            background_color: config.background_color.clone(),
            font_color: config.font_color.clone(),
        }
    }
}

/// Defaults for the title and chapter clips added by `create-database`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OverlayConfig {
    /// Seconds each chapter card is shown (default: 2.0)
    #[serde(default = "default_text_duration")]
    pub text_duration: f64,

    #[serde(default = "default_font_file")]
    pub font_file: PathBuf,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Seconds the thumbnail is shown (default: 3.0)
    #[serde(default = "default_image_duration")]
    pub image_duration: f64,
}

fn default_text_duration() -> f64 {
    DEFAULT_TEXT_DURATION
}

fn default_font_file() -> PathBuf {
    PathBuf::from(DEFAULT_FONT_FILE)
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

fn default_image_duration() -> f64 {
    DEFAULT_IMAGE_DURATION
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            text_duration: default_text_duration(),
            font_file: default_font_file(),
            font_size: default_font_size(),
            image_duration: default_image_duration(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}
