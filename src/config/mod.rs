mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = ["./quietcut.toml", "~/.config/quietcut/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
///
/// Called on load and again after command-line overrides are applied.
pub fn validate_config(config: &Config) -> Result<()> {
    let detection = &config.detection;
    if !is_positive(detection.min_silence_duration) {
        anyhow::bail!(
            "Minimum silence duration must be positive, got {}",
            detection.min_silence_duration
        );
    }
    if !detection.threshold_db.is_finite() {
        anyhow::bail!("Silence threshold must be finite, got {}", detection.threshold_db);
    }
    if detection.threshold_db > 0.0 {
        tracing::warn!(
            "Silence threshold {} dB is above full scale; every sample will count as silence",
            detection.threshold_db
        );
    }

    let render = &config.render;
    if render.width == 0 || render.height == 0 {
        anyhow::bail!(
            "Render size must be positive, got {}x{}",
            render.width,
            render.height
        );
    }
    if render.frame_rate == 0 {
        anyhow::bail!("Render frame rate cannot be 0");
    }

    let overlay = &config.overlay;
    if !is_positive(overlay.text_duration) || !is_positive(overlay.image_duration) {
        anyhow::bail!("Overlay durations must be positive");
    }
    if overlay.font_size == 0 {
        anyhow::bail!("Overlay font size cannot be 0");
    }
    if !overlay.font_file.exists() {
        tracing::warn!("Font file does not exist: {:?}", overlay.font_file);
    }

    Ok(())
}

/// Finite and above zero; rejects NaN.
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
