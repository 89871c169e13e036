//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Export pipeline settings.
    pub export: ExportSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Settings for the scene export pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Frame rate of the composed capture stream.
    pub fps: u32,

    /// MIME type of the output container.
    pub container_mime: String,

    /// Filename for the exported video artifact.
    pub video_filename: String,

    /// Filename for the subtitle sidecar.
    pub subtitle_filename: String,

    /// Filename for the structured (JSON) sidecar.
    pub structured_filename: String,

    /// Seconds before the completion message auto-clears.
    pub message_clear_secs: u64,

    /// Optional per-scene capture timeout in seconds. `None` preserves the
    /// no-timeout behavior: a stalled source stalls the export.
    pub scene_timeout_secs: Option<f64>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "vidprompt=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            export: ExportSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            fps: 30,
            container_mime: "video/webm".to_string(),
            video_filename: "vidprompt_studio_export.webm".to_string(),
            subtitle_filename: "narration.srt".to_string(),
            structured_filename: "scenes.json".to_string(),
            message_clear_secs: 5,
            scene_timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl StudioConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("vidprompt").join("config.json")
}
