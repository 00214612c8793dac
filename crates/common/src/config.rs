//! Editor configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default auto-save interval in milliseconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_MS: u64 = 5000;

/// Tunables for the editor core. Every field has a default, so a config file
/// only needs to name what it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Auto-save snapshots kept in the version log (manual saves are unbounded).
    pub max_auto_versions: usize,
    pub autosave_interval_ms: u64,
    /// Playback wraps to zero at this time (seconds).
    pub playback_window_secs: f64,
    /// Animation frames per second while playing.
    pub frame_rate: u32,
    /// Oldest history entries are dropped past this many (`None` = unbounded).
    pub max_history_entries: Option<usize>,
    /// Width given to freshly added image/video elements.
    pub media_target_width: f64,
    /// Smallest width/height a canvas transform may produce.
    pub min_transform_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_auto_versions: 10,
            autosave_interval_ms: DEFAULT_AUTOSAVE_INTERVAL_MS,
            playback_window_secs: 10.0,
            frame_rate: 60,
            max_history_entries: None,
            media_target_width: 200.0,
            min_transform_size: 5.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "Loaded editor config");
        Ok(config)
    }

    /// Seconds advanced per animation frame.
    pub fn frame_step(&self) -> f64 {
        1.0 / f64::from(self.frame_rate)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 {
            return Err(ConfigError::Invalid {
                field: "frame_rate",
                reason: "must be positive".into(),
            });
        }
        if !(self.playback_window_secs.is_finite() && self.playback_window_secs > 0.0) {
            return Err(ConfigError::Invalid {
                field: "playback_window_secs",
                reason: format!("must be a positive number, got {}", self.playback_window_secs),
            });
        }
        if !(self.media_target_width.is_finite() && self.media_target_width > 0.0) {
            return Err(ConfigError::Invalid {
                field: "media_target_width",
                reason: format!("must be a positive number, got {}", self.media_target_width),
            });
        }
        if self.max_auto_versions == 0 {
            return Err(ConfigError::Invalid {
                field: "max_auto_versions",
                reason: "must keep at least one auto-save".into(),
            });
        }
        if self.max_history_entries == Some(0) {
            return Err(ConfigError::Invalid {
                field: "max_history_entries",
                reason: "must keep at least one entry".into(),
            });
        }
        Ok(())
    }
}
