//! Playback clock: play/pause, seek, rewind, and per-frame advance with
//! wrap-around at the end of the playback window.

use cs_common::{EditorConfig, TimeCode};

/// Current playback mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Playhead at rest (never played, or paused).
    #[default]
    Paused,
    /// Advancing on every animation frame.
    Playing,
}

/// Playhead and transport state.
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    mode: PlaybackMode,
    current_time: TimeCode,
    /// Playback wraps to zero at this time (seconds).
    window: f64,
    /// Seconds advanced per animation frame.
    step: f64,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl PlaybackClock {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            mode: PlaybackMode::Paused,
            current_time: TimeCode::ZERO,
            window: config.playback_window_secs,
            step: config.frame_step(),
        }
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn is_playing(&self) -> bool {
        self.mode == PlaybackMode::Playing
    }

    pub fn current_time(&self) -> TimeCode {
        self.current_time
    }

    pub fn window(&self) -> f64 {
        self.window
    }

    pub fn play(&mut self) {
        self.mode = PlaybackMode::Playing;
        tracing::debug!(time = %self.current_time, "Playback started");
    }

    pub fn pause(&mut self) {
        if self.mode == PlaybackMode::Playing {
            self.mode = PlaybackMode::Paused;
            tracing::debug!(time = %self.current_time, "Playback paused");
        }
    }

    pub fn toggle(&mut self) {
        match self.mode {
            PlaybackMode::Playing => self.pause(),
            PlaybackMode::Paused => self.play(),
        }
    }

    /// Move the playhead to `secs`, clamped at zero.
    pub fn seek(&mut self, secs: f64) {
        self.current_time = TimeCode::from_secs(clamp_time(secs));
        tracing::debug!(time = %self.current_time, "Seeked");
    }

    /// Step the playhead back by `secs`, clamped at zero.
    pub fn rewind(&mut self, secs: f64) {
        self.seek(self.current_time.as_secs() - secs);
    }

    pub fn return_to_start(&mut self) {
        self.seek(0.0);
    }

    /// Advance one animation frame while playing. Reaching the end of the
    /// window wraps back to zero. Returns `true` if the playhead moved.
    pub fn advance_frame(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        let next = self.current_time.as_secs() + self.step;
        self.current_time = if next >= self.window {
            tracing::trace!(window = self.window, "Playback wrapped");
            TimeCode::ZERO
        } else {
            TimeCode::from_secs(next)
        };
        true
    }
}

fn clamp_time(secs: f64) -> f64 {
    if secs.is_finite() {
        secs.max(0.0)
    } else {
        0.0
    }
}
