//! Periodic auto-save timing.
//!
//! `AutoSaveTimer` does NOT own a thread or async task. It is a stateful
//! interval the caller polls with the current instant (from its frame loop
//! or a dedicated tick). When `poll()` returns `true`, the caller takes an
//! auto-save snapshot. The timer only runs between `start()` and `cancel()`.

use std::time::{Duration, Instant};

use tracing::debug;

pub use cs_common::DEFAULT_AUTOSAVE_INTERVAL_MS;

/// A cancellable fixed-interval timer.
#[derive(Debug)]
pub struct AutoSaveTimer {
    interval: Duration,
    /// When the next tick is due; `None` while stopped.
    next_due: Option<Instant>,
}

impl AutoSaveTimer {
    /// Create a stopped timer with the given interval in milliseconds.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            next_due: None,
        }
    }

    /// Start (or restart) the timer; the first tick is due one interval
    /// after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
        debug!(interval_ms = self.interval.as_millis() as u64, "AutoSave timer started");
    }

    /// Stop the timer. Polls return `false` until it is started again.
    pub fn cancel(&mut self) {
        if self.next_due.take().is_some() {
            debug!("AutoSave timer cancelled");
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Whether a tick is due at `now`. A due tick schedules the next one an
    /// interval later; ticks missed while not polling collapse into one.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time remaining until the next tick, `None` while stopped.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

impl Default for AutoSaveTimer {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_INTERVAL_MS)
    }
}
