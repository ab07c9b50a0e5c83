//! Timer session controller
//!
//! Pure state machine over [`Settings`] and [`TimerState`]. It performs no I/O;
//! the countdown task drives [`TimerController::tick`] and
//! [`crate::state::AppState`] handles persistence and notification.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::{Mode, Settings, TimerState};
use crate::error::ValidationError;

/// Emitted when an interval runs out
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub finished: Mode,
    pub next: Mode,
    /// Minutes added to the work or break total
    pub credited_minutes: u32,
    pub total_work_sessions: u64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TimerController {
    settings: Settings,
    state: TimerState,
}

impl TimerController {
    /// Fresh controller: paused at the start of a work session
    pub fn new(settings: Settings) -> Self {
        let state = TimerState::new(Mode::Working, settings.duration_secs(Mode::Working));
        Self { settings, state }
    }

    /// Controller resumed from a persisted snapshot
    pub fn restore(settings: Settings, state: TimerState) -> Self {
        Self { settings, state }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Switch to `mode`, rewinding to its full duration and pausing
    pub fn select_mode(&mut self, mode: Mode) {
        self.state.mode = mode;
        self.state.time_left = self.settings.duration_secs(mode);
        self.state.is_paused = true;
    }

    pub fn start(&mut self) {
        self.state.is_paused = false;
    }

    pub fn pause(&mut self) {
        self.state.is_paused = true;
    }

    /// Flip between running and paused, returning whether it now runs
    pub fn toggle(&mut self) -> bool {
        self.state.is_paused = !self.state.is_paused;
        !self.state.is_paused
    }

    /// Rewind the active mode to its full duration; the pause flag is kept
    pub fn reset(&mut self) {
        self.state.time_left = self.settings.duration_secs(self.state.mode);
    }

    /// Advance the countdown by one second.
    ///
    /// Returns the completion when the interval runs out. The controller has
    /// then already switched to the next mode with its full duration.
    pub fn tick(&mut self) -> Option<Completion> {
        if self.state.is_paused {
            return None;
        }

        self.state.time_left = self.state.time_left.saturating_sub(1);
        if self.state.time_left > 0 {
            return None;
        }

        Some(self.complete())
    }

    /// Replace settings and re-derive the remaining time of the active mode
    pub fn save_settings(&mut self, settings: Settings) -> Result<(), ValidationError> {
        settings.validate()?;
        self.settings = settings;
        self.reset();
        Ok(())
    }

    /// Overwrite the timer state wholesale
    pub fn replace_state(&mut self, state: TimerState) {
        self.state = state;
    }

    /// Full length of the active mode in seconds
    pub fn total_seconds(&self) -> u64 {
        self.settings.duration_secs(self.state.mode)
    }

    /// Elapsed fraction of the active interval, in [0, 1]
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.state.time_left);
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }

    fn complete(&mut self) -> Completion {
        let finished = self.state.mode;
        let credited_minutes = self.settings.minutes_for(finished);

        if finished.is_break() {
            self.state.total_break_minutes += u64::from(credited_minutes);
        } else {
            self.state.total_work_sessions += 1;
            self.state.total_work_minutes += u64::from(credited_minutes);
        }

        let next = finished.next();
        self.state.mode = next;
        self.state.time_left = self.settings.duration_secs(next);
        self.state.is_paused = !self.settings.auto_start;

        debug!("{} complete, switching to {}", finished.label(), next.label());

        Completion {
            finished,
            next,
            credited_minutes,
            total_work_sessions: self.state.total_work_sessions,
            completed_at: Utc::now(),
        }
    }
}

impl Default for TimerController {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
