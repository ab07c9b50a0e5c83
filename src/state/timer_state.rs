//! Timer state structure and modes

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Active interval kind, determining which configured duration applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Working,
    ShortBreak,
    LongBreak,
}

impl Mode {
    /// Mode entered automatically when this one completes
    pub fn next(self) -> Self {
        match self {
            Mode::Working => Mode::ShortBreak,
            Mode::ShortBreak | Mode::LongBreak => Mode::Working,
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, Mode::Working)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Working => "working",
            Mode::ShortBreak => "shortBreak",
            Mode::LongBreak => "longBreak",
        }
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            Mode::Working => "work session",
            Mode::ShortBreak => "short break",
            Mode::LongBreak => "long break",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "working" | "work" | "pomodoro" => Ok(Mode::Working),
            "shortBreak" | "short-break" | "short" => Ok(Mode::ShortBreak),
            "longBreak" | "long-break" | "long" => Ok(Mode::LongBreak),
            other => Err(ValidationError::UnknownMode(other.to_string())),
        }
    }
}

/// Countdown position and accumulated session statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    #[serde(default = "default_mode")]
    pub mode: Mode,
    #[serde(default = "default_paused")]
    pub is_paused: bool,
    /// Seconds remaining in the active interval
    pub time_left: u64,
    #[serde(default)]
    pub total_work_sessions: u64,
    #[serde(default)]
    pub total_work_minutes: u64,
    #[serde(default)]
    pub total_break_minutes: u64,
}

fn default_mode() -> Mode {
    Mode::Working
}

fn default_paused() -> bool {
    true
}

impl TimerState {
    /// A paused timer at the start of `mode` with zeroed statistics
    pub fn new(mode: Mode, time_left: u64) -> Self {
        Self {
            mode,
            is_paused: true,
            time_left,
            total_work_sessions: 0,
            total_work_minutes: 0,
            total_break_minutes: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.is_paused
    }

    /// Statistics portion of the state
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            total_work_sessions: self.total_work_sessions,
            total_work_minutes: self.total_work_minutes,
            total_break_minutes: self.total_break_minutes,
        }
    }
}

/// Accumulated counters, exposed separately for the stats endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_work_sessions: u64,
    pub total_work_minutes: u64,
    pub total_break_minutes: u64,
}
