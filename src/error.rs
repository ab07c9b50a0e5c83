//! Error types shared across the crate

use thiserror::Error;

/// A field of a settings or timer-state payload failed its constraint
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("unknown timer mode: {0}")]
    UnknownMode(String),
}

/// Errors surfaced by timer operations
#[derive(Debug, Error)]
pub enum TimerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to lock {0}")]
    LockPoisoned(&'static str),
}

impl TimerError {
    /// Whether the error was caused by the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(self, TimerError::Validation(_))
    }
}
