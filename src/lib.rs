//! Pomodoro Server - A Pomodoro timer with persisted settings and statistics
//!
//! This library provides the timer session controller (work, short break and
//! long break cycling with session statistics), snapshot persistence, and an
//! HTTP API that drives the timer from any client.

pub mod config;
pub mod error;
pub mod persistence;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{TimerError, ValidationError};
pub use state::{AppState, Mode, Settings, TimerController, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
