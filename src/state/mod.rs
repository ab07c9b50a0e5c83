//! State management module
//!
//! This module contains the timer data model, the session controller that
//! drives it, and the shared application state wrapping both.

pub mod app_state;
pub mod controller;
pub mod display;
pub mod settings;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use controller::{Completion, TimerController};
pub use display::format_clock;
pub use settings::Settings;
pub use timer_state::{Mode, SessionStats, TimerState};
