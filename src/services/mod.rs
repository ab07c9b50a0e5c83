//! External side effects module
//!
//! This module contains the audible cue and desktop notification sent when
//! a timer interval completes.

pub mod notifier;

// Re-export main functions
pub use notifier::*;
