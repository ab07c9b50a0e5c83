//! Snapshot persistence
//!
//! Settings and timer state are stored as two independent records. The server
//! keeps a single slot for each, last write wins.

pub mod file_store;
pub mod memory_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::state::{Settings, TimerState};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Storage backend for the persisted snapshot
pub trait SnapshotStore: Send + Sync + std::fmt::Debug {
    fn load_settings(&self) -> Result<Option<Settings>, StoreError>;

    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError>;

    fn load_timer_state(&self) -> Result<Option<TimerState>, StoreError>;

    fn save_timer_state(&self, state: &TimerState) -> Result<(), StoreError>;
}
