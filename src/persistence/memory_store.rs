//! In-memory snapshot store

use std::sync::Mutex;

use super::{SnapshotStore, StoreError};
use crate::state::{Settings, TimerState};

/// One slot per record, shared by every client
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: Mutex<Option<Settings>>,
    timer_state: Mutex<Option<TimerState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        self.settings
            .lock()
            .map(|slot| slot.clone())
            .map_err(|_| StoreError::LockPoisoned)
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        let mut slot = self.settings.lock().map_err(|_| StoreError::LockPoisoned)?;
        *slot = Some(settings.clone());
        Ok(())
    }

    fn load_timer_state(&self) -> Result<Option<TimerState>, StoreError> {
        self.timer_state
            .lock()
            .map(|slot| slot.clone())
            .map_err(|_| StoreError::LockPoisoned)
    }

    fn save_timer_state(&self, state: &TimerState) -> Result<(), StoreError> {
        let mut slot = self
            .timer_state
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;
        *slot = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Mode;

    #[test]
    fn test_empty_store_loads_nothing() {
        let store = MemoryStore::new();
        assert!(store.load_settings().unwrap().is_none());
        assert!(store.load_timer_state().unwrap().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let store = MemoryStore::new();
        store
            .save_timer_state(&TimerState::new(Mode::Working, 100))
            .unwrap();
        store
            .save_timer_state(&TimerState::new(Mode::LongBreak, 42))
            .unwrap();

        let state = store.load_timer_state().unwrap().unwrap();
        assert_eq!(state.mode, Mode::LongBreak);
        assert_eq!(state.time_left, 42);
    }
}
