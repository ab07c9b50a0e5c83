//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use super::{Completion, Mode, Settings, TimerController, TimerState};
use crate::{
    error::TimerError,
    persistence::SnapshotStore,
};

/// Shared application state: the timer controller plus its collaborators
#[derive(Debug)]
pub struct AppState {
    /// Timer session controller
    controller: Mutex<TimerController>,
    /// Snapshot persistence backend
    store: Arc<dyn SnapshotStore>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
    /// Channel publishing every new timer state
    timer_update_tx: watch::Sender<TimerState>,
    /// Channel for interval completions
    pub completion_tx: broadcast::Sender<Completion>,
}

impl AppState {
    /// Create the state, restoring the last snapshot from `store` if present
    pub fn new(port: u16, host: String, store: Arc<dyn SnapshotStore>) -> Self {
        let controller = restore_controller(store.as_ref());
        let (timer_update_tx, _) = watch::channel(controller.state().clone());
        let (completion_tx, _) = broadcast::channel(16);

        Self {
            controller: Mutex::new(controller),
            store,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            timer_update_tx,
            completion_tx,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TimerController>, TimerError> {
        self.controller
            .lock()
            .map_err(|_| TimerError::LockPoisoned("timer controller"))
    }

    /// Apply a user action to the controller, then persist and publish.
    ///
    /// The store write and the watch update happen under the controller lock,
    /// so concurrent ticks and actions publish in the order they mutate.
    pub fn update_timer<F>(&self, action: &str, updater: F) -> Result<TimerState, TimerError>
    where
        F: FnOnce(&mut TimerController),
    {
        let mut controller = self.lock()?;
        updater(&mut *controller);
        let new_state = controller.state().clone();
        self.commit(&new_state);
        drop(controller);

        self.record_action(action);
        Ok(new_state)
    }

    pub fn select_mode(&self, mode: Mode) -> Result<TimerState, TimerError> {
        info!("Selecting mode: {}", mode);
        self.update_timer(&format!("mode:{}", mode), |c| c.select_mode(mode))
    }

    pub fn start(&self) -> Result<TimerState, TimerError> {
        info!("Starting timer");
        self.update_timer("start", TimerController::start)
    }

    pub fn pause(&self) -> Result<TimerState, TimerError> {
        info!("Pausing timer");
        self.update_timer("pause", TimerController::pause)
    }

    pub fn toggle(&self) -> Result<TimerState, TimerError> {
        self.update_timer("toggle", |c| {
            let running = c.toggle();
            info!("Timer toggled, running={}", running);
        })
    }

    pub fn reset(&self) -> Result<TimerState, TimerError> {
        info!("Resetting timer");
        self.update_timer("reset", TimerController::reset)
    }

    /// Overwrite the timer state wholesale
    pub fn replace_timer_state(&self, state: TimerState) -> Result<TimerState, TimerError> {
        info!("Replacing timer state: mode={}, timeLeft={}", state.mode, state.time_left);
        self.update_timer("replace-state", |c| c.replace_state(state))
    }

    /// Validate and store new settings, re-deriving the remaining time
    pub fn save_settings(&self, settings: Settings) -> Result<Settings, TimerError> {
        let mut controller = self.lock()?;
        controller.save_settings(settings)?;
        let saved = controller.settings().clone();
        let new_state = controller.state().clone();
        self.persist_settings(&saved);
        self.commit(&new_state);
        drop(controller);

        info!(
            "Settings saved: work={}m break={}m longBreak={}m",
            saved.work_minutes, saved.break_minutes, saved.long_break_minutes
        );

        self.record_action("settings");
        Ok(saved)
    }

    /// Advance the countdown by one second.
    ///
    /// Paused timers are left untouched. A completion is recorded as the last
    /// action and broadcast to notification listeners.
    pub fn tick(&self) -> Result<Option<Completion>, TimerError> {
        let mut controller = self.lock()?;
        if controller.state().is_paused {
            return Ok(None);
        }
        let completion = controller.tick();
        let new_state = controller.state().clone();
        self.commit(&new_state);
        drop(controller);

        if let Some(completion) = &completion {
            info!(
                "{} complete after {} minutes, next: {}",
                completion.finished.label(),
                completion.credited_minutes,
                completion.next.label()
            );
            self.record_action(&format!("complete:{}", completion.finished));
            // No receivers simply means nobody is listening for cues
            let _ = self.completion_tx.send(completion.clone());
        }

        Ok(completion)
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, TimerError> {
        self.lock().map(|c| c.state().clone())
    }

    /// Get current settings
    pub fn get_settings(&self) -> Result<Settings, TimerError> {
        self.lock().map(|c| c.settings().clone())
    }

    /// Run a read-only query against the controller
    pub fn with_controller<T>(&self, f: impl FnOnce(&TimerController) -> T) -> Result<T, TimerError> {
        self.lock().map(|c| f(&*c))
    }

    /// Watch every published timer state
    pub fn subscribe_timer(&self) -> watch::Receiver<TimerState> {
        self.timer_update_tx.subscribe()
    }

    /// Listen for interval completions
    pub fn subscribe_completions(&self) -> broadcast::Receiver<Completion> {
        self.completion_tx.subscribe()
    }

    /// Write the full snapshot to the store
    pub fn flush(&self) -> Result<(), TimerError> {
        let controller = self.lock()?;
        self.persist_settings(controller.settings());
        self.persist_timer_state(controller.state());
        Ok(())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|a| a.clone()) {
            Some((action, time)) => (Some(action), Some(time)),
            None => (None, None),
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some((action.to_string(), Utc::now()));
        }
    }

    fn persist_settings(&self, settings: &Settings) {
        if let Err(e) = self.store.save_settings(settings) {
            warn!("Failed to persist settings: {}", e);
        }
    }

    fn persist_timer_state(&self, state: &TimerState) {
        if let Err(e) = self.store.save_timer_state(state) {
            warn!("Failed to persist timer state: {}", e);
        }
    }

    /// Persist and publish a new timer state; callers hold the controller lock
    fn commit(&self, state: &TimerState) {
        self.persist_timer_state(state);
        // send_replace never fails, even with no receivers
        self.timer_update_tx.send_replace(state.clone());
    }
}

/// Rebuild the controller from the store, discarding anything invalid
fn restore_controller(store: &dyn SnapshotStore) -> TimerController {
    let settings = match store.load_settings() {
        Ok(Some(settings)) => match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                warn!("Stored settings are invalid ({}), using defaults", e);
                Settings::default()
            }
        },
        Ok(None) => Settings::default(),
        Err(e) => {
            warn!("Failed to load settings ({}), using defaults", e);
            Settings::default()
        }
    };

    match store.load_timer_state() {
        Ok(Some(mut state)) => {
            let full = settings.duration_secs(state.mode);
            if state.time_left > full {
                warn!(
                    "Stored timeLeft {}s exceeds the {} duration, clamping to {}s",
                    state.time_left, state.mode, full
                );
                state.time_left = full;
            }
            info!(
                "Restored timer state: mode={}, timeLeft={}s, paused={}",
                state.mode, state.time_left, state.is_paused
            );
            TimerController::restore(settings, state)
        }
        Ok(None) => TimerController::new(settings),
        Err(e) => {
            warn!("Failed to load timer state ({}), starting fresh", e);
            TimerController::new(settings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn app_state() -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(5000, "127.0.0.1".to_string(), store.clone());
        (state, store)
    }

    #[test]
    fn test_fresh_state_uses_defaults() {
        let (state, _) = app_state();
        let timer = state.get_timer_state().unwrap();

        assert_eq!(timer.mode, Mode::Working);
        assert_eq!(timer.time_left, 1500);
        assert!(timer.is_paused);
        assert_eq!(state.get_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_restores_from_store() {
        let store = Arc::new(MemoryStore::new());
        let settings = Settings {
            work_minutes: 50,
            ..Settings::default()
        };
        store.save_settings(&settings).unwrap();
        store
            .save_timer_state(&TimerState::new(Mode::LongBreak, 77))
            .unwrap();

        let state = AppState::new(5000, "127.0.0.1".to_string(), store);

        assert_eq!(state.get_settings().unwrap(), settings);
        assert_eq!(state.get_timer_state().unwrap().time_left, 77);
    }

    #[test]
    fn test_invalid_stored_settings_fall_back_to_defaults() {
        let store = Arc::new(MemoryStore::new());
        store
            .save_settings(&Settings {
                work_minutes: 0,
                ..Settings::default()
            })
            .unwrap();

        let state = AppState::new(5000, "127.0.0.1".to_string(), store);
        assert_eq!(state.get_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_actions_persist_and_record() {
        let (state, store) = app_state();

        state.select_mode(Mode::ShortBreak).unwrap();
        state.start().unwrap();

        let stored = store.load_timer_state().unwrap().unwrap();
        assert_eq!(stored.mode, Mode::ShortBreak);
        assert!(!stored.is_paused);

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());
    }

    #[test]
    fn test_tick_publishes_and_persists() {
        let (state, store) = app_state();
        let receiver = state.subscribe_timer();

        assert!(state.tick().unwrap().is_none());
        assert_eq!(state.get_timer_state().unwrap().time_left, 1500);

        state.start().unwrap();
        state.tick().unwrap();

        assert_eq!(receiver.borrow().time_left, 1499);
        assert_eq!(store.load_timer_state().unwrap().unwrap().time_left, 1499);
    }

    #[test]
    fn test_completion_is_broadcast() {
        let (state, _) = app_state();
        let mut completions = state.subscribe_completions();
        state
            .replace_timer_state(TimerState {
                is_paused: false,
                ..TimerState::new(Mode::Working, 1)
            })
            .unwrap();

        let completion = state.tick().unwrap().expect("interval should complete");

        assert_eq!(completions.try_recv().unwrap(), completion);
        assert_eq!(
            state.get_last_action().0.as_deref(),
            Some("complete:working")
        );
    }

    #[test]
    fn test_invalid_settings_are_refused() {
        let (state, store) = app_state();

        let result = state.save_settings(Settings {
            volume: 2.0,
            ..Settings::default()
        });

        assert!(result.unwrap_err().is_validation());
        assert!(store.load_settings().unwrap().is_none());
        assert_eq!(state.get_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_concurrent_tick_and_pause_agree() {
        let (state, store) = app_state();
        let receiver = state.subscribe_timer();

        for round in 0..5000 {
            state.start().unwrap();
            std::thread::scope(|scope| {
                scope.spawn(|| state.tick().unwrap());
                scope.spawn(|| state.pause().unwrap());
            });

            let current = state.get_timer_state().unwrap();
            assert!(current.is_paused, "round {}", round);
            assert_eq!(
                store.load_timer_state().unwrap().as_ref(),
                Some(&current),
                "store diverged in round {}",
                round
            );
            assert_eq!(*receiver.borrow(), current, "watch diverged in round {}", round);
        }
    }

    #[test]
    fn test_flush_writes_both_records() {
        let (state, store) = app_state();
        assert!(store.load_settings().unwrap().is_none());
        assert!(store.load_timer_state().unwrap().is_none());

        state.flush().unwrap();

        assert_eq!(store.load_settings().unwrap(), Some(Settings::default()));
        assert_eq!(
            store.load_timer_state().unwrap(),
            Some(state.get_timer_state().unwrap())
        );
    }

    #[test]
    fn test_restore_clamps_time_left_to_mode_duration() {
        let store = Arc::new(MemoryStore::new());
        store
            .save_settings(&Settings {
                break_minutes: 99,
                ..Settings::default()
            })
            .unwrap();
        store
            .save_timer_state(&TimerState::new(Mode::ShortBreak, 40 * 60))
            .unwrap();

        let state = AppState::new(5000, "127.0.0.1".to_string(), store);

        assert_eq!(state.get_timer_state().unwrap().time_left, 5 * 60);
        assert_eq!(state.with_controller(|c| c.progress()).unwrap(), 0.0);
    }

    #[test]
    fn test_uptime_format() {
        let (state, _) = app_state();
        assert!(state.get_uptime().ends_with('s'));
    }
}
