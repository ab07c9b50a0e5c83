//! JSON snapshot files on local disk

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use super::{SnapshotStore, StoreError};
use crate::state::{Settings, TimerState};

pub const SETTINGS_FILE: &str = "pomodoro-settings.json";
pub const TIMER_STATE_FILE: &str = "pomodoro-state.json";

/// Stores each record in its own file under a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store in `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Default location under the platform data directory
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|dir| dir.join("pomodoro"))
            .unwrap_or_else(|| PathBuf::from(".pomodoro"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Decode { path, source })
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let path = self.dir.join(name);
        let content = serde_json::to_string_pretty(value)?;
        atomic_write(&path, &content)?;
        debug!("Wrote snapshot {}", path.display());
        Ok(())
    }
}

impl SnapshotStore for FileStore {
    fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        self.read(SETTINGS_FILE)
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.write(SETTINGS_FILE, settings)
    }

    fn load_timer_state(&self) -> Result<Option<TimerState>, StoreError> {
        self.read(TIMER_STATE_FILE)
    }

    fn save_timer_state(&self, state: &TimerState) -> Result<(), StoreError> {
        self.write(TIMER_STATE_FILE, state)
    }
}

/// Write through a temp file in the same directory, then rename over `path`
fn atomic_write(path: &Path, content: &str) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut temp_file = NamedTempFile::new_in(dir).map_err(io_err)?;
    temp_file.write_all(content.as_bytes()).map_err(io_err)?;
    temp_file.as_file().sync_all().map_err(io_err)?;
    temp_file.persist(path).map_err(|e| io_err(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Mode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_files_load_as_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        assert!(store.load_settings().unwrap().is_none());
        assert!(store.load_timer_state().unwrap().is_none());
    }

    #[test]
    fn test_saved_snapshot_is_restored() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(temp_dir.path().join("nested")).unwrap();

        let settings = Settings {
            work_minutes: 45,
            volume: 0.25,
            ..Settings::default()
        };
        let state = TimerState {
            is_paused: false,
            total_work_sessions: 3,
            total_work_minutes: 135,
            ..TimerState::new(Mode::ShortBreak, 120)
        };
        store.save_settings(&settings).unwrap();
        store.save_timer_state(&state).unwrap();

        let reopened = FileStore::open(temp_dir.path().join("nested")).unwrap();
        assert_eq!(reopened.load_settings().unwrap(), Some(settings));
        assert_eq!(reopened.load_timer_state().unwrap(), Some(state));
    }

    #[test]
    fn test_uses_fixed_file_names() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();
        store.save_settings(&Settings::default()).unwrap();

        let raw = fs::read_to_string(temp_dir.path().join(SETTINGS_FILE)).unwrap();
        assert!(raw.contains("\"workMinutes\": 25"));
    }

    #[test]
    fn test_corrupt_file_is_a_decode_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(TIMER_STATE_FILE), "{not json").unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        let result = store.load_timer_state();
        assert!(matches!(result, Err(StoreError::Decode { .. })));
    }
}
