//! Timer settings and their validation

use serde::{Deserialize, Serialize};

use super::Mode;
use crate::error::ValidationError;

pub const WORK_MINUTES_RANGE: (u32, u32) = (1, 60);
pub const BREAK_MINUTES_RANGE: (u32, u32) = (1, 30);
pub const LONG_BREAK_MINUTES_RANGE: (u32, u32) = (5, 60);

/// User-configurable durations and notification preferences.
///
/// Replaced wholesale on save. Fields missing from a JSON payload take their
/// defaults; present fields must pass [`Settings::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub long_break_minutes: u32,
    /// Notification cue volume in [0, 1]
    pub volume: f64,
    pub use_notifications: bool,
    /// Start the next interval automatically after a completion
    pub auto_start: bool,
}

impl Settings {
    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_minutes("workMinutes", self.work_minutes, WORK_MINUTES_RANGE)?;
        check_minutes("breakMinutes", self.break_minutes, BREAK_MINUTES_RANGE)?;
        check_minutes(
            "longBreakMinutes",
            self.long_break_minutes,
            LONG_BREAK_MINUTES_RANGE,
        )?;

        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ValidationError::OutOfRange {
                field: "volume",
                min: 0.0,
                max: 1.0,
                value: self.volume,
            });
        }

        Ok(())
    }

    /// Configured length of a mode in minutes
    pub fn minutes_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Working => self.work_minutes,
            Mode::ShortBreak => self.break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        }
    }

    /// Configured length of a mode in seconds
    pub fn duration_secs(&self, mode: Mode) -> u64 {
        u64::from(self.minutes_for(mode)) * 60
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
            long_break_minutes: 15,
            volume: 0.8,
            use_notifications: true,
            auto_start: true,
        }
    }
}

fn check_minutes(
    field: &'static str,
    value: u32,
    (min, max): (u32, u32),
) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: f64::from(min),
            max: f64::from(max),
            value: f64::from(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.duration_secs(Mode::Working), 25 * 60);
        assert_eq!(settings.duration_secs(Mode::ShortBreak), 5 * 60);
        assert_eq!(settings.duration_secs(Mode::LongBreak), 15 * 60);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let settings = Settings {
            work_minutes: 60,
            break_minutes: 1,
            long_break_minutes: 5,
            volume: 0.0,
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());

        let settings = Settings {
            work_minutes: 1,
            break_minutes: 30,
            long_break_minutes: 60,
            volume: 1.0,
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_fields() {
        let zero_work = Settings {
            work_minutes: 0,
            ..Settings::default()
        };
        assert_eq!(
            zero_work.validate(),
            Err(ValidationError::OutOfRange {
                field: "workMinutes",
                min: 1.0,
                max: 60.0,
                value: 0.0,
            })
        );

        let long_break = Settings {
            break_minutes: 31,
            ..Settings::default()
        };
        assert!(long_break.validate().is_err());

        let short_long_break = Settings {
            long_break_minutes: 4,
            ..Settings::default()
        };
        assert!(short_long_break.validate().is_err());

        let loud = Settings {
            volume: 1.5,
            ..Settings::default()
        };
        assert!(loud.validate().is_err());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"workMinutes": 50, "volume": 0.3}"#).unwrap();

        assert_eq!(settings.work_minutes, 50);
        assert_eq!(settings.break_minutes, 5);
        assert_eq!(settings.long_break_minutes, 15);
        assert_eq!(settings.volume, 0.3);
        assert!(settings.use_notifications);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["workMinutes"], 25);
        assert_eq!(json["longBreakMinutes"], 15);
        assert_eq!(json["useNotifications"], true);
    }
}
