//! Completion cue and desktop notifications

use std::{
    io::Write,
    time::Duration,
};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::state::{Completion, Mode, Settings};

/// Audible cue played when an interval ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotificationCue {
    pub frequency_hz: f64,
    pub duration: Duration,
    pub volume: f64,
}

impl NotificationCue {
    /// A5 sine beep lasting 200ms
    pub fn chime(volume: f64) -> Self {
        Self {
            frequency_hz: 880.0,
            duration: Duration::from_millis(200),
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn is_audible(&self) -> bool {
        self.volume > 0.0
    }
}

/// Output channels used to announce a completion
#[async_trait]
pub trait Announcer: Send + Sync {
    /// Play an audible cue
    async fn play_cue(&self, cue: NotificationCue) -> Result<(), String>;

    /// Show a notification to the user
    async fn notify(&self, title: &str, body: &str) -> Result<(), String>;
}

/// Terminal bell plus notify-send
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopAnnouncer;

#[async_trait]
impl Announcer for DesktopAnnouncer {
    async fn play_cue(&self, cue: NotificationCue) -> Result<(), String> {
        info!(
            "Playing cue: {}Hz for {}ms at volume {:.1}",
            cue.frequency_hz,
            cue.duration.as_millis(),
            cue.volume
        );

        tokio::task::spawn_blocking(|| {
            let mut stdout = std::io::stdout();
            stdout.write_all(b"\x07").and_then(|_| stdout.flush())
        })
        .await
        .map_err(|e| format!("Terminal bell task failed: {}", e))?
        .map_err(|e| format!("Failed to ring terminal bell: {}", e))
    }

    async fn notify(&self, title: &str, body: &str) -> Result<(), String> {
        send_desktop_notification(title, body).await
    }
}

/// Title and body describing a completion
pub fn completion_message(completion: &Completion) -> (String, String) {
    let title = match completion.finished {
        Mode::Working => "Work session complete",
        Mode::ShortBreak => "Short break over",
        Mode::LongBreak => "Long break over",
    };

    let body = match completion.next {
        Mode::Working => "Back to work.".to_string(),
        Mode::ShortBreak | Mode::LongBreak => format!(
            "Time for a {}. {} sessions completed so far.",
            completion.next.label(),
            completion.total_work_sessions
        ),
    };

    (title.to_string(), body)
}

/// Send a desktop notification through notify-send
pub async fn send_desktop_notification(title: &str, body: &str) -> Result<(), String> {
    debug!("Sending desktop notification: {}", title);

    let output = Command::new("notify-send")
        .args(["--app-name=pomodoro", title, body])
        .output()
        .await
        .map_err(|e| format!("Failed to execute notify-send: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("notify-send failed: {}", stderr));
    }

    Ok(())
}

/// Announce a completion according to the current settings.
///
/// A failed cue is logged and does not prevent the notification.
pub async fn announce_completion(
    announcer: &dyn Announcer,
    completion: &Completion,
    settings: &Settings,
) -> Result<(), String> {
    let (title, body) = completion_message(completion);
    info!("{}: {}", title, body);

    let cue = NotificationCue::chime(settings.volume);
    if cue.is_audible() {
        if let Err(e) = announcer.play_cue(cue).await {
            warn!("Failed to play completion cue: {}", e);
        }
    } else {
        debug!("Notification cue muted");
    }

    if settings.use_notifications {
        announcer.notify(&title, &body).await?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every cue and notification instead of emitting them
    #[derive(Debug, Default)]
    pub struct RecordingAnnouncer {
        pub cues: Mutex<Vec<NotificationCue>>,
        pub notifications: Mutex<Vec<(String, String)>>,
        pub fail_cue: bool,
    }

    impl RecordingAnnouncer {
        pub fn cues(&self) -> Vec<NotificationCue> {
            self.cues.lock().unwrap().clone()
        }

        pub fn notifications(&self) -> Vec<(String, String)> {
            self.notifications.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Announcer for RecordingAnnouncer {
        async fn play_cue(&self, cue: NotificationCue) -> Result<(), String> {
            self.cues.lock().unwrap().push(cue);
            if self.fail_cue {
                return Err("no terminal".to_string());
            }
            Ok(())
        }

        async fn notify(&self, title: &str, body: &str) -> Result<(), String> {
            self.notifications
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            Ok(())
        }
    }
}
