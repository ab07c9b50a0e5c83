//! Completion notification background task

use std::sync::Arc;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{error, info, warn};

use crate::{
    services::{announce_completion, Announcer},
    state::{AppState, Completion},
};

/// Background task that announces every completed interval
pub async fn notification_task(state: Arc<AppState>, announcer: Arc<dyn Announcer>) {
    info!("Starting notification task");

    let completions = state.subscribe_completions();
    announce_completions(&state, completions, announcer.as_ref()).await;
}

/// Announce completions from `completions` until the channel closes
async fn announce_completions(
    state: &AppState,
    mut completions: Receiver<Completion>,
    announcer: &dyn Announcer,
) {
    loop {
        match completions.recv().await {
            Ok(completion) => {
                let settings = match state.get_settings() {
                    Ok(settings) => settings,
                    Err(e) => {
                        error!("Failed to read settings for notification: {}", e);
                        continue;
                    }
                };

                if let Err(e) = announce_completion(announcer, &completion, &settings).await {
                    warn!("Failed to announce completion: {}", e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Notification task lagged, skipped {} completions", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Completion channel closed, stopping notification task");
                break;
            }
        }
    }
}
