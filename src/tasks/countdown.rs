//! Countdown background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that ticks the timer once per second while it runs.
///
/// Pausing disarms the interval; resuming re-arms it so the first tick lands
/// one full period after the resume.
pub async fn countdown_task(state: Arc<AppState>) {
    info!("Starting countdown task");

    let mut updates = state.subscribe_timer();

    loop {
        if updates.borrow_and_update().is_paused {
            debug!("Timer paused, countdown disarmed");
            if updates.changed().await.is_err() {
                break;
            }
            continue;
        }

        debug!("Timer running, countdown armed");
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = state.tick() {
                        error!("Failed to advance timer: {}", e);
                    }
                }

                changed = updates.changed() => {
                    if changed.is_err() {
                        info!("Timer updates closed, stopping countdown task");
                        return;
                    }
                    if updates.borrow_and_update().is_paused {
                        break;
                    }
                }
            }
        }
    }

    info!("Countdown task stopped");
}
