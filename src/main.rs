//! Pomodoro Server - A Pomodoro timer with persisted settings and statistics
//!
//! This is the main entry point for the pomodoro-server application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_server::{
    config::Config,
    state::{format_clock, AppState},
    api::create_router,
    services::DesktopAnnouncer,
    tasks::{countdown_task, notification_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_server={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-server v{}", env!("CARGO_PKG_VERSION"));
    if config.memory {
        info!("Configuration: host={}, port={}, store=memory", config.host, config.port);
    } else {
        info!(
            "Configuration: host={}, port={}, store={}",
            config.host,
            config.port,
            config.data_dir().display()
        );
    }

    // Create application state, restoring the last snapshot
    let store = config.open_store()?;
    let state = Arc::new(AppState::new(config.port, config.host.clone(), store));

    let timer = state.get_timer_state()?;
    info!(
        "Timer: mode={}, remaining={}, paused={}",
        timer.mode,
        format_clock(timer.time_left),
        timer.is_paused
    );

    // Start the background tasks
    tokio::spawn(countdown_task(Arc::clone(&state)));
    tokio::spawn(notification_task(Arc::clone(&state), Arc::new(DesktopAnnouncer)));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET/POST /api/settings         - Read or save settings");
    info!("  GET/POST /api/timer-state      - Read or replace timer state");
    info!("  POST     /api/timer/start      - Start the countdown");
    info!("  POST     /api/timer/pause      - Pause the countdown");
    info!("  POST     /api/timer/toggle     - Start or pause");
    info!("  POST     /api/timer/reset      - Rewind the current mode");
    info!("  POST     /api/timer/mode/:mode - Switch to working, shortBreak or longBreak");
    info!("  GET      /api/stats            - Session statistics");
    info!("  GET      /api/status           - Timer display and server status");
    info!("  GET      /health               - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.flush()?;
    info!("Server shutdown complete");
    Ok(())
}
