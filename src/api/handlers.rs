//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    error::TimerError,
    state::{format_clock, AppState, Mode, SessionStats, Settings, TimerState},
};
use super::responses::{ApiResponse, ErrorReply, ErrorResponse, HealthResponse, StatusResponse};

const INVALID_SETTINGS: &str = "Invalid settings data";
const INVALID_TIMER_STATE: &str = "Invalid timer state data";

type ApiResult<T> = Result<Json<T>, ErrorReply>;

/// Map a failed state operation onto an HTTP answer
fn reject(context: &str, invalid_message: &str, e: TimerError) -> ErrorReply {
    if e.is_validation() {
        warn!("{}: {}", context, e);
        ErrorResponse::bad_request(invalid_message)
    } else {
        error!("{}: {}", context, e);
        ErrorResponse::internal()
    }
}

/// Handle GET /api/settings - Return current settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> ApiResult<Settings> {
    state
        .get_settings()
        .map(Json)
        .map_err(|e| reject("Failed to get settings", INVALID_SETTINGS, e))
}

/// Handle POST /api/settings - Validate and save settings
pub async fn save_settings_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Settings>, JsonRejection>,
) -> ApiResult<Settings> {
    let Json(settings) = payload.map_err(|e| {
        warn!("Rejected settings payload: {}", e.body_text());
        ErrorResponse::bad_request(INVALID_SETTINGS)
    })?;

    let saved = state
        .save_settings(settings)
        .map_err(|e| reject("Rejected settings", INVALID_SETTINGS, e))?;

    info!("Settings endpoint called - settings saved");
    Ok(Json(saved))
}

/// Handle GET /api/timer-state - Return current timer state
pub async fn get_timer_state_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerState> {
    state
        .get_timer_state()
        .map(Json)
        .map_err(|e| reject("Failed to get timer state", INVALID_TIMER_STATE, e))
}

/// Handle POST /api/timer-state - Replace the timer state
pub async fn save_timer_state_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TimerState>, JsonRejection>,
) -> ApiResult<TimerState> {
    let Json(timer_state) = payload.map_err(|e| {
        warn!("Rejected timer state payload: {}", e.body_text());
        ErrorResponse::bad_request(INVALID_TIMER_STATE)
    })?;

    state
        .replace_timer_state(timer_state)
        .map(Json)
        .map_err(|e| reject("Failed to replace timer state", INVALID_TIMER_STATE, e))
}

/// Handle POST /api/timer/start - Start the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let timer = state
        .start()
        .map_err(|e| reject("Failed to start timer", INVALID_TIMER_STATE, e))?;
    Ok(Json(ApiResponse::for_timer(
        format!("{} started", timer.mode.label()),
        timer,
    )))
}

/// Handle POST /api/timer/pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let timer = state
        .pause()
        .map_err(|e| reject("Failed to pause timer", INVALID_TIMER_STATE, e))?;
    Ok(Json(ApiResponse::for_timer(
        format!("{} paused", timer.mode.label()),
        timer,
    )))
}

/// Handle POST /api/timer/toggle - Flip between running and paused
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let timer = state
        .toggle()
        .map_err(|e| reject("Failed to toggle timer", INVALID_TIMER_STATE, e))?;
    let verb = if timer.is_paused { "paused" } else { "started" };
    Ok(Json(ApiResponse::for_timer(
        format!("{} {}", timer.mode.label(), verb),
        timer,
    )))
}

/// Handle POST /api/timer/reset - Rewind the active mode
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let timer = state
        .reset()
        .map_err(|e| reject("Failed to reset timer", INVALID_TIMER_STATE, e))?;
    Ok(Json(ApiResponse::for_timer(
        format!("{} reset to {}", timer.mode.label(), format_clock(timer.time_left)),
        timer,
    )))
}

/// Handle POST /api/timer/mode/:mode - Switch mode and pause
pub async fn select_mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode_name): Path<String>,
) -> ApiResult<ApiResponse> {
    let mode: Mode = mode_name.parse().map_err(|e| {
        warn!("Rejected mode selection: {}", e);
        ErrorResponse::bad_request(format!("Unknown mode: {}", mode_name))
    })?;

    let timer = state
        .select_mode(mode)
        .map_err(|e| reject("Failed to select mode", INVALID_TIMER_STATE, e))?;
    Ok(Json(ApiResponse::for_timer(
        format!("Switched to {}", mode.label()),
        timer,
    )))
}

/// Handle GET /api/stats - Return session statistics
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> ApiResult<SessionStats> {
    state
        .get_timer_state()
        .map(|timer| Json(timer.stats()))
        .map_err(|e| reject("Failed to get stats", INVALID_TIMER_STATE, e))
}

/// Handle GET /api/status - Return timer display values and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let (timer, total_seconds, progress) = state
        .with_controller(|c| (c.state().clone(), c.total_seconds(), c.progress()))
        .map_err(|e| reject("Failed to get timer status", INVALID_TIMER_STATE, e))?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        mode: timer.mode,
        is_paused: timer.is_paused,
        time_left: timer.time_left,
        total_seconds,
        clock: format_clock(timer.time_left),
        progress,
        stats: timer.stats(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
