//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/settings",
            get(get_settings_handler).post(save_settings_handler),
        )
        .route(
            "/api/timer-state",
            get(get_timer_state_handler).post(save_timer_state_handler),
        )
        // Controller actions
        .route("/api/timer/start", post(start_handler))
        .route("/api/timer/pause", post(pause_handler))
        .route("/api/timer/toggle", post(toggle_handler))
        .route("/api/timer/reset", post(reset_handler))
        .route("/api/timer/mode/:mode", post(select_mode_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
