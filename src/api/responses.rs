//! API response structures

use axum::{http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Mode, SessionStats, TimerState};

/// API response structure for timer action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a response whose status reflects whether the timer runs
    pub fn for_timer(message: impl Into<String>, timer: TimerState) -> Self {
        let status = if timer.is_paused { "paused" } else { "running" };
        Self::new(status.to_string(), message.into(), timer)
    }
}

/// Body returned with 4xx/5xx answers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

pub type ErrorReply = (StatusCode, Json<ErrorResponse>);

impl ErrorResponse {
    pub fn reply(status: StatusCode, message: impl Into<String>) -> ErrorReply {
        (
            status,
            Json(Self {
                message: message.into(),
            }),
        )
    }

    pub fn bad_request(message: impl Into<String>) -> ErrorReply {
        Self::reply(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal() -> ErrorReply {
        Self::reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

/// Full status with display values for the timer face
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub mode: Mode,
    pub is_paused: bool,
    pub time_left: u64,
    pub total_seconds: u64,
    /// Remaining time as MM:SS
    pub clock: String,
    pub progress: f64,
    pub stats: SessionStats,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
