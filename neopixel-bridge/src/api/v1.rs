//! API version 1 endpoints.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::relay::NotificationRelay;

/// Shared application state for API endpoints.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay that turns notifications into device commands
    pub relay: NotificationRelay,
    /// What `/info` reports
    pub info: InfoResponse,
}

impl AppState {
    pub fn new(relay: NotificationRelay, config: &Config) -> Self {
        Self {
            relay,
            info: InfoResponse {
                text: config.text.clone(),
                device: config.device.path.clone(),
                baud_rate: config.device.baud_rate,
            },
        }
    }
}

/// Notification request payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationRequest {
    /// Notification name, e.g. "NeoPixel" or "SHOW_ALERT"
    pub notification: String,
    /// Notification payload; null when absent
    #[serde(default)]
    pub payload: Value,
}

/// Info response payload.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InfoResponse {
    /// Display label
    pub text: String,
    /// Serial device path
    pub device: String,
    /// Serial baud rate
    pub baud_rate: u32,
}

/// Health check endpoint handler.
async fn health() -> &'static str {
    "OK"
}

/// Info endpoint handler.
async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(state.info)
}

/// Notification endpoint handler.
///
/// Always answers 202: the relay is fire-and-forget, so there is nothing to
/// report about whether the notification mattered or reached the device.
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:7786/api/v1/notification \
///    -H "Content-Type: application/json" \
///    -d '{"notification": "NeoPixel", "payload": {"state": "rainbow"}}'
/// ```
async fn notification(
    State(state): State<AppState>,
    Json(req): Json<NotificationRequest>,
) -> StatusCode {
    debug!(notification = %req.notification, "API notification");
    state.relay.notification_received(&req.notification, &req.payload);
    StatusCode::ACCEPTED
}

/// Build the v1 API routes.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/notification", post(notification))
        .with_state(state)
}
