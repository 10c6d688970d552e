//! Session state and notification handlers.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use std::sync::Arc;

use super::super::state::AppState;

/// Handle GET /api/notifications - drain queued user notifications.
pub async fn notifications(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "notifications": state.notifications.drain() }))
}

/// Handle GET /api/state - report the connection state.
///
/// Reads the published status, so it answers immediately even while a
/// connect holds the session.
pub async fn state(State(state): State<Arc<AppState>>) -> Json<Value> {
    let status = state.bridge.session().status();
    Json(json!({
        "state": status.state.as_str(),
        "address": status.address,
    }))
}
