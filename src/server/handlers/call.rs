//! Named call handler.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::dispatch::MethodResponse;

use super::super::state::AppState;

/// Request body for a call. Both the body and `arguments` may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct CallRequest {
    #[serde(default)]
    pub arguments: Value,
}

/// Handle POST /api/call/:method - run one named call.
pub async fn call(
    State(state): State<Arc<AppState>>,
    Path(method): Path<String>,
    body: Option<Json<CallRequest>>,
) -> Response {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let response = state.bridge.handle(&method, &request.arguments).await;

    let status = match response {
        MethodResponse::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        _ => StatusCode::OK,
    };
    (status, Json(response)).into_response()
}
