//! # HTTP Call Surface
//!
//! Exposes the dispatch boundary to host applications as JSON over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! btprint serve --listen 127.0.0.1:8420
//!
//! curl -X POST localhost:8420/api/call/connectPrinter \
//!      -H 'content-type: application/json' \
//!      -d '{"arguments": "00:11:22:33:44:55"}'
//! # {"status":"success","value":"true"}
//!
//! curl -X POST localhost:8420/api/call/printText \
//!      -H 'content-type: application/json' \
//!      -d '{"arguments": "3//TOTAL 12.50\n"}'
//! ```
//!
//! ## Routes
//!
//! | Route | Description |
//! |-------|-------------|
//! | `POST /api/call/:method` | Run a named call; body `{"arguments": ...}` is optional |
//! | `GET /api/notifications` | Drain pending user notifications |
//! | `GET /api/state` | Current connection state |

mod handlers;
mod state;

pub use state::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::PrinterError;

/// Build the router. Split out from [`serve`] so tests can drive it
/// without binding a socket.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/call/:method", post(handlers::call::call))
        .route("/api/notifications", get(handlers::status::notifications))
        .route("/api/state", get(handlers::status::state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use btprint::{
///     config::BridgeConfig, dispatch::Bridge, host::LinuxHost,
///     notify::NotificationLog, server::{serve, AppState},
///     session::PrinterSession, transport::BluezAdapter,
/// };
///
/// # async fn example() -> Result<(), btprint::error::PrinterError> {
/// let config = BridgeConfig::default();
/// let notifications = Arc::new(NotificationLog::default());
/// let adapter = Arc::new(BluezAdapter::default());
/// let session = PrinterSession::new(Some(adapter), notifications.clone());
/// let bridge = Bridge::new(Arc::new(session), Arc::new(LinuxHost::default()));
///
/// serve(AppState::new(config, bridge, notifications)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(state: AppState) -> Result<(), PrinterError> {
    let listen_addr = state.config.listen_addr.clone();
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| PrinterError::Transport(format!("Failed to bind to {}: {}", listen_addr, e)))?;

    tracing::info!("btprint bridge listening on http://{}", listen_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| PrinterError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
