//! Server state and configuration.

use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::dispatch::Bridge;
use crate::notify::NotificationLog;

/// Application state shared across handlers.
pub struct AppState {
    pub config: BridgeConfig,
    pub bridge: Bridge,
    /// Notifications raised by the session, waiting for the host
    pub notifications: Arc<NotificationLog>,
}

impl AppState {
    pub fn new(config: BridgeConfig, bridge: Bridge, notifications: Arc<NotificationLog>) -> Self {
        Self {
            config,
            bridge,
            notifications,
        }
    }
}
