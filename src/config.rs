//! Bridge configuration.

use std::time::Duration;

use crate::transport::bluetooth::DEFAULT_WRITE_TIMEOUT;
use crate::transport::DEFAULT_RFCOMM_CHANNEL;

/// Default deadline for opening the printer socket.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default HTTP listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8420";

/// Runtime settings for the session and the HTTP surface.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Give up on a connect attempt after this long
    pub connect_timeout: Duration,
    /// Per-send timeout applied to opened sockets
    pub write_timeout: Duration,
    /// RFCOMM channel the Serial Port Profile is served on
    pub rfcomm_channel: u8,
    /// Address to listen on (e.g., "0.0.0.0:8420")
    pub listen_addr: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            rfcomm_channel: DEFAULT_RFCOMM_CHANNEL,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}
