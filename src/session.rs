//! # Printer Session
//!
//! Owns the one Bluetooth serial connection the bridge allows and every
//! transition it goes through.
//!
//! ## State Machine
//!
//! ```text
//!                connect(addr)               open + is_connected ok
//! Disconnected ───────────────▶ Connecting ──────────────────────▶ Connected
//!      ▲                            │                                  │
//!      │  adapter off, bad address, │                                  │
//!      │  open error, timeout       │                                  │
//!      ├────────────────────────────┘                                  │
//!      │  disconnect(), or write / probe error (user notified)         │
//!      └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lazy Failure Detection
//!
//! Nothing polls the printer. A dropped link is only noticed when the next
//! write or liveness probe fails; at that point the stream is discarded, the
//! state falls back to `Disconnected`, and the user gets one notification.
//! A write with no stream at all just reports failure, so callers can tell
//! "never connected" apart from "dropped mid-session".
//!
//! ## Serialization
//!
//! Connect, disconnect, write and probe all hold the same async mutex for
//! their whole duration, so two calls can never interleave on the stream.
//! Blocking socket work runs on the blocking thread pool with the stream
//! moved in and handed back afterwards.
//!
//! Each of those operations runs on its own spawned task. Dropping the
//! caller's future (an HTTP client hanging up, a `select!` losing) only stops
//! the caller from waiting; the operation still finishes and leaves the
//! session consistent.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};

use crate::config::DEFAULT_CONNECT_TIMEOUT;
use crate::error::PrinterError;
use crate::notify::{DISCONNECTED_MESSAGE, Notifier};
use crate::protocol::commands;
use crate::protocol::directive::PrintDirective;
use crate::transport::{BdAddr, BluetoothAdapter, PairedDevice, SPP_UUID, SerialSocket};

/// Byte written by [`PrinterSession::is_alive`].
pub const PROBE: &[u8] = b" ";

/// Externally visible connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        }
    }
}

/// What watchers see: the state plus the address of the most recent
/// connect attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionStatus {
    pub state: ConnectionState,
    pub address: Option<String>,
}

#[derive(Default)]
struct SessionInner {
    /// Present only while the socket is believed open
    stream: Option<Box<dyn SerialSocket>>,
    /// Outcome of the most recent connect or disconnect
    last_attempt_succeeded: bool,
}

/// Shared half of the session. Every operation runs on a spawned task that
/// holds an `Arc<SessionCore>`, so a caller that stops waiting cannot leave
/// the stream taken out or the state half-updated.
struct SessionCore {
    adapter: Option<Arc<dyn BluetoothAdapter>>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<SessionInner>,
    status: watch::Sender<SessionStatus>,
}

/// The single printer connection.
pub struct PrinterSession {
    core: Arc<SessionCore>,
    connect_timeout: Duration,
}

impl PrinterSession {
    /// Create an empty session. `adapter` is `None` on hosts without
    /// Bluetooth hardware.
    pub fn new(adapter: Option<Arc<dyn BluetoothAdapter>>, notifier: Arc<dyn Notifier>) -> Self {
        let (status, _) = watch::channel(SessionStatus::default());
        Self {
            core: Arc::new(SessionCore {
                adapter,
                notifier,
                inner: Mutex::new(SessionInner::default()),
                status,
            }),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Give up on connect attempts after `timeout`.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.core.status.borrow().state
    }

    /// Address of the most recent connect attempt.
    pub fn address(&self) -> Option<String> {
        self.core.status.borrow().address.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.core.status.borrow().clone()
    }

    /// Watch state transitions without taking the session lock.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.core.status.subscribe()
    }

    pub async fn last_attempt_succeeded(&self) -> bool {
        self.core.inner.lock().await.last_attempt_succeeded
    }

    /// Run `op` to completion on its own task, even if the caller goes away.
    async fn detached<F, Fut>(&self, op: F) -> bool
    where
        F: FnOnce(Arc<SessionCore>) -> Fut,
        Fut: Future<Output = bool> + Send + 'static,
    {
        match tokio::spawn(op(self.core.clone())).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("session task failed: {}", e);
                false
            }
        }
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Open the printer connection.
    ///
    /// - Empty address: `false` without touching the adapter.
    /// - Already connected: no-op returning the previous outcome.
    /// - Otherwise: `true` once the socket is open and reports connected.
    pub async fn connect(&self, address: &str) -> bool {
        if address.is_empty() {
            tracing::debug!("connect ignored: empty address");
            return false;
        }
        let address = address.to_string();
        let timeout = self.connect_timeout;
        self.detached(move |core| async move { core.connect(address, timeout).await })
            .await
    }

    /// Close the printer connection.
    ///
    /// Returns `true` if a stream was open. Close errors are logged; the
    /// stream is dropped either way.
    pub async fn disconnect(&self) -> bool {
        self.detached(|core| async move { core.disconnect().await }).await
    }

    // ========================================================================
    // I/O
    // ========================================================================

    /// Write `data` in one operation.
    ///
    /// `false` if there is no stream, or if the write fails (in which case
    /// the stream is discarded and the user notified).
    pub async fn write(&self, data: Vec<u8>) -> bool {
        self.detached(move |core| async move { core.write(data).await })
            .await
    }

    /// Probe the link by writing a single space.
    pub async fn is_alive(&self) -> bool {
        self.write(PROBE.to_vec()).await
    }

    /// Frame caller byte values with a leading newline and write them.
    pub async fn write_bytes(&self, values: &[i64]) -> bool {
        self.write(commands::encode_raw_write(values)).await
    }

    /// Parse a `<n>//<text>` argument, encode it, and write it.
    ///
    /// An unparseable size prefix fails the call without writing anything.
    pub async fn print_text(&self, argument: &str) -> bool {
        match PrintDirective::parse(argument) {
            Ok(directive) => self.write(directive.encode()).await,
            Err(e) => {
                tracing::warn!("print rejected: {}", e);
                false
            }
        }
    }

    // ========================================================================
    // ADAPTER QUERIES
    // ========================================================================

    /// Whether an adapter exists and is powered on.
    pub async fn adapter_enabled(&self) -> bool {
        let Some(adapter) = self.core.adapter.clone() else {
            return false;
        };
        tokio::task::spawn_blocking(move || adapter.is_enabled())
            .await
            .unwrap_or(false)
    }

    /// Paired devices, or nothing if the adapter is absent, off, or
    /// unreadable. Never touches the session.
    pub async fn paired_devices(&self) -> Vec<PairedDevice> {
        let Some(adapter) = self.core.adapter.clone() else {
            return Vec::new();
        };
        let listed = tokio::task::spawn_blocking(move || {
            if !adapter.is_enabled() {
                return Ok(Vec::new());
            }
            adapter.bonded_devices()
        })
        .await;

        match listed {
            Ok(Ok(devices)) => devices,
            Ok(Err(e)) => {
                tracing::warn!("listing paired devices failed: {}", e);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("paired device task failed: {}", e);
                Vec::new()
            }
        }
    }
}

impl SessionCore {
    fn publish(&self, state: ConnectionState) {
        self.status.send_modify(|status| status.state = state);
    }

    fn current_address(&self) -> Option<String> {
        self.status.borrow().address.clone()
    }

    async fn connect(&self, address: String, timeout: Duration) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.stream.is_some() {
            tracing::debug!(%address, "connect ignored: already connected");
            return inner.last_attempt_succeeded;
        }

        self.status.send_replace(SessionStatus {
            state: ConnectionState::Connecting,
            address: Some(address.clone()),
        });
        tracing::info!(%address, "connecting to printer");

        match self.open_stream(&address, timeout).await {
            Ok(stream) => {
                inner.stream = Some(stream);
                inner.last_attempt_succeeded = true;
                self.publish(ConnectionState::Connected);
                tracing::info!(%address, "printer connected");
            }
            Err(e) => {
                inner.last_attempt_succeeded = false;
                self.publish(ConnectionState::Disconnected);
                tracing::warn!(%address, "connect failed: {}", e);
            }
        }
        inner.last_attempt_succeeded
    }

    async fn open_stream(
        &self,
        address: &str,
        timeout: Duration,
    ) -> Result<Box<dyn SerialSocket>, PrinterError> {
        let adapter = self
            .adapter
            .clone()
            .ok_or_else(|| PrinterError::Adapter("No Bluetooth adapter present".to_string()))?;
        let address = address.to_string();

        let task = tokio::task::spawn_blocking(move || {
            if !adapter.is_enabled() {
                return Err(PrinterError::Adapter("Bluetooth adapter is disabled".to_string()));
            }
            let addr: BdAddr = address.parse()?;
            let socket = adapter.open_serial(&addr, SPP_UUID)?;
            if !socket.is_connected() {
                return Err(PrinterError::Transport(format!(
                    "Socket to {} not connected after open",
                    addr
                )));
            }
            Ok(socket)
        });

        // On timeout the blocking task is detached; whatever it opens late is
        // dropped, which closes it.
        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(PrinterError::Transport(format!("Connect task failed: {}", e))),
            Err(_) => Err(PrinterError::Timeout(timeout)),
        }
    }

    async fn disconnect(&self) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(mut stream) = inner.stream.take() else {
            tracing::debug!("disconnect ignored: no open stream");
            return false;
        };
        inner.last_attempt_succeeded = false;

        let address = self.current_address();
        match tokio::task::spawn_blocking(move || stream.close()).await {
            Ok(Ok(())) => tracing::info!(?address, "printer disconnected"),
            Ok(Err(e)) => tracing::warn!(?address, "close failed: {}", e),
            Err(e) => tracing::warn!(?address, "close task failed: {}", e),
        }
        self.publish(ConnectionState::Disconnected);
        true
    }

    async fn write(&self, data: Vec<u8>) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(mut stream) = inner.stream.take() else {
            tracing::debug!("write skipped: not connected");
            return false;
        };

        let len = data.len();
        let outcome = tokio::task::spawn_blocking(move || {
            let result = stream.write_all(&data);
            (stream, result)
        })
        .await;

        match outcome {
            Ok((stream, Ok(()))) => {
                inner.stream = Some(stream);
                tracing::trace!(bytes = len, "wrote to printer");
                true
            }
            Ok((_, Err(e))) => {
                self.drop_connection(&e.to_string());
                false
            }
            Err(e) => {
                self.drop_connection(&e.to_string());
                false
            }
        }
    }

    /// The stream has already been taken out of the session; record the loss.
    fn drop_connection(&self, reason: &str) {
        self.publish(ConnectionState::Disconnected);
        tracing::warn!(address = ?self.current_address(), "printer link lost: {}", reason);
        self.notifier.notify(DISCONNECTED_MESSAGE);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationLog;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Socket whose writes succeed until `fail` is set.
    struct FlakySocket {
        fail: Arc<AtomicBool>,
    }

    impl SerialSocket for FlakySocket {
        fn is_connected(&self) -> bool {
            true
        }

        fn write_all(&mut self, _data: &[u8]) -> Result<(), PrinterError> {
            if self.fail.load(Ordering::SeqCst) {
                Err(PrinterError::Transport("Broken pipe".to_string()))
            } else {
                Ok(())
            }
        }

        fn close(&mut self) -> Result<(), PrinterError> {
            Ok(())
        }
    }

    struct OneSocketAdapter {
        opens: AtomicUsize,
        fail: Arc<AtomicBool>,
    }

    impl BluetoothAdapter for OneSocketAdapter {
        fn is_enabled(&self) -> bool {
            true
        }

        fn bonded_devices(&self) -> Result<Vec<PairedDevice>, PrinterError> {
            Ok(vec![PairedDevice::new("P", "00:11:22:33:44:55")])
        }

        fn open_serial(
            &self,
            _address: &BdAddr,
            _service: uuid::Uuid,
        ) -> Result<Box<dyn SerialSocket>, PrinterError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FlakySocket {
                fail: self.fail.clone(),
            }))
        }
    }

    fn session() -> (PrinterSession, Arc<OneSocketAdapter>, Arc<NotificationLog>) {
        let adapter = Arc::new(OneSocketAdapter {
            opens: AtomicUsize::new(0),
            fail: Arc::new(AtomicBool::new(false)),
        });
        let log = Arc::new(NotificationLog::default());
        let session = PrinterSession::new(Some(adapter.clone()), log.clone());
        (session, adapter, log)
    }

    #[tokio::test]
    async fn test_state_transitions() {
        let (session, _, _) = session();
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert!(session.connect("00:11:22:33:44:55").await);
        assert_eq!(session.state(), ConnectionState::Connected);
        assert!(session.disconnect().await);
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert!(!session.last_attempt_succeeded().await);
    }

    #[tokio::test]
    async fn test_failed_write_notifies_once() {
        let (session, adapter, log) = session();
        assert!(session.connect("00:11:22:33:44:55").await);
        adapter.fail.store(true, Ordering::SeqCst);

        assert!(!session.write(b"x".to_vec()).await);
        assert!(!session.write(b"x".to_vec()).await);
        assert!(!session.is_alive().await);

        assert_eq!(log.drain(), vec![DISCONNECTED_MESSAGE.to_string()]);
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_reconnect_after_drop_opens_new_socket() {
        let (session, adapter, _) = session();
        assert!(session.connect("00:11:22:33:44:55").await);
        adapter.fail.store(true, Ordering::SeqCst);
        assert!(!session.is_alive().await);

        adapter.fail.store(false, Ordering::SeqCst);
        assert!(session.connect("00:11:22:33:44:55").await);
        assert!(session.is_alive().await);
        assert_eq!(adapter.opens.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_bad_directive_writes_nothing() {
        let (session, _, log) = session();
        assert!(session.connect("00:11:22:33:44:55").await);
        assert!(!session.print_text("big//hello").await);
        // Session untouched
        assert_eq!(session.state(), ConnectionState::Connected);
        assert!(log.is_empty());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(ConnectionState::Connecting.as_str(), "connecting");
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
    }
}
