//! # User Notifications
//!
//! Out-of-band messages for the person holding the device. The session only
//! sends one: when a printer drops mid-session.

use std::collections::VecDeque;
use std::sync::Mutex;

/// Message sent when a write or liveness probe finds the link dead.
pub const DISCONNECTED_MESSAGE: &str = "Device was disconnected, reconnect";

/// Side channel for user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(target: "btprint::notify", "{}", message);
    }
}

/// Bounded queue of notifications waiting for the host to pick them up.
///
/// When full, the oldest message is dropped.
#[derive(Debug)]
pub struct NotificationLog {
    capacity: usize,
    pending: Mutex<VecDeque<String>>,
}

impl NotificationLog {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Remove and return everything queued, oldest first.
    pub fn drain(&self) -> Vec<String> {
        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, message: &str) {
        tracing::warn!(target: "btprint::notify", "{}", message);
        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        if pending.len() == self.capacity {
            pending.pop_front();
        }
        pending.push_back(message.to_string());
    }
}
