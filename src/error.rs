//! # Error Types
//!
//! This module defines error types used throughout the btprint library.
//!
//! None of these cross the call boundary as-is: the session manager and the
//! dispatcher fold them into boolean results, error codes, or user
//! notifications.

use std::time::Duration;

use thiserror::Error;

/// Main error type for btprint operations
#[derive(Debug, Error)]
pub enum PrinterError {
    /// Transport-level errors (socket open, write, close)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Bluetooth adapter missing, powered off, or unreadable
    #[error("Adapter error: {0}")]
    Adapter(String),

    /// Address is not of the form XX:XX:XX:XX:XX:XX
    #[error("Invalid Bluetooth address: {0:?}")]
    InvalidAddress(String),

    /// `printText` prefix could not be read as a size index
    #[error("Invalid print directive: {0}")]
    InvalidDirective(String),

    /// Character has no Latin-1 representation
    #[error("Character {ch:?} at index {index} is not representable in Latin-1")]
    Unencodable { ch: char, index: usize },

    /// Blocking operation exceeded its deadline
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
