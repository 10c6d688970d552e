//! # btprint - Bluetooth Thermal Printer Bridge
//!
//! btprint drives ESC/POS thermal receipt printers over a Bluetooth serial
//! (RFCOMM) link and exposes a small, fixed call surface to host
//! applications. It provides:
//!
//! - **Print encoding**: size presets, control sequences, Latin-1 text
//! - **Session management**: one printer connection, lazy drop detection
//! - **Transport**: raw RFCOMM sockets and a BlueZ adapter (Linux)
//! - **Call surface**: named-call dispatch, served over HTTP
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use btprint::{
//!     notify::LogNotifier,
//!     session::PrinterSession,
//!     transport::BluezAdapter,
//! };
//!
//! # async fn example() {
//! let session = PrinterSession::new(
//!     Some(Arc::new(BluezAdapter::default())),
//!     Arc::new(LogNotifier),
//! );
//!
//! if session.connect("00:11:22:33:44:55").await {
//!     session.print_text("3//TOTAL 12.50\n").await;
//!     session.write_bytes(&[0x1B, 0x64, 0x03]).await;
//!     session.disconnect().await;
//! }
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | ESC/POS byte builders |
//! | [`session`] | Connection lifecycle |
//! | [`transport`] | Bluetooth adapter and socket backends |
//! | [`dispatch`] | Named-call routing |
//! | [`server`] | HTTP front for the call surface |
//! | [`host`] | Platform version and battery queries |
//! | [`notify`] | User notification side channel |
//! | [`config`] | Runtime settings |
//! | [`error`] | Error types |

pub mod config;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod notify;
pub mod protocol;
pub mod server;
pub mod session;
pub mod transport;

// Re-exports for convenience
pub use error::PrinterError;
pub use session::{ConnectionState, PrinterSession, SessionStatus};
pub use transport::BluezAdapter;
