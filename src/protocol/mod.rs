//! # ESC/POS Print Encoding
//!
//! Pure byte builders for the two write paths the bridge offers. Nothing in
//! here performs I/O; the session writes whatever these functions return.
//!
//! ## Module Structure
//!
//! - [`commands`]: Fixed control sequences and raw-write framing
//! - [`text`]: Size presets and the formatted text print
//! - [`latin1`]: ISO-8859-1 text encoding
//! - [`directive`]: `<n>//<text>` argument parsing
//!
//! ## Usage Example
//!
//! ```
//! use btprint::protocol::{commands, directive::PrintDirective};
//!
//! let print = PrintDirective::parse("3//TOTAL 12.50").unwrap().encode();
//! let raw = commands::encode_raw_write(&[0x1B, 0x64, 0x03]);
//!
//! assert_eq!(&print[..2], &commands::CANCEL_CHINESE_MODE);
//! assert_eq!(raw[0], commands::LF);
//! ```

pub mod commands;
pub mod directive;
pub mod latin1;
pub mod text;
