//! # Print Directives
//!
//! `printText` takes one string. An optional `<n>//` prefix picks the size
//! preset:
//!
//! ```text
//! "3//Hello"   -> size 3, "Hello"
//! "Hello"      -> size 2, "Hello"
//! "9//Hi"      -> size 5, "Hi"      (prefix clamped to 1..=5)
//! "big//Hi"    -> error
//! ```
//!
//! Only the first `//` is a delimiter; later ones belong to the text.

use crate::error::PrinterError;

use super::text::{self, DEFAULT_SIZE_INDEX, MAX_SIZE_INDEX};

/// Delimiter between the size prefix and the text.
pub const DELIMITER: &str = "//";

/// Smallest size a prefix can select. Preset 0 is only reachable through
/// [`text::encode_print_command`] directly.
pub const MIN_PREFIX_SIZE: i64 = 1;

/// A parsed `printText` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintDirective {
    pub size_index: u8,
    pub text: String,
}

impl PrintDirective {
    /// Parse a combined `<n>//<text>` argument.
    pub fn parse(argument: &str) -> Result<Self, PrinterError> {
        let Some((prefix, rest)) = argument.split_once(DELIMITER) else {
            return Ok(Self {
                size_index: DEFAULT_SIZE_INDEX,
                text: argument.to_string(),
            });
        };

        let size: i64 = prefix.parse().map_err(|_| {
            PrinterError::InvalidDirective(format!("size prefix {:?} is not an integer", prefix))
        })?;

        Ok(Self {
            size_index: size.clamp(MIN_PREFIX_SIZE, MAX_SIZE_INDEX as i64) as u8,
            text: rest.to_string(),
        })
    }

    /// Encode this directive into printer bytes.
    pub fn encode(&self) -> Vec<u8> {
        text::encode_print_command(self.size_index as i64, &self.text)
    }
}
