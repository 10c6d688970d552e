//! Bluetooth device addresses.

use std::fmt;
use std::str::FromStr;

use crate::error::PrinterError;

/// A 6-byte Bluetooth device address, stored most significant byte first
/// (the order it is written in `XX:XX:XX:XX:XX:XX`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BdAddr([u8; 6]);

impl BdAddr {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Byte order BlueZ expects in `sockaddr_rc` (least significant first).
    pub fn to_bluez(&self) -> [u8; 6] {
        let mut b = self.0;
        b.reverse();
        b
    }
}

impl FromStr for BdAddr {
    type Err = PrinterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(PrinterError::InvalidAddress(s.to_string()));
        }
        let mut bytes = [0u8; 6];
        for (slot, part) in bytes.iter_mut().zip(&parts) {
            if part.len() != 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(PrinterError::InvalidAddress(s.to_string()));
            }
            *slot = u8::from_str_radix(part, 16)
                .map_err(|_| PrinterError::InvalidAddress(s.to_string()))?;
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// Validate a Bluetooth MAC address format (XX:XX:XX:XX:XX:XX).
pub fn is_valid_mac(mac: &str) -> bool {
    mac.parse::<BdAddr>().is_ok()
}
