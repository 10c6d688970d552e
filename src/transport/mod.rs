//! # Printer Transport Layer
//!
//! The session talks to Bluetooth through two traits so the connection
//! logic can run against real hardware or in-memory fakes.
//!
//! ## Seams
//!
//! - [`BluetoothAdapter`]: enable check, bonded devices, socket open
//! - [`SerialSocket`]: one open RFCOMM byte stream
//!
//! ## Available Backends
//!
//! - [`bluetooth`]: BlueZ adapter driven through `bluetoothctl` (Linux)
//! - [`rfcomm`]: raw `AF_BLUETOOTH` RFCOMM socket (Linux)

pub mod address;
pub mod bluetooth;
#[cfg(target_os = "linux")]
pub mod rfcomm;

pub use address::BdAddr;
pub use bluetooth::BluezAdapter;

use uuid::Uuid;

use crate::error::PrinterError;

/// Serial Port Profile service UUID. Printers advertise their RFCOMM
/// channel under this exact value.
pub const SPP_UUID: Uuid = Uuid::from_u128(0x00001101_0000_1000_8000_00805F9B34FB);

/// RFCOMM channel most receipt printers serve SPP on.
pub const DEFAULT_RFCOMM_CHANNEL: u8 = 1;

/// A device from the adapter's pairing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedDevice {
    pub name: String,
    pub address: String,
}

impl PairedDevice {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// `name#address`, the form `bluetothLinked` returns.
    pub fn to_linked_string(&self) -> String {
        format!("{}#{}", self.name, self.address)
    }
}

/// Platform Bluetooth adapter.
///
/// All methods may block.
pub trait BluetoothAdapter: Send + Sync {
    /// Whether the adapter is powered on.
    fn is_enabled(&self) -> bool;

    /// Devices currently bonded with this adapter.
    fn bonded_devices(&self) -> Result<Vec<PairedDevice>, PrinterError>;

    /// Open a serial socket to `address` for the given service.
    fn open_serial(
        &self,
        address: &BdAddr,
        service: Uuid,
    ) -> Result<Box<dyn SerialSocket>, PrinterError>;
}

/// One open RFCOMM byte stream.
///
/// All methods may block. Dropping the socket closes it.
pub trait SerialSocket: Send {
    /// Whether the socket still reports an established link.
    fn is_connected(&self) -> bool;

    /// Write the whole buffer or fail.
    fn write_all(&mut self, data: &[u8]) -> Result<(), PrinterError>;

    /// Close the socket. Further writes fail.
    fn close(&mut self) -> Result<(), PrinterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spp_uuid_bit_exact() {
        assert_eq!(
            SPP_UUID.hyphenated().to_string().to_uppercase(),
            "00001101-0000-1000-8000-00805F9B34FB"
        );
    }

    #[test]
    fn test_linked_string() {
        let d = PairedDevice::new("MTP-II", "00:11:22:33:44:55");
        assert_eq!(d.to_linked_string(), "MTP-II#00:11:22:33:44:55");
    }
}
