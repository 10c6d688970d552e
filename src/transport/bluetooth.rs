//! # BlueZ Adapter
//!
//! [`BluetoothAdapter`] backed by the Linux BlueZ stack.
//!
//! ## Bluetooth Setup (Linux)
//!
//! The printer must be paired before the bridge can open it:
//!
//! ```bash
//! $ bluetoothctl
//! [bluetooth]# power on
//! [bluetooth]# scan on
//! # Note the address, e.g., 00:11:22:XX:XX:XX
//! [bluetooth]# pair 00:11:22:XX:XX:XX
//! [bluetooth]# trust 00:11:22:XX:XX:XX
//! ```
//!
//! No `rfcomm bind` step is needed; sockets are opened directly.
//!
//! ## Adapter Queries
//!
//! Power state and the pairing store are read by running `bluetoothctl`:
//!
//! - `bluetoothctl show` → `Powered: yes`
//! - `bluetoothctl devices Paired` (falls back to `paired-devices` on
//!   BlueZ < 5.65) → `Device XX:XX:XX:XX:XX:XX Name`
//!
//! ## Service Lookup
//!
//! No SDP query is made. The Serial Port Profile UUID maps to a configured
//! RFCOMM channel (1 by default, which is where nearly every receipt
//! printer listens). Any other service UUID is rejected.

use std::process::Command;
use std::time::Duration;

use uuid::Uuid;

use super::{BdAddr, BluetoothAdapter, DEFAULT_RFCOMM_CHANNEL, PairedDevice, SPP_UUID, SerialSocket};
use crate::error::PrinterError;

/// Default send timeout applied to opened sockets.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// BlueZ-backed adapter.
#[derive(Debug, Clone)]
pub struct BluezAdapter {
    channel: u8,
    write_timeout: Duration,
}

impl Default for BluezAdapter {
    fn default() -> Self {
        Self {
            channel: DEFAULT_RFCOMM_CHANNEL,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

impl BluezAdapter {
    pub fn new(channel: u8, write_timeout: Duration) -> Self {
        Self {
            channel,
            write_timeout,
        }
    }
}

impl BluetoothAdapter for BluezAdapter {
    fn is_enabled(&self) -> bool {
        match bluetoothctl(&["show"]) {
            Ok(stdout) => parse_powered(&stdout),
            Err(e) => {
                tracing::debug!("adapter query failed: {}", e);
                false
            }
        }
    }

    fn bonded_devices(&self) -> Result<Vec<PairedDevice>, PrinterError> {
        let stdout = match bluetoothctl(&["devices", "Paired"]) {
            Ok(out) if !out.trim().is_empty() => out,
            _ => bluetoothctl(&["paired-devices"])?,
        };
        Ok(parse_devices(&stdout))
    }

    fn open_serial(
        &self,
        address: &BdAddr,
        service: Uuid,
    ) -> Result<Box<dyn SerialSocket>, PrinterError> {
        if service != SPP_UUID {
            return Err(PrinterError::Transport(format!(
                "No RFCOMM channel known for service {}",
                service
            )));
        }
        open_rfcomm(address, self.channel, self.write_timeout)
    }
}

#[cfg(target_os = "linux")]
fn open_rfcomm(
    address: &BdAddr,
    channel: u8,
    write_timeout: Duration,
) -> Result<Box<dyn SerialSocket>, PrinterError> {
    let socket = super::rfcomm::RfcommSocket::connect(address, channel, write_timeout)?;
    Ok(Box::new(socket))
}

#[cfg(not(target_os = "linux"))]
fn open_rfcomm(
    _address: &BdAddr,
    _channel: u8,
    _write_timeout: Duration,
) -> Result<Box<dyn SerialSocket>, PrinterError> {
    Err(PrinterError::Transport(
        "RFCOMM sockets are not supported on this platform".to_string(),
    ))
}

/// Run `bluetoothctl` with the given arguments and return its stdout.
fn bluetoothctl(args: &[&str]) -> Result<String, PrinterError> {
    let output = Command::new("bluetoothctl")
        .args(args)
        .output()
        .map_err(|e| PrinterError::Adapter(format!("Failed to run bluetoothctl: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PrinterError::Adapter(format!(
            "bluetoothctl {} failed: {}",
            args.join(" "),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Find `Powered: yes` in `bluetoothctl show` output.
fn parse_powered(stdout: &str) -> bool {
    stdout.lines().any(|line| {
        let line = line.trim();
        line.strip_prefix("Powered:")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("yes"))
    })
}

/// Parse `Device <addr> <name>` lines. Other lines (prompts, `[CHG]`
/// notices) are skipped.
fn parse_devices(stdout: &str) -> Vec<PairedDevice> {
    stdout
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("Device ")?;
            let (address, name) = match rest.split_once(' ') {
                Some((a, n)) => (a, n.trim()),
                None => (rest, ""),
            };
            if !super::address::is_valid_mac(address) {
                return None;
            }
            Some(PairedDevice::new(name, address))
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
