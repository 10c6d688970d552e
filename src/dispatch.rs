//! # Call Dispatch
//!
//! Maps the fixed set of named calls onto the session, the encoder, and the
//! host queries.
//!
//! ## Call Surface
//!
//! | Call | Arguments | Result |
//! |------|-----------|--------|
//! | `getPlatformVersion` | none | string |
//! | `getBatteryLevel` | none | integer 0–100, or error `UNAVAILABLE` |
//! | `BluetoothStatus` | none | `"true"` / `"false"` |
//! | `connectionStatus` | none | `"true"` / `"false"` (probes the link) |
//! | `connectPrinter` | address string | `"true"` / `"false"` |
//! | `disconnectPrinter` | none | `"true"` / `"false"` |
//! | `writeBytes` | list of integers | `"true"` / `"false"` |
//! | `printText` | `[<n>//]<text>` | `"true"` / `"false"` |
//! | `bluetothLinked` | none | list of `"name#address"` |
//!
//! Anything else answers not-implemented. Boolean outcomes are the strings
//! `"true"` and `"false"`, which is what existing host apps compare against.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::host::HostInfo;
use crate::session::PrinterSession;

/// Error code for an unreadable battery.
pub const UNAVAILABLE: &str = "UNAVAILABLE";

/// Error code for arguments of the wrong shape.
pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";

/// The recognised calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GetPlatformVersion,
    GetBatteryLevel,
    BluetoothStatus,
    ConnectionStatus,
    ConnectPrinter,
    DisconnectPrinter,
    WriteBytes,
    PrintText,
    BluetoothLinked,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::GetPlatformVersion,
        Method::GetBatteryLevel,
        Method::BluetoothStatus,
        Method::ConnectionStatus,
        Method::ConnectPrinter,
        Method::DisconnectPrinter,
        Method::WriteBytes,
        Method::PrintText,
        Method::BluetoothLinked,
    ];

    /// Wire name. `bluetothLinked` is misspelled on purpose; host apps call
    /// it by that name.
    pub fn name(&self) -> &'static str {
        match self {
            Method::GetPlatformVersion => "getPlatformVersion",
            Method::GetBatteryLevel => "getBatteryLevel",
            Method::BluetoothStatus => "BluetoothStatus",
            Method::ConnectionStatus => "connectionStatus",
            Method::ConnectPrinter => "connectPrinter",
            Method::DisconnectPrinter => "disconnectPrinter",
            Method::WriteBytes => "writeBytes",
            Method::PrintText => "printText",
            Method::BluetoothLinked => "bluetothLinked",
        }
    }
}

impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL.into_iter().find(|m| m.name() == s).ok_or(())
    }
}

/// Outcome of one call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResponse {
    Success { value: Value },
    Error { code: String, message: String },
    NotImplemented,
}

impl MethodResponse {
    pub fn success(value: impl Into<Value>) -> Self {
        MethodResponse::Success {
            value: value.into(),
        }
    }

    /// `"true"` / `"false"` string result.
    pub fn flag(ok: bool) -> Self {
        Self::success(if ok { "true" } else { "false" })
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        MethodResponse::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Routes calls to the session and host.
pub struct Bridge {
    session: Arc<PrinterSession>,
    host: Arc<dyn HostInfo>,
}

impl Bridge {
    pub fn new(session: Arc<PrinterSession>, host: Arc<dyn HostInfo>) -> Self {
        Self { session, host }
    }

    pub fn session(&self) -> &Arc<PrinterSession> {
        &self.session
    }

    /// Handle one named call.
    pub async fn handle(&self, method: &str, arguments: &Value) -> MethodResponse {
        let Ok(method) = method.parse::<Method>() else {
            tracing::debug!(method, "unrecognised call");
            return MethodResponse::NotImplemented;
        };
        tracing::debug!(method = method.name(), "dispatching call");

        match method {
            Method::GetPlatformVersion => MethodResponse::success(self.host.platform_version()),
            Method::GetBatteryLevel => match self.host.battery_level() {
                Some(level) => MethodResponse::success(level),
                None => MethodResponse::error(UNAVAILABLE, "Battery level not available."),
            },
            Method::BluetoothStatus => MethodResponse::flag(self.session.adapter_enabled().await),
            Method::ConnectionStatus => MethodResponse::flag(self.session.is_alive().await),
            Method::ConnectPrinter => {
                let address = argument_string(arguments);
                MethodResponse::flag(self.session.connect(&address).await)
            }
            Method::DisconnectPrinter => MethodResponse::flag(self.session.disconnect().await),
            Method::WriteBytes => match byte_values(arguments) {
                Some(values) => MethodResponse::flag(self.session.write_bytes(&values).await),
                None => MethodResponse::error(
                    INVALID_ARGUMENT,
                    "writeBytes expects a list of integers",
                ),
            },
            Method::PrintText => {
                let text = argument_string(arguments);
                MethodResponse::flag(self.session.print_text(&text).await)
            }
            Method::BluetoothLinked => {
                let linked: Vec<String> = self
                    .session
                    .paired_devices()
                    .await
                    .iter()
                    .map(|d| d.to_linked_string())
                    .collect();
                MethodResponse::success(linked)
            }
        }
    }
}

/// Stringify a scalar argument. Missing arguments become the empty string.
pub fn argument_string(arguments: &Value) -> String {
    match arguments {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A list of integers, or `None` if anything else was sent.
fn byte_values(arguments: &Value) -> Option<Vec<i64>> {
    arguments.as_array()?.iter().map(Value::as_i64).collect()
}
