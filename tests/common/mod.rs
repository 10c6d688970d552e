//! In-memory Bluetooth fakes shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use btprint::PrinterError;
use btprint::host::HostInfo;
use btprint::notify::NotificationLog;
use btprint::session::PrinterSession;
use btprint::transport::{BdAddr, BluetoothAdapter, PairedDevice, SerialSocket};
use uuid::Uuid;

pub const PRINTER: &str = "00:11:22:33:44:55";

/// What the fake printer has seen, shared by every socket an adapter opens.
#[derive(Default)]
pub struct FakeLink {
    pub writes: Mutex<Vec<Vec<u8>>>,
    pub fail_writes: AtomicBool,
    pub closes: AtomicUsize,
    /// How long each write blocks before it lands
    pub write_delay: Mutex<Option<Duration>>,
    /// Set while a write is in progress
    in_flight: AtomicBool,
    /// Writes that started while another was still in progress
    pub overlaps: AtomicUsize,
}

impl FakeLink {
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }

    pub fn set_write_delay(&self, delay: Duration) {
        *self.write_delay.lock().unwrap() = Some(delay);
    }
}

pub struct FakeSocket {
    link: Arc<FakeLink>,
    connected: bool,
}

impl SerialSocket for FakeSocket {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), PrinterError> {
        if self.link.in_flight.swap(true, Ordering::SeqCst) {
            self.link.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        let delay = *self.link.write_delay.lock().unwrap();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        let result = if self.link.fail_writes.load(Ordering::SeqCst) {
            Err(PrinterError::Transport("Broken pipe".to_string()))
        } else {
            self.link.writes.lock().unwrap().push(data.to_vec());
            Ok(())
        };
        self.link.in_flight.store(false, Ordering::SeqCst);
        result
    }

    fn close(&mut self) -> Result<(), PrinterError> {
        self.link.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakeAdapter {
    pub enabled: AtomicBool,
    pub devices: Vec<PairedDevice>,
    pub link: Arc<FakeLink>,
    /// Calls to any adapter method
    pub calls: AtomicUsize,
    pub opens: AtomicUsize,
    pub fail_open: AtomicBool,
    /// `is_connected` answer for newly opened sockets
    pub report_connected: AtomicBool,
    pub open_delay: Mutex<Option<Duration>>,
    pub last_open: Mutex<Option<(BdAddr, Uuid)>>,
}

impl FakeAdapter {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            devices: vec![
                PairedDevice::new("MTP-II", PRINTER),
                PairedDevice::new("Kitchen", "66:77:88:99:AA:BB"),
            ],
            link: Arc::new(FakeLink::default()),
            calls: AtomicUsize::new(0),
            opens: AtomicUsize::new(0),
            fail_open: AtomicBool::new(false),
            report_connected: AtomicBool::new(true),
            open_delay: Mutex::new(None),
            last_open: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl BluetoothAdapter for FakeAdapter {
    fn is_enabled(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.enabled.load(Ordering::SeqCst)
    }

    fn bonded_devices(&self) -> Result<Vec<PairedDevice>, PrinterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.devices.clone())
    }

    fn open_serial(
        &self,
        address: &BdAddr,
        service: Uuid,
    ) -> Result<Box<dyn SerialSocket>, PrinterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.opens.fetch_add(1, Ordering::SeqCst);
        *self.last_open.lock().unwrap() = Some((*address, service));

        let delay = *self.open_delay.lock().unwrap();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(PrinterError::Transport("Connection refused".to_string()));
        }
        Ok(Box::new(FakeSocket {
            link: self.link.clone(),
            connected: self.report_connected.load(Ordering::SeqCst),
        }))
    }
}

pub struct FakeHost {
    pub battery: Option<u8>,
}

impl HostInfo for FakeHost {
    fn platform_version(&self) -> String {
        "Linux 6.8.0-test".to_string()
    }

    fn battery_level(&self) -> Option<u8> {
        self.battery
    }
}

pub struct Harness {
    pub session: Arc<PrinterSession>,
    pub adapter: Arc<FakeAdapter>,
    pub notifications: Arc<NotificationLog>,
}

pub fn harness() -> Harness {
    harness_with(FakeAdapter::new())
}

pub fn harness_with(adapter: FakeAdapter) -> Harness {
    let adapter = Arc::new(adapter);
    let notifications = Arc::new(NotificationLog::default());
    let session = PrinterSession::new(Some(adapter.clone()), notifications.clone());
    Harness {
        session: Arc::new(session),
        adapter,
        notifications,
    }
}
