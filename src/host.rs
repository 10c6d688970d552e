//! # Host Queries
//!
//! Read-only facts about the machine the bridge runs on. Nothing here
//! touches the printer session.

use std::fs;
use std::path::{Path, PathBuf};

/// Platform facts the call surface exposes.
pub trait HostInfo: Send + Sync {
    /// Human-readable platform name and version, e.g. `Linux 6.8.0`.
    fn platform_version(&self) -> String;

    /// Battery charge in percent, or `None` when there is no readable
    /// battery.
    fn battery_level(&self) -> Option<u8>;
}

/// Reads `/proc` and `/sys` on Linux.
#[derive(Debug, Clone)]
pub struct LinuxHost {
    proc_root: PathBuf,
    power_supply_dir: PathBuf,
}

impl Default for LinuxHost {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            power_supply_dir: PathBuf::from("/sys/class/power_supply"),
        }
    }
}

impl LinuxHost {
    /// Use alternative roots, for tests or containers with remapped mounts.
    pub fn with_roots(proc_root: impl Into<PathBuf>, power_supply_dir: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
            power_supply_dir: power_supply_dir.into(),
        }
    }
}

impl HostInfo for LinuxHost {
    fn platform_version(&self) -> String {
        let release = fs::read_to_string(self.proc_root.join("sys/kernel/osrelease"))
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        format!("Linux {}", release)
    }

    fn battery_level(&self) -> Option<u8> {
        let entries = fs::read_dir(&self.power_supply_dir).ok()?;
        let mut supplies: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
        supplies.sort();
        supplies.iter().find_map(|dir| read_battery_capacity(dir))
    }
}

fn read_battery_capacity(dir: &Path) -> Option<u8> {
    let kind = fs::read_to_string(dir.join("type")).ok()?;
    if kind.trim() != "Battery" {
        return None;
    }
    let capacity: u8 = fs::read_to_string(dir.join("capacity")).ok()?.trim().parse().ok()?;
    (capacity <= 100).then_some(capacity)
}
