//! Serializable aggregate of every host metric

use serde::Serialize;
use std::path::PathBuf;

use super::error::SupportError;
use super::units::UptimeHms;
use crate::platform::MemoryUsage;

/// Capacity of the configured volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiskSnapshot {
    pub path: PathBuf,
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub total_gb: f64,
    pub free_gb: f64,
    pub free_percent: f64,
    pub used_percent: f64,
}

/// System-wide RAM plus this process's resident size.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemorySnapshot {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub total_gb: f64,
    pub usage_percent: f64,
    pub process_resident_bytes: u64,
}

impl MemorySnapshot {
    pub fn from_usage(usage: MemoryUsage, process_resident_bytes: u64) -> Self {
        Self {
            total_bytes: usage.total_bytes,
            used_bytes: usage.used_bytes(),
            free_bytes: usage.free_bytes,
            total_gb: super::units::bytes_to_gb(usage.total_bytes),
            usage_percent: super::units::percent_of(usage.used_bytes(), usage.total_bytes),
            process_resident_bytes,
        }
    }
}

/// Everything the facade can report, gathered in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct HostSnapshot {
    pub version: String,
    pub platform: &'static str,
    pub os_version: Option<String>,
    /// RFC 3339 local time the snapshot was taken
    pub taken_at: String,
    pub disk: DiskSnapshot,
    pub memory: MemorySnapshot,
    /// -1 when the adapter query failed
    pub ethernet_devices: i32,
    pub uptime_seconds: u64,
    pub uptime: Option<UptimeHms>,
    /// RFC 3339 boot time derived from the uptime
    pub boot_time: Option<String>,
    pub last_error: SupportError,
}

impl HostSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_snapshot_from_usage() {
        let usage = MemoryUsage {
            total_bytes: 8 * 1_073_741_824,
            free_bytes: 2 * 1_073_741_824,
        };
        let snap = MemorySnapshot::from_usage(usage, 4096);
        assert_eq!(snap.used_bytes, 6 * 1_073_741_824);
        assert_eq!(snap.total_gb, 8.0);
        assert_eq!(snap.usage_percent, 75.0);
        assert_eq!(snap.process_resident_bytes, 4096);
    }
}
