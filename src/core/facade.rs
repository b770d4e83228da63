//! Host metrics facade
//!
//! [`HostMetrics`] is the caller-facing surface: disk, RAM, adapter, uptime
//! and mount queries returning plain numbers or a [`MountStatus`]. Failures
//! never propagate; they yield a sentinel (0, -1, `None`,
//! [`MountStatus::Failed`]) and overwrite the instance's last-error code.
//!
//! "Used RAM" is system-wide on every platform (total minus free). The
//! current process's resident size is available separately through
//! [`HostMetrics::process_resident_bytes`].

use std::cell::Cell;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::config::SupportConfig;
use super::error::SupportError;
use super::snapshot::{DiskSnapshot, HostSnapshot, MemorySnapshot};
use super::units::{bytes_to_gb, percent_of, UptimeHms};
use crate::platform::{
    create_platform, CommandRunner, CommandSpec, DiskUsage, HostPlatform, MemoryUsage,
    MountStatus, NativePlatform, SystemCommandRunner,
};

/// Cross-platform host metrics and mount helper.
///
/// The last-error code lives in a `Cell`, so an instance can be moved to
/// another thread but not shared between threads.
pub struct HostMetrics<P = NativePlatform, R = SystemCommandRunner> {
    platform: P,
    runner: R,
    disk_path: PathBuf,
    last_error: Cell<SupportError>,
}

impl HostMetrics {
    /// Native platform, default config.
    pub fn new() -> Self {
        Self::from_config(&SupportConfig::default())
    }

    /// Native platform, with the disk path and command timeout from `config`.
    pub fn from_config(config: &SupportConfig) -> Self {
        Self::with_parts(
            create_platform(),
            SystemCommandRunner::with_timeout(config.command_timeout()),
            config.disk_path.clone(),
        )
    }
}

impl Default for HostMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: HostPlatform, R: CommandRunner> HostMetrics<P, R> {
    pub fn with_parts(platform: P, runner: R, disk_path: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            runner,
            disk_path: disk_path.into(),
            last_error: Cell::new(SupportError::None),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn disk_path(&self) -> &Path {
        &self.disk_path
    }

    fn record(&self, code: SupportError, cause: &dyn fmt::Display) {
        warn!("{} ({})", code, cause);
        self.last_error.set(code);
    }

    fn disk(&self) -> Option<DiskUsage> {
        match self.platform.disk_usage(&self.disk_path) {
            Ok(usage) => Some(usage),
            Err(e) => {
                self.record(SupportError::DiskQueryFailed, &e);
                None
            }
        }
    }

    fn memory(&self) -> Option<MemoryUsage> {
        match self.platform.memory() {
            Ok(usage) => Some(usage),
            Err(e) => {
                self.record(SupportError::MemoryQueryFailed, &e);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Disk
    // ------------------------------------------------------------------

    pub fn total_disk_space_bytes(&self) -> u64 {
        self.disk().map_or(0, |d| d.total_bytes)
    }

    pub fn total_disk_space_gb(&self) -> f64 {
        bytes_to_gb(self.total_disk_space_bytes())
    }

    pub fn free_disk_space_bytes(&self) -> u64 {
        self.disk().map_or(0, |d| d.free_bytes)
    }

    pub fn free_disk_space_gb(&self) -> f64 {
        bytes_to_gb(self.free_disk_space_bytes())
    }

    /// Free space as a percentage of capacity; 0 when capacity is 0.
    pub fn free_disk_space_percent(&self) -> f64 {
        self.disk().map_or(0.0, |d| percent_of(d.free_bytes, d.total_bytes))
    }

    /// Used space as a percentage of capacity; 0 when capacity is 0.
    pub fn used_disk_space_percent(&self) -> f64 {
        self.disk().map_or(0.0, |d| percent_of(d.used_bytes(), d.total_bytes))
    }

    // ------------------------------------------------------------------
    // RAM
    // ------------------------------------------------------------------

    pub fn total_ram_bytes(&self) -> u64 {
        self.memory().map_or(0, |m| m.total_bytes)
    }

    pub fn total_ram_gb(&self) -> f64 {
        bytes_to_gb(self.total_ram_bytes())
    }

    pub fn free_ram_bytes(&self) -> u64 {
        self.memory().map_or(0, |m| m.free_bytes)
    }

    /// System-wide used memory (total minus free).
    pub fn used_ram_bytes(&self) -> u64 {
        self.memory().map_or(0, |m| m.used_bytes())
    }

    pub fn ram_usage_percent(&self) -> f64 {
        self.memory().map_or(0.0, |m| percent_of(m.used_bytes(), m.total_bytes))
    }

    /// Resident size of the calling process.
    pub fn process_resident_bytes(&self) -> u64 {
        match self.platform.process_resident_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                self.record(SupportError::MemoryQueryFailed, &e);
                0
            }
        }
    }

    // ------------------------------------------------------------------
    // Network
    // ------------------------------------------------------------------

    /// Physical Ethernet adapters, loopback excluded; -1 on failure.
    pub fn ethernet_device_count(&self) -> i32 {
        match self.platform.ethernet_adapter_count() {
            Ok(count) => i32::try_from(count).unwrap_or(i32::MAX),
            Err(e) => {
                self.record(SupportError::NetworkQueryFailed, &e);
                -1
            }
        }
    }

    // ------------------------------------------------------------------
    // Uptime
    // ------------------------------------------------------------------

    /// Seconds since boot; 0 on failure.
    pub fn uptime_seconds(&self) -> u64 {
        match self.platform.uptime_seconds() {
            Ok(secs) => secs,
            Err(e) => {
                self.record(SupportError::UptimeQueryFailed, &e);
                0
            }
        }
    }

    /// Uptime as hours/minutes/seconds; `None` when uptime is not positive.
    pub fn uptime_hms(&self) -> Option<UptimeHms> {
        UptimeHms::from_seconds(self.uptime_seconds())
    }

    // ------------------------------------------------------------------
    // Mount / unmount
    // ------------------------------------------------------------------

    fn location_mounted(&self, location: &str) -> bool {
        match self.platform.is_mounted(&self.runner, location) {
            Ok(mounted) => mounted,
            Err(e) => {
                self.record(SupportError::MountCheckFailed, &e);
                false
            }
        }
    }

    fn run_classified(&self, command: &CommandSpec) -> MountStatus {
        let outcome = self.runner.run(command);
        match &outcome {
            Ok(output) if !output.success() => {
                warn!("`{}` exited with {:?}: {}", command, output.code, output.stderr.trim());
            }
            Err(e) => warn!("`{}` did not complete: {}", command, e),
            Ok(_) => debug!("`{}` succeeded", command),
        }
        MountStatus::from_outcome(&outcome)
    }

    /// Mount `device` at `location` unless `location` is already mounted.
    pub fn mount_storage_device(&self, device: &str, location: &str) -> MountStatus {
        let Some(command) = self.platform.mount_command(device, location) else {
            info!("Mounting storage devices is not applicable on {}", self.platform.name());
            return MountStatus::Unchanged;
        };

        if self.location_mounted(location) {
            info!("{} is already mounted", location);
            return MountStatus::Unchanged;
        }

        let status = self.run_classified(&command);
        match status {
            MountStatus::Changed => info!("Mounted {} at {}", device, location),
            _ => self.last_error.set(SupportError::MountFailed),
        }
        status
    }

    /// Unmount `location` if it is currently mounted.
    pub fn unmount_storage_device(&self, location: &str) -> MountStatus {
        let Some(command) = self.platform.unmount_command(location) else {
            info!("Unmounting storage devices is not applicable on {}", self.platform.name());
            return MountStatus::Unchanged;
        };

        if !self.location_mounted(location) {
            info!("{} is not mounted", location);
            return MountStatus::Unchanged;
        }

        let status = self.run_classified(&command);
        match status {
            MountStatus::Changed => info!("Unmounted {}", location),
            _ => self.last_error.set(SupportError::UnmountFailed),
        }
        status
    }

    // ------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------

    /// Description of the most recent failure.
    pub fn last_error(&self) -> &'static str {
        self.last_error.get().description()
    }

    pub fn last_error_code(&self) -> SupportError {
        self.last_error.get()
    }

    pub fn clear_last_error(&self) {
        self.last_error.set(SupportError::None);
    }

    // ------------------------------------------------------------------
    // Snapshot
    // ------------------------------------------------------------------

    /// Gather every metric, querying each subsystem once.
    pub fn snapshot(&self) -> HostSnapshot {
        let disk = self
            .disk()
            .map(|d| DiskSnapshot {
                path: self.disk_path.clone(),
                total_bytes: d.total_bytes,
                free_bytes: d.free_bytes,
                total_gb: bytes_to_gb(d.total_bytes),
                free_gb: bytes_to_gb(d.free_bytes),
                free_percent: percent_of(d.free_bytes, d.total_bytes),
                used_percent: percent_of(d.used_bytes(), d.total_bytes),
            })
            .unwrap_or_else(|| DiskSnapshot {
                path: self.disk_path.clone(),
                ..Default::default()
            });

        let memory = MemorySnapshot::from_usage(
            self.memory().unwrap_or_default(),
            self.process_resident_bytes(),
        );

        let uptime_seconds = self.uptime_seconds();
        let boot_time = i64::try_from(uptime_seconds)
            .ok()
            .filter(|secs| *secs > 0)
            .map(|secs| (chrono::Local::now() - chrono::Duration::seconds(secs)).to_rfc3339());

        HostSnapshot {
            version: crate::version_string(),
            platform: self.platform.name(),
            os_version: sysinfo::System::long_os_version(),
            taken_at: chrono::Local::now().to_rfc3339(),
            disk,
            memory,
            ethernet_devices: self.ethernet_device_count(),
            uptime_seconds,
            uptime: UptimeHms::from_seconds(uptime_seconds),
            boot_time,
            last_error: self.last_error.get(),
        }
    }
}
