//! Linux Platform Support
//!
//! Implements [`HostPlatform`] using statvfs(3), sysinfo(2) and the /proc
//! filesystem.
//!
//! ## Modules
//!
//! - **memory**: RAM totals and uptime from sysinfo(2), process RSS from /proc/self/statm
//! - **mount**: /proc/mounts probing and `mount`/`umount` commands
//!
//! ## Required Capabilities
//!
//! Mounting and unmounting normally require root or CAP_SYS_ADMIN; the
//! queries do not.

pub mod memory;
pub mod mount;

use std::fs;
use std::path::Path;

use tracing::debug;

use super::adapters::count_linux_ethernet;
use super::command::{CommandRunner, CommandSpec};
use super::traits::{DiskUsage, HostPlatform, MemoryUsage, PlatformResult};
use super::unix::statvfs_usage;

/// Per-interface counters, one line per network device.
const PROC_NET_DEV: &str = "/proc/net/dev";

/// Linux host queries.
#[derive(Debug, Clone)]
pub struct LinuxPlatform {
    /// Page size for the system
    page_size: u64,
}

impl LinuxPlatform {
    pub fn new() -> Self {
        let page_size = memory::page_size();
        debug!("Linux platform initialised (page size {} bytes)", page_size);
        Self { page_size }
    }

    /// Returns the system page size
    pub fn page_size(&self) -> u64 {
        self.page_size
    }
}

impl Default for LinuxPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HostPlatform for LinuxPlatform {
    fn name(&self) -> &'static str {
        "linux"
    }

    fn disk_usage(&self, path: &Path) -> PlatformResult<DiskUsage> {
        statvfs_usage(path)
    }

    fn memory(&self) -> PlatformResult<MemoryUsage> {
        Ok(memory::read_sysinfo()?.memory())
    }

    fn process_resident_bytes(&self) -> PlatformResult<u64> {
        memory::process_resident_bytes(self.page_size)
    }

    fn ethernet_adapter_count(&self) -> PlatformResult<usize> {
        let contents = fs::read_to_string(PROC_NET_DEV)?;
        let count = count_linux_ethernet(&contents);
        debug!("{}: {} ethernet interface(s)", PROC_NET_DEV, count);
        Ok(count)
    }

    fn uptime_seconds(&self) -> PlatformResult<u64> {
        Ok(memory::read_sysinfo()?.uptime_secs)
    }

    fn is_mounted(&self, runner: &dyn CommandRunner, location: &str) -> PlatformResult<bool> {
        mount::is_mounted(runner, location)
    }

    fn mount_command(&self, device: &str, location: &str) -> Option<CommandSpec> {
        Some(mount::mount_command(device, location))
    }

    fn unmount_command(&self, location: &str) -> Option<CommandSpec> {
        Some(mount::unmount_command(location))
    }
}
