//! Fallback for targets without a platform branch
//!
//! Every query fails with [`PlatformError::NotSupported`], which the facade
//! reports through its sentinel values.

use std::path::Path;

use super::command::{CommandRunner, CommandSpec};
use super::traits::{DiskUsage, HostPlatform, MemoryUsage, PlatformError, PlatformResult};

#[derive(Debug, Clone, Default)]
pub struct UnsupportedPlatform;

impl UnsupportedPlatform {
    pub fn new() -> Self {
        Self
    }

    fn unsupported<T>(what: &str) -> PlatformResult<T> {
        Err(PlatformError::NotSupported(format!(
            "{} on {}",
            what,
            std::env::consts::OS
        )))
    }
}

impl HostPlatform for UnsupportedPlatform {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn disk_usage(&self, _path: &Path) -> PlatformResult<DiskUsage> {
        Self::unsupported("volume statistics")
    }

    fn memory(&self) -> PlatformResult<MemoryUsage> {
        Self::unsupported("memory statistics")
    }

    fn process_resident_bytes(&self) -> PlatformResult<u64> {
        Self::unsupported("process resident size")
    }

    fn ethernet_adapter_count(&self) -> PlatformResult<usize> {
        Self::unsupported("adapter enumeration")
    }

    fn uptime_seconds(&self) -> PlatformResult<u64> {
        Self::unsupported("uptime")
    }

    fn is_mounted(&self, _runner: &dyn CommandRunner, _location: &str) -> PlatformResult<bool> {
        Ok(false)
    }

    fn mount_command(&self, _device: &str, _location: &str) -> Option<CommandSpec> {
        None
    }

    fn unmount_command(&self, _location: &str) -> Option<CommandSpec> {
        None
    }
}
