//! Windows platform implementation
//!
//! Disk, memory and uptime come from the `sysinfo` crate (GetDiskFreeSpaceEx,
//! GlobalMemoryStatusEx, GetTickCount64). Adapters are enumerated with
//! GetAdaptersInfo so they can be filtered by type. Mounting is not
//! applicable: drives are attached by the OS.

#![cfg(target_os = "windows")]

use std::path::{Path, PathBuf};

use sysinfo::{Disks, System};
use tracing::debug;
use windows::Win32::Foundation::{ERROR_BUFFER_OVERFLOW, ERROR_NO_DATA, ERROR_SUCCESS};
use windows::Win32::NetworkManagement::IpHelper::{GetAdaptersInfo, IP_ADAPTER_INFO};

use super::adapters::is_windows_ethernet_adapter;
use super::command::{CommandRunner, CommandSpec};
use super::traits::{DiskUsage, HostPlatform, MemoryUsage, PlatformError, PlatformResult};

/// Windows host queries.
#[derive(Debug, Clone, Default)]
pub struct WindowsPlatform;

impl WindowsPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl HostPlatform for WindowsPlatform {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn disk_usage(&self, path: &Path) -> PlatformResult<DiskUsage> {
        let target = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));
        let disks = Disks::new_with_refreshed_list();

        // The volume whose mount point is the longest prefix of the target.
        let disk = disks
            .iter()
            .filter(|d| target.starts_with(d.mount_point()) || path.starts_with(d.mount_point()))
            .max_by_key(|d| d.mount_point().as_os_str().len())
            .ok_or_else(|| PlatformError::NotSupported(format!("no volume holds {}", path.display())))?;

        debug!("Volume {} selected for {}", disk.mount_point().display(), path.display());
        Ok(DiskUsage {
            total_bytes: disk.total_space(),
            free_bytes: disk.available_space(),
        })
    }

    fn memory(&self) -> PlatformResult<MemoryUsage> {
        let mut sys = System::new();
        sys.refresh_memory();

        let total_bytes = sys.total_memory();
        if total_bytes == 0 {
            return Err(PlatformError::NotSupported("GlobalMemoryStatusEx".to_string()));
        }
        Ok(MemoryUsage {
            total_bytes,
            free_bytes: sys.available_memory(),
        })
    }

    fn process_resident_bytes(&self) -> PlatformResult<u64> {
        let pid = sysinfo::get_current_pid().map_err(|e| PlatformError::NotSupported(e.to_string()))?;
        let mut sys = System::new();
        sys.refresh_process(pid);
        sys.process(pid)
            .map(|process| process.memory())
            .ok_or_else(|| PlatformError::NotSupported(format!("working set for pid {}", pid)))
    }

    fn ethernet_adapter_count(&self) -> PlatformResult<usize> {
        let mut size = 0u32;
        // SAFETY: without a buffer the call only reports the size it needs.
        let status = unsafe { GetAdaptersInfo(None, &mut size) };
        if status == ERROR_NO_DATA.0 {
            return Ok(0);
        }
        if status != ERROR_BUFFER_OVERFLOW.0 {
            return Err(adapters_error(status));
        }

        // u64 words keep the adapter list aligned.
        let mut buffer = vec![0u64; (size as usize).div_ceil(8)];
        let head = buffer.as_mut_ptr().cast::<IP_ADAPTER_INFO>();
        // SAFETY: `buffer` holds at least `size` bytes.
        let status = unsafe { GetAdaptersInfo(Some(head), &mut size) };
        if status != ERROR_SUCCESS.0 {
            return Err(adapters_error(status));
        }

        let mut count = 0;
        let mut cursor = head.cast_const();
        while !cursor.is_null() {
            // SAFETY: every node lives inside `buffer`, which outlives the loop.
            let adapter = unsafe { &*cursor };
            let description: Vec<u8> = adapter
                .Description
                .iter()
                .take_while(|&&c| c != 0)
                .map(|&c| c as u8)
                .collect();
            if is_windows_ethernet_adapter(adapter.Type, &String::from_utf8_lossy(&description)) {
                count += 1;
            }
            cursor = adapter.Next.cast_const();
        }

        debug!("GetAdaptersInfo: {} ethernet adapter(s)", count);
        Ok(count)
    }

    fn uptime_seconds(&self) -> PlatformResult<u64> {
        Ok(System::uptime())
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

fn adapters_error(status: u32) -> PlatformError {
    PlatformError::SystemError {
        code: status as i32,
        message: "GetAdaptersInfo failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory() {
        let mem = WindowsPlatform::new().memory().unwrap();
        assert!(mem.total_bytes > 0);
        assert!(mem.free_bytes <= mem.total_bytes);
    }

    #[test]
    fn test_system_drive() {
        let disk = WindowsPlatform::new().disk_usage(Path::new("C:\\")).unwrap();
        assert!(disk.total_bytes > 0);
    }

    #[test]
    fn test_ethernet_count() {
        assert!(WindowsPlatform::new().ethernet_adapter_count().is_ok());
    }

    #[test]
    fn test_mount_not_applicable() {
        let platform = WindowsPlatform::new();
        assert!(platform.mount_command("D:", "D:\\").is_none());
        assert!(platform.unmount_command("D:\\").is_none());
    }
}
