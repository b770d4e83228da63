//! macOS platform implementation
//!
//! Volume statistics come from statvfs(3), interface types from
//! getifaddrs(3), and memory/uptime from the `sysinfo` crate (Mach host
//! statistics and `kern.boottime` under the hood).

#![cfg(target_os = "macos")]

use std::path::Path;

use sysinfo::System;
use tracing::debug;

use super::adapters::is_darwin_ethernet_link;
use super::command::{CommandRunner, CommandSpec};
use super::traits::{DiskUsage, HostPlatform, MemoryUsage, PlatformError, PlatformResult};
use super::unix::statvfs_usage;

/// macOS host queries.
#[derive(Debug, Clone, Default)]
pub struct MacPlatform;

impl MacPlatform {
    pub fn new() -> Self {
        Self
    }
}

/// Whether `mount` output lists `location` as a mount point.
///
/// Lines look like `/dev/disk3s1 on /Volumes/USB (apfs, local, journaled)`.
pub fn mount_output_lists(stdout: &str, location: &str) -> bool {
    let trimmed = match location.trim_end_matches('/') {
        "" => "/",
        path => path,
    };
    let needle = format!(" on {} (", trimmed);
    stdout.lines().any(|line| line.contains(&needle))
}

impl HostPlatform for MacPlatform {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn disk_usage(&self, path: &Path) -> PlatformResult<DiskUsage> {
        statvfs_usage(path)
    }

    fn memory(&self) -> PlatformResult<MemoryUsage> {
        let mut sys = System::new();
        sys.refresh_memory();

        let total_bytes = sys.total_memory();
        if total_bytes == 0 {
            return Err(PlatformError::NotSupported("host memory statistics".to_string()));
        }
        Ok(MemoryUsage {
            total_bytes,
            free_bytes: sys.free_memory(),
        })
    }

    fn process_resident_bytes(&self) -> PlatformResult<u64> {
        let pid = sysinfo::get_current_pid().map_err(|e| PlatformError::NotSupported(e.to_string()))?;
        let mut sys = System::new();
        sys.refresh_process(pid);
        sys.process(pid)
            .map(|process| process.memory())
            .ok_or_else(|| PlatformError::NotSupported(format!("task info for pid {}", pid)))
    }

    fn ethernet_adapter_count(&self) -> PlatformResult<usize> {
        let mut head: *mut libc::ifaddrs = std::ptr::null_mut();
        // SAFETY: getifaddrs fills `head` with a list we release below.
        if unsafe { libc::getifaddrs(&mut head) } != 0 {
            return Err(PlatformError::last_os_error("getifaddrs"));
        }

        let mut count = 0;
        let mut cursor = head;
        while !cursor.is_null() {
            // SAFETY: every node stays valid until freeifaddrs.
            let entry = unsafe { &*cursor };
            if !entry.ifa_addr.is_null() {
                // SAFETY: checked non-null; every address starts with sa_family.
                let family = unsafe { (*entry.ifa_addr).sa_family };
                if i32::from(family) == libc::AF_LINK {
                    // SAFETY: AF_LINK addresses are sockaddr_dl.
                    let link = unsafe { &*(entry.ifa_addr as *const libc::sockaddr_dl) };
                    let loopback = entry.ifa_flags & libc::IFF_LOOPBACK as u32 != 0;
                    if is_darwin_ethernet_link(link.sdl_type, link.sdl_index, loopback) {
                        count += 1;
                    }
                }
            }
            cursor = entry.ifa_next;
        }
        // SAFETY: `head` came from getifaddrs and no node is used after this.
        unsafe { libc::freeifaddrs(head) };

        debug!("getifaddrs: {} ethernet interface(s)", count);
        Ok(count)
    }

    fn uptime_seconds(&self) -> PlatformResult<u64> {
        Ok(System::uptime())
    }

    fn is_mounted(&self, runner: &dyn CommandRunner, location: &str) -> PlatformResult<bool> {
        let output = runner.run(&CommandSpec::new("mount"))?;
        if !output.success() {
            return Err(PlatformError::SystemError {
                code: output.code.unwrap_or(-1),
                message: "`mount` could not list the mount table".to_string(),
            });
        }
        Ok(mount_output_lists(&output.stdout, location))
    }

    fn mount_command(&self, device: &str, location: &str) -> Option<CommandSpec> {
        Some(CommandSpec::new("diskutil").args(["mount", "-mountPoint", location, device]))
    }

    fn unmount_command(&self, location: &str) -> Option<CommandSpec> {
        Some(CommandSpec::new("diskutil").args(["unmount", location]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOUNT_OUTPUT: &str = "\
/dev/disk3s1s1 on / (apfs, sealed, local, read-only, journaled)
devfs on /dev (devfs, local, nobrowse)
/dev/disk5s1 on /Volumes/USB Stick (msdos, local, nodev, nosuid, noowners)
";

    #[test]
    fn test_mount_output_lists() {
        assert!(mount_output_lists(MOUNT_OUTPUT, "/"));
        assert!(mount_output_lists(MOUNT_OUTPUT, "/Volumes/USB Stick"));
        assert!(mount_output_lists(MOUNT_OUTPUT, "/Volumes/USB Stick/"));
        assert!(!mount_output_lists(MOUNT_OUTPUT, "/Volumes/USB"));
    }

    #[test]
    fn test_memory() {
        let mem = MacPlatform::new().memory().unwrap();
        assert!(mem.total_bytes > 0);
        assert!(mem.free_bytes <= mem.total_bytes);
    }

    #[test]
    fn test_uptime() {
        // System should have been up for at least 1 second
        assert!(MacPlatform::new().uptime_seconds().unwrap() >= 1);
    }

    #[test]
    fn test_diskutil_commands() {
        let platform = MacPlatform::new();
        assert_eq!(
            platform.mount_command("disk5s1", "/Volumes/USB").unwrap().to_string(),
            "diskutil mount -mountPoint /Volumes/USB disk5s1"
        );
        assert_eq!(
            platform.unmount_command("/Volumes/USB").unwrap().to_string(),
            "diskutil unmount /Volumes/USB"
        );
    }
}
