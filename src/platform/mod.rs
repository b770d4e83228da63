//! Platform Abstraction Layer for host metrics
//!
//! This module provides the cross-platform capability trait and selects the
//! implementation for the build target at compile time.
//!
//! # Architecture
//!
//! ```text
//! src/platform/
//! +-- mod.rs           <- This file (module definitions, NativePlatform alias)
//! +-- traits.rs        <- HostPlatform trait and metric types
//! +-- command.rs       <- CommandRunner capability, MountStatus classification
//! +-- adapters.rs      <- Pure adapter type and name filters
//! +-- unix.rs          <- statvfs shared by Linux and macOS (cfg(unix))
//! +-- linux/           <- Linux implementation (cfg(linux))
//! |   +-- mod.rs
//! |   +-- memory.rs
//! |   +-- mount.rs
//! +-- macos.rs         <- macOS implementation (cfg(macos))
//! +-- windows.rs       <- Windows implementation (cfg(windows))
//! +-- unsupported.rs   <- Every other target
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use os_support::platform::{create_platform, HostPlatform};
//!
//! let platform = create_platform();
//! let mem = platform.memory()?;
//! println!("{} of {} bytes free", mem.free_bytes, mem.total_bytes);
//! # Ok::<(), os_support::platform::PlatformError>(())
//! ```
//!
//! # Platform Support
//!
//! | Feature | Linux | macOS | Windows |
//! |---------|-------|-------|---------|
//! | Disk space | statvfs | statvfs | GetDiskFreeSpaceEx |
//! | RAM | sysinfo(2) | Mach host stats | GlobalMemoryStatusEx |
//! | Ethernet count | /proc/net/dev | getifaddrs | GetAdaptersInfo |
//! | Uptime | sysinfo(2) | kern.boottime | GetTickCount64 |
//! | Mount/unmount | mount/umount | diskutil | not applicable |

pub mod adapters;
pub mod command;
pub mod traits;

#[cfg(unix)]
pub mod unix;

pub mod unsupported;

pub use command::{CommandOutput, CommandRunner, CommandSpec, MountStatus, SystemCommandRunner};
pub use traits::{DiskUsage, HostPlatform, MemoryUsage, PlatformError, PlatformResult};

// ============================================================================
// Linux Platform Implementation
// ============================================================================

/// Linux-specific implementations.
#[cfg(target_os = "linux")]
pub mod linux;

/// Platform implementation for the build target.
#[cfg(target_os = "linux")]
pub type NativePlatform = linux::LinuxPlatform;

// ============================================================================
// macOS Platform Implementation
// ============================================================================

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "macos")]
pub type NativePlatform = macos::MacPlatform;

// ============================================================================
// Windows Platform Implementation
// ============================================================================

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub type NativePlatform = windows::WindowsPlatform;

// ============================================================================
// Everything else
// ============================================================================

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub type NativePlatform = unsupported::UnsupportedPlatform;

/// Construct the platform implementation for the build target.
pub fn create_platform() -> NativePlatform {
    NativePlatform::new()
}

/// Returns the current platform name
pub fn platform_name() -> &'static str {
    #[cfg(target_os = "linux")]
    {
        "linux"
    }

    #[cfg(target_os = "macos")]
    {
        "macos"
    }

    #[cfg(target_os = "windows")]
    {
        "windows"
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        "unsupported"
    }
}

/// Check if the current platform has a native implementation
pub fn is_platform_supported() -> bool {
    cfg!(any(target_os = "linux", target_os = "macos", target_os = "windows"))
}

/// Default volume queried for disk space: the root filesystem.
pub fn default_disk_path() -> std::path::PathBuf {
    if cfg!(windows) {
        std::path::PathBuf::from("C:\\")
    } else {
        std::path::PathBuf::from("/")
    }
}
