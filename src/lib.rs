//! OS Support
//!
//! A cross-platform view of the host operating system: disk space, RAM,
//! Ethernet adapters, uptime, and mounting/unmounting storage volumes.
//!
//! ## Features
//!
//! - **Disk**: total/free bytes, gigabytes and percentages for one volume
//! - **RAM**: total/used/free system memory and this process's resident size
//! - **Network**: count of physical Ethernet adapters
//! - **Uptime**: seconds since boot, or hours/minutes/seconds
//! - **Mount**: idempotent mount/unmount through the platform's tools
//!
//! ## Usage
//!
//! ```no_run
//! use os_support::HostMetrics;
//!
//! let os = HostMetrics::new();
//! println!("{:.1}% of disk free", os.free_disk_space_percent());
//! if let Some(up) = os.uptime_hms() {
//!     println!("up {}", up);
//! }
//! ```

pub mod core;
pub mod platform;

// Re-exports
pub use crate::core::config::SupportConfig;
pub use crate::core::error::SupportError;
pub use crate::core::facade::HostMetrics;
pub use crate::core::snapshot::HostSnapshot;
pub use crate::core::units::{bytes_to_gb, UptimeHms};
pub use platform::{
    create_platform, HostPlatform, MountStatus, NativePlatform, PlatformError, PlatformResult,
};

pub const VERSION_MAJOR: u8 = 0;
pub const VERSION_MINOR: u8 = 1;
pub const VERSION_PATCH: u8 = 0;
pub const VERSION_BUILD: u8 = 0;

/// Printable version, e.g. `"OS Support v0.1.0 - b0."`.
pub fn version_string() -> String {
    format!(
        "OS Support v{}.{}.{} - b{}.",
        VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH, VERSION_BUILD
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string() {
        assert_eq!(version_string(), "OS Support v0.1.0 - b0.");
    }
}
