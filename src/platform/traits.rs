//! Platform Abstraction Traits for Host Metrics
//!
//! This module defines the capability trait each target operating system
//! implements to answer disk, memory, network, uptime and mount queries.
//!
//! # Architecture
//!
//! ```text
//! +-------------------+
//! |   HostPlatform    |  <- This module (defines the interface)
//! +-------------------+
//!          |
//!    +-----+-----+-----------+
//!    |           |           |
//! +--v--+     +--v--+     +--v--+
//! | Lin |     | Mac |     | Win |  <- Platform-specific implementations
//! +-----+     +-----+     +-----+
//! ```
//!
//! Every method is a single call-and-return query. Nothing is cached: the
//! facade in [`crate::core::facade`] calls straight through on each request.

use std::io;
use std::path::Path;

use thiserror::Error;

use super::command::{CommandRunner, CommandSpec};

// ============================================================================
// Error Types
// ============================================================================

/// Platform-agnostic error type for all platform operations.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Operation not supported on this platform
    #[error("Not supported: {0}")]
    NotSupported(String),
    /// I/O error occurred (file read, process spawn)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// System call failed
    #[error("System error ({code}): {message}")]
    SystemError { code: i32, message: String },
    /// Counter file or command output could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

impl PlatformError {
    /// Build a [`PlatformError::SystemError`] from the calling thread's errno.
    pub fn last_os_error(call: &str) -> Self {
        let err = io::Error::last_os_error();
        PlatformError::SystemError {
            code: err.raw_os_error().unwrap_or(-1),
            message: format!("{} failed: {}", call, err),
        }
    }
}

#[cfg(unix)]
impl From<nix::errno::Errno> for PlatformError {
    fn from(errno: nix::errno::Errno) -> Self {
        PlatformError::SystemError {
            code: errno as i32,
            message: errno.desc().to_string(),
        }
    }
}

/// Result type alias for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

// ============================================================================
// Metric Types
// ============================================================================

/// Capacity of a single filesystem volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskUsage {
    /// Total capacity in bytes
    pub total_bytes: u64,
    /// Bytes available to unprivileged callers
    pub free_bytes: u64,
}

impl DiskUsage {
    /// Bytes not available to unprivileged callers (includes reserved blocks).
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.free_bytes)
    }
}

/// System-wide physical memory figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    /// Total physical memory in bytes
    pub total_bytes: u64,
    /// Unused physical memory in bytes
    pub free_bytes: u64,
}

impl MemoryUsage {
    /// System-wide used memory: total minus free.
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.free_bytes)
    }
}

// ============================================================================
// Platform Trait
// ============================================================================

/// Capability interface implemented once per target operating system.
///
/// Mount handling is split in two: the platform decides *how* to query the
/// mount table and *which* command mounts or unmounts, while running the
/// command and interpreting its exit status is left to the caller.
pub trait HostPlatform {
    /// Short platform name ("linux", "macos", "windows", ...)
    fn name(&self) -> &'static str;

    /// Volume statistics for the filesystem containing `path`.
    fn disk_usage(&self, path: &Path) -> PlatformResult<DiskUsage>;

    /// System-wide physical memory.
    fn memory(&self) -> PlatformResult<MemoryUsage>;

    /// Resident set size of the current process in bytes.
    fn process_resident_bytes(&self) -> PlatformResult<u64>;

    /// Number of physical Ethernet adapters, loopback excluded.
    fn ethernet_adapter_count(&self) -> PlatformResult<usize>;

    /// Seconds since boot.
    fn uptime_seconds(&self) -> PlatformResult<u64>;

    /// Whether `location` currently appears in the mount table.
    ///
    /// Platforms without mount support return `Ok(false)` and never touch
    /// the runner.
    fn is_mounted(&self, runner: &dyn CommandRunner, location: &str) -> PlatformResult<bool>;

    /// Command that mounts `device` at `location`, or `None` when mounting
    /// is not applicable on this platform.
    fn mount_command(&self, device: &str, location: &str) -> Option<CommandSpec>;

    /// Command that unmounts `location`, or `None` when not applicable.
    fn unmount_command(&self, location: &str) -> Option<CommandSpec>;
}
