//! Linux memory and uptime counters
//!
//! This module reads:
//! - sysinfo(2) for total/free RAM and uptime
//! - /proc/self/statm for the resident size of the current process

use std::fs;

use tracing::debug;

use crate::platform::traits::{MemoryUsage, PlatformError, PlatformResult};

/// Path of the current process's memory summary (values in pages).
const SELF_STATM: &str = "/proc/self/statm";

/// The subset of `struct sysinfo` this crate reports, normalized to bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct KernelSysInfo {
    pub total_ram: u64,
    pub free_ram: u64,
    pub uptime_secs: u64,
}

impl KernelSysInfo {
    pub fn memory(&self) -> MemoryUsage {
        MemoryUsage {
            total_bytes: self.total_ram,
            free_bytes: self.free_ram,
        }
    }
}

/// Call sysinfo(2).
///
/// RAM counters are in units of `mem_unit` bytes; a negative uptime is
/// clamped to zero.
#[allow(clippy::unnecessary_cast)]
pub fn read_sysinfo() -> PlatformResult<KernelSysInfo> {
    // SAFETY: sysinfo only writes into the zeroed struct we hand it.
    let mut raw: libc::sysinfo = unsafe { std::mem::zeroed() };
    if unsafe { libc::sysinfo(&mut raw) } != 0 {
        return Err(PlatformError::last_os_error("sysinfo"));
    }

    let unit = u64::from(raw.mem_unit.max(1));
    let info = KernelSysInfo {
        total_ram: (raw.totalram as u64).saturating_mul(unit),
        free_ram: (raw.freeram as u64).saturating_mul(unit),
        uptime_secs: raw.uptime.max(0) as u64,
    };
    debug!(
        "sysinfo: total_ram={} free_ram={} uptime={}s",
        info.total_ram, info.free_ram, info.uptime_secs
    );
    Ok(info)
}

/// Get the system page size
pub fn page_size() -> u64 {
    // SAFETY: sysconf has no preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as u64
    } else {
        4096 // Default fallback
    }
}

/// Resident set size of the current process in bytes.
pub fn process_resident_bytes(page_size: u64) -> PlatformResult<u64> {
    let statm = fs::read_to_string(SELF_STATM)?;
    parse_statm_resident(&statm, page_size)
}

/// Parse the resident page count out of a statm line.
///
/// Format: `size resident shared text lib data dt`, all in pages.
pub fn parse_statm_resident(statm: &str, page_size: u64) -> PlatformResult<u64> {
    let resident = statm
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| PlatformError::Parse(format!("statm too short: {:?}", statm.trim())))?;

    let pages: u64 = resident
        .parse()
        .map_err(|e| PlatformError::Parse(format!("statm resident {:?}: {}", resident, e)))?;

    Ok(pages.saturating_mul(page_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_statm() {
        let bytes = parse_statm_resident("5620 1234 800 12 0 900 0\n", 4096).unwrap();
        assert_eq!(bytes, 1234 * 4096);
    }

    #[test]
    fn test_parse_statm_malformed() {
        assert!(matches!(parse_statm_resident("5620", 4096), Err(PlatformError::Parse(_))));
        assert!(matches!(parse_statm_resident("1 x 2", 4096), Err(PlatformError::Parse(_))));
    }

    #[test]
    fn test_read_sysinfo() {
        let info = read_sysinfo().unwrap();
        assert!(info.total_ram > 0);
        assert!(info.free_ram <= info.total_ram);
    }

    #[test]
    fn test_process_resident_self() {
        let rss = process_resident_bytes(page_size()).unwrap();
        assert!(rss > 0);
    }
}
