//! Last-error codes reported by the facade

use std::fmt;

use serde::Serialize;

/// The most recent failure recorded by a [`HostMetrics`](super::facade::HostMetrics).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SupportError {
    #[default]
    None = 0,
    DiskQueryFailed = 1,
    MemoryQueryFailed = 2,
    NetworkQueryFailed = 3,
    UptimeQueryFailed = 4,
    MountCheckFailed = 5,
    MountFailed = 6,
    UnmountFailed = 7,
}

impl SupportError {
    pub const ALL: [SupportError; 8] = [
        SupportError::None,
        SupportError::DiskQueryFailed,
        SupportError::MemoryQueryFailed,
        SupportError::NetworkQueryFailed,
        SupportError::UptimeQueryFailed,
        SupportError::MountCheckFailed,
        SupportError::MountFailed,
        SupportError::UnmountFailed,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable description, e.g. `"Error Code 0: No error."`.
    pub fn description(self) -> &'static str {
        match self {
            SupportError::None => "Error Code 0: No error.",
            SupportError::DiskQueryFailed => "Error Code 1: Failed to query volume statistics.",
            SupportError::MemoryQueryFailed => "Error Code 2: Failed to query memory status.",
            SupportError::NetworkQueryFailed => "Error Code 3: Failed to enumerate network adapters.",
            SupportError::UptimeQueryFailed => "Error Code 4: Failed to query system uptime.",
            SupportError::MountCheckFailed => "Error Code 5: Failed to read the mount table.",
            SupportError::MountFailed => "Error Code 6: Failed to mount drive.",
            SupportError::UnmountFailed => "Error Code 7: Failed to unmount drive.",
        }
    }
}

impl fmt::Display for SupportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_none() {
        assert_eq!(SupportError::default(), SupportError::None);
        assert_eq!(SupportError::None.description(), "Error Code 0: No error.");
    }

    #[test]
    fn test_descriptions_carry_their_code() {
        for err in SupportError::ALL {
            let prefix = format!("Error Code {}:", err.code());
            assert!(err.description().starts_with(&prefix), "{:?}", err);
        }
    }
}
