//! Unit conversions shared by the facade

use serde::Serialize;

/// Bytes per gigabyte (binary, 1024^3).
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Convert a byte count to binary gigabytes.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// `part` as a percentage of `total`; 0 when `total` is 0.
pub fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64) * 100.0
}

/// Uptime split into hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UptimeHms {
    pub hours: u64,
    pub mins: u64,
    pub secs: u64,
}

impl UptimeHms {
    /// Decompose `seconds`, or `None` when it is not positive.
    ///
    /// A genuine uptime of 0 seconds is indistinguishable from a failed
    /// uptime query and is rejected as well.
    pub fn from_seconds(seconds: u64) -> Option<Self> {
        if seconds == 0 {
            return None;
        }
        let mins = seconds / 60;
        Some(Self {
            hours: mins / 60,
            mins: mins % 60,
            secs: seconds % 60,
        })
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + self.mins * 60 + self.secs
    }
}

impl std::fmt::Display for UptimeHms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h {:02}m {:02}s", self.hours, self.mins, self.secs)
    }
}
