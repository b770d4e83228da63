//! Volume statistics shared by the Unix platforms

use std::path::Path;

use nix::sys::statvfs::statvfs;
use tracing::debug;

use super::traits::{DiskUsage, PlatformResult};

/// Capacity of the filesystem containing `path` via `statvfs(3)`.
///
/// Free space is `f_bavail`, the blocks available to unprivileged users.
// Block counts are `u32` on some targets and `u64` on others.
#[allow(clippy::unnecessary_cast)]
pub fn statvfs_usage(path: &Path) -> PlatformResult<DiskUsage> {
    let stat = statvfs(path)?;
    let fragment = stat.fragment_size() as u64;

    let usage = DiskUsage {
        total_bytes: (stat.blocks() as u64).saturating_mul(fragment),
        free_bytes: (stat.blocks_available() as u64).saturating_mul(fragment),
    };
    debug!(
        "statvfs({}): total={} free={}",
        path.display(),
        usage.total_bytes,
        usage.free_bytes
    );
    Ok(usage)
}
