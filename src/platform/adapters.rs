//! Network adapter name filters
//!
//! Pure helpers shared by the platform implementations, kept free of any
//! OS calls so every target can test them.

/// Linux name of the loopback interface.
pub const LINUX_LOOPBACK: &str = "lo";

/// Darwin link-layer type for Ethernet-like interfaces (`IFT_ETHER`).
pub const IFT_ETHER: u8 = 0x06;

/// Interface index Darwin assigns to the loopback device.
pub const DARWIN_LOOPBACK_INDEX: u16 = 1;

/// IP Helper adapter type for Ethernet (`MIB_IF_TYPE_ETHERNET`).
pub const MIB_IF_TYPE_ETHERNET: u32 = 6;

/// Name fragments that disqualify a Windows adapter from the Ethernet count.
const WINDOWS_EXCLUDED: &[&str] = &[
    "loopback",
    "virtual",
    "vethernet",
    "bluetooth",
    "wi-fi",
    "wireless",
    "wlan",
    "802.11",
];

/// Interface names listed in `/proc/net/dev`.
///
/// The first two lines are column headers; each remaining line is
/// `<name>: <counters...>` with the name right-aligned.
pub fn proc_net_dev_names(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .lines()
        .skip(2)
        .filter_map(|line| line.split_once(':'))
        .map(|(name, _)| name.trim())
        .filter(|name| !name.is_empty())
}

/// Whether a Linux interface name looks like a wired Ethernet device
/// (`eth0`, `enp3s0`, `eno1`, ...).
pub fn is_linux_ethernet_name(name: &str) -> bool {
    name != LINUX_LOOPBACK
        && !name.starts_with("lo:")
        && (name.starts_with("eth") || name.starts_with("en"))
}

/// Count Ethernet interfaces in the contents of `/proc/net/dev`.
pub fn count_linux_ethernet(contents: &str) -> usize {
    proc_net_dev_names(contents)
        .filter(|name| is_linux_ethernet_name(name))
        .count()
}

/// Whether a Darwin AF_LINK entry is a non-loopback Ethernet interface.
pub fn is_darwin_ethernet_link(link_type: u8, index: u16, loopback_flag: bool) -> bool {
    link_type == IFT_ETHER && index != DARWIN_LOOPBACK_INDEX && !loopback_flag
}

/// Whether a Windows adapter name refers to a physical adapter.
///
/// Loopback, virtual (Hyper-V, VPN, WSL), Bluetooth PAN and wireless
/// adapters are excluded by name.
pub fn is_windows_physical_adapter(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    !WINDOWS_EXCLUDED.iter().any(|word| lower.contains(word))
}

/// Whether an IP Helper adapter entry is a physical Ethernet adapter.
///
/// Hyper-V and VPN adapters also report the Ethernet type, so the
/// description is filtered on top.
pub fn is_windows_ethernet_adapter(adapter_type: u32, description: &str) -> bool {
    adapter_type == MIB_IF_TYPE_ETHERNET && is_windows_physical_adapter(description)
}
