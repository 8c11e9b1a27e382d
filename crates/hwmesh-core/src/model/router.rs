// ── Router-level information ──

use serde::Serialize;

/// Identity and firmware details from `api/system/deviceinfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouterInfo {
    pub name: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub software_version: Option<String>,
    pub hardware_version: Option<String>,
    pub harmony_os_version: Option<String>,
    /// Seconds since boot.
    pub uptime: Option<u64>,
}

/// Upstream connection state from `api/ntwk/wandetect`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    /// Seconds the WAN link has been up.
    pub uptime: u64,
    pub connected: bool,
    pub address: Option<String>,
}
