// ── Devices ──
//
// Known client devices (`api/system/HostInfo`) and the mesh topology
// tree (`api/device/topology`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::MacAddress;

/// A client device the router has seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownDevice {
    #[serde(rename = "MACAddress", default)]
    pub mac_address: String,
    #[serde(rename = "ActualName", default)]
    pub actual_name: Option<String>,
    #[serde(rename = "HostName", default)]
    pub host_name: Option<String>,
    #[serde(rename = "IPAddress", default)]
    pub ip_address: Option<String>,
    #[serde(rename = "Active", default)]
    pub is_active: bool,
    #[serde(rename = "IsGuest", default)]
    pub is_guest: bool,
    #[serde(rename = "InterfaceType", default)]
    pub interface_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KnownDevice {
    pub fn mac(&self) -> Option<MacAddress> {
        self.mac_address.parse().ok()
    }

    /// The user-assigned name, falling back to the reported host name.
    pub fn name(&self) -> Option<&str> {
        self.actual_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.host_name.as_deref().filter(|n| !n.is_empty()))
    }
}

/// A node in the mesh topology: a router, a satellite or a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceNode {
    #[serde(rename = "MACAddress", default)]
    pub mac_address: Option<String>,
    #[serde(rename = "HiLinkType", default)]
    pub hilink_type: Option<String>,
    #[serde(rename = "ConnectedDevices", default)]
    pub connected_devices: Vec<DeviceNode>,
}

impl DeviceNode {
    /// Depth-first walk yielding `(depth, node)`, this node at depth 0.
    pub fn walk(&self) -> Vec<(usize, &DeviceNode)> {
        let mut out = Vec::new();
        let mut stack = vec![(0, self)];
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, node));
            for child in node.connected_devices.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_device_name_falls_back_to_host_name() {
        let device: KnownDevice = serde_json::from_value(json!({
            "MACAddress": "AA:BB:CC:DD:EE:FF",
            "ActualName": "",
            "HostName": "android-1234",
            "Active": true,
            "Layer2Interface": "SSID1"
        }))
        .unwrap();
        assert_eq!(device.name(), Some("android-1234"));
        assert!(device.is_active);
        assert!(!device.is_guest);
        assert_eq!(device.extra["Layer2Interface"], "SSID1");
    }

    #[test]
    fn topology_walk_is_depth_first() {
        let root: DeviceNode = serde_json::from_value(json!({
            "MACAddress": "00:00:00:00:00:01",
            "HiLinkType": "Device",
            "ConnectedDevices": [
                {
                    "MACAddress": "00:00:00:00:00:02",
                    "HiLinkType": "Device",
                    "ConnectedDevices": [{ "MACAddress": "00:00:00:00:00:03" }]
                },
                { "MACAddress": "00:00:00:00:00:04" }
            ]
        }))
        .unwrap();

        let order: Vec<(usize, &str)> = root
            .walk()
            .into_iter()
            .map(|(d, n)| (d, n.mac_address.as_deref().unwrap()))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, "00:00:00:00:00:01"),
                (1, "00:00:00:00:00:02"),
                (2, "00:00:00:00:00:03"),
                (1, "00:00:00:00:00:04"),
            ]
        );
    }
}
