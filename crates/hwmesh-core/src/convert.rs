// ── Raw JSON → domain conversions ──
//
// The router's info endpoints return loosely-typed objects whose fields
// vary by firmware; pick out what we use and tolerate the rest.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CoreError;
use crate::model::{ConnectionInfo, RouterInfo};

const STATUS_CONNECTED: &str = "Connected";

fn string_field(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Seconds as either a JSON number or a numeric string.
fn seconds_field(data: &Value, key: &str) -> Option<u64> {
    match data.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn router_info(data: &Value) -> RouterInfo {
    RouterInfo {
        name: string_field(data, "FriendlyName"),
        model: data
            .get("custinfo")
            .and_then(|custinfo| string_field(custinfo, "CustDeviceName")),
        serial_number: string_field(data, "SerialNumber"),
        software_version: string_field(data, "SoftwareVersion"),
        hardware_version: string_field(data, "HardwareVersion"),
        harmony_os_version: string_field(data, "HarmonyOSVersion"),
        uptime: seconds_field(data, "UpTime"),
    }
}

pub(crate) fn connection_info(data: &Value) -> ConnectionInfo {
    ConnectionInfo {
        uptime: seconds_field(data, "Uptime").unwrap_or(0),
        connected: data.get("Status").and_then(Value::as_str) == Some(STATUS_CONNECTED),
        address: string_field(data, "ExternalIPAddress"),
    }
}

/// Decode a list endpoint, naming the endpoint on failure.
pub(crate) fn list<T: DeserializeOwned>(endpoint: &str, data: Value) -> Result<Vec<T>, CoreError> {
    if data.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(data).map_err(|e| CoreError::decode(endpoint, e))
}
