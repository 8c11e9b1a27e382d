// ── WLAN MAC filter model ──
//
// Wire-faithful mirrors of the `api/ntwk/wlanfilterenhance` records.
// Fields the router sends that we don't interpret are kept verbatim so
// a rewrite never drops them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::MacAddress;

// ── FilterMode / FilterAction ────────────────────────────────────────

/// Which list the router's filter policy currently enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Blacklist,
    Whitelist,
}

impl FilterMode {
    /// The `MacFilterPolicy` value the router uses for this mode.
    pub const fn policy_value(self) -> i64 {
        match self {
            Self::Blacklist => 0,
            Self::Whitelist => 1,
        }
    }
}

impl TryFrom<i64> for FilterMode {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Blacklist),
            1 => Ok(Self::Whitelist),
            other => Err(CoreError::invalid(format!("Unknown filter mode: {other}"))),
        }
    }
}

impl FromStr for FilterMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blacklist" | "black" | "0" => Ok(Self::Blacklist),
            "whitelist" | "white" | "1" => Ok(Self::Whitelist),
            _ => Err(CoreError::invalid(format!("Unknown filter mode: {s:?}"))),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Blacklist => "blacklist",
            Self::Whitelist => "whitelist",
        })
    }
}

/// Add a device to, or remove it from, the list named by a [`FilterMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterAction {
    Add,
    Remove,
}

impl FromStr for FilterAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            _ => Err(CoreError::invalid(format!("Unknown filter action: {s:?}"))),
        }
    }
}

impl fmt::Display for FilterAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Remove => "remove",
        })
    }
}

// ── Band ─────────────────────────────────────────────────────────────

/// Radio band; the router filters each one independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    #[serde(rename = "2.4GHz")]
    TwoGhz,
    #[serde(rename = "5GHz")]
    FiveGhz,
}

impl Band {
    /// The `FrequencyBand` label the router uses.
    pub const fn label(self) -> &'static str {
        match self {
            Self::TwoGhz => "2.4GHz",
            Self::FiveGhz => "5GHz",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "2.4GHz" => Some(Self::TwoGhz),
            "5GHz" => Some(Self::FiveGhz),
            _ => None,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── AccessListEntry ──────────────────────────────────────────────────

/// One whitelist/blacklist entry as the router stores it.
///
/// A missing or `null` address decodes as `None`; such an entry never
/// matches a device and is written back as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessListEntry {
    #[serde(rename = "MACAddress", default)]
    pub mac_address: Option<String>,
    #[serde(rename = "HostName", default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccessListEntry {
    pub fn new(mac: MacAddress, host_name: impl Into<String>) -> Self {
        Self {
            mac_address: Some(mac.to_string()),
            host_name: Some(host_name.into()),
            extra: Map::new(),
        }
    }

    /// The parsed address, if the stored text is a valid MAC.
    pub fn mac(&self) -> Option<MacAddress> {
        self.mac_address.as_deref()?.parse().ok()
    }

    /// Case-insensitive address match.
    pub fn matches(&self, mac: &MacAddress) -> bool {
        self.mac().as_ref() == Some(mac)
    }
}

// ── BandFilterState ──────────────────────────────────────────────────

/// One band's filter configuration as returned by the router.
///
/// Every field is optional: firmware variants omit some of them, and the
/// filter logic checks presence explicitly instead of failing to decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandFilterState {
    #[serde(rename = "FrequencyBand", default)]
    pub frequency_band: Option<String>,
    #[serde(rename = "MACAddressControlEnabled", default)]
    pub enabled: Option<Value>,
    #[serde(rename = "WMACAddresses", default)]
    pub whitelist: Option<Vec<AccessListEntry>>,
    #[serde(rename = "BMACAddresses", default)]
    pub blacklist: Option<Vec<AccessListEntry>>,
    #[serde(rename = "ID", default)]
    pub id: Option<Value>,
    #[serde(rename = "MacFilterPolicy", default)]
    pub policy: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BandFilterState {
    pub fn band(&self) -> Option<Band> {
        self.frequency_band.as_deref().and_then(Band::from_label)
    }

    /// Only a literal `true` counts as enabled.
    pub fn is_enabled(&self) -> bool {
        matches!(self.enabled, Some(Value::Bool(true)))
    }

    /// The active policy, if it is a recognized value.
    pub fn filter_mode(&self) -> Option<FilterMode> {
        self.policy
            .as_ref()
            .and_then(Value::as_i64)
            .and_then(|v| FilterMode::try_from(v).ok())
    }

    pub(crate) fn band_label(&self) -> &str {
        self.frequency_band.as_deref().unwrap_or("unknown")
    }
}

// ── Write command ────────────────────────────────────────────────────

/// One band's half of the filter write command.
///
/// Absent values serialize as `null`, matching what the router sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandFilterConfig {
    #[serde(rename = "MACAddressControlEnabled")]
    pub enabled: Option<Value>,
    #[serde(rename = "WMacFilters")]
    pub whitelist: Option<Vec<AccessListEntry>>,
    #[serde(rename = "ID")]
    pub id: Option<Value>,
    #[serde(rename = "MacFilterPolicy")]
    pub policy: Option<Value>,
    #[serde(rename = "BMacFilters")]
    pub blacklist: Option<Vec<AccessListEntry>>,
    #[serde(rename = "FrequencyBand")]
    pub frequency_band: Option<String>,
}

impl From<&BandFilterState> for BandFilterConfig {
    fn from(state: &BandFilterState) -> Self {
        Self {
            enabled: state.enabled.clone(),
            whitelist: state.whitelist.clone(),
            id: state.id.clone(),
            policy: state.policy.clone(),
            blacklist: state.blacklist.clone(),
            frequency_band: state.frequency_band.clone(),
        }
    }
}

/// The combined write covering both bands in one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCommand {
    pub config2g: BandFilterConfig,
    pub config5g: BandFilterConfig,
}

// ── FilterInfo ───────────────────────────────────────────────────────

/// Read-only projection of a band's filter state for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterInfo {
    pub band: Option<Band>,
    pub enabled: bool,
    pub mode: Option<FilterMode>,
    pub whitelist: Vec<AccessListEntry>,
    pub blacklist: Vec<AccessListEntry>,
}

impl From<&BandFilterState> for FilterInfo {
    fn from(state: &BandFilterState) -> Self {
        Self {
            band: state.band(),
            enabled: state.is_enabled(),
            mode: state.filter_mode(),
            whitelist: state.whitelist.clone().unwrap_or_default(),
            blacklist: state.blacklist.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn filter_mode_wire_values() {
        assert_eq!(FilterMode::Blacklist.policy_value(), 0);
        assert_eq!(FilterMode::Whitelist.policy_value(), 1);
        assert_eq!(FilterMode::try_from(1).unwrap(), FilterMode::Whitelist);
        assert!(FilterMode::try_from(2).is_err());
    }

    #[test]
    fn filter_mode_and_action_parse() {
        assert_eq!("WhiteList".parse::<FilterMode>().unwrap(), FilterMode::Whitelist);
        assert_eq!("0".parse::<FilterMode>().unwrap(), FilterMode::Blacklist);
        assert!("greylist".parse::<FilterMode>().is_err());
        assert_eq!("remove".parse::<FilterAction>().unwrap(), FilterAction::Remove);
        assert!("toggle".parse::<FilterAction>().is_err());
    }

    #[test]
    fn band_state_decodes_router_record() {
        let state: BandFilterState = serde_json::from_value(json!({
            "FrequencyBand": "5GHz",
            "MACAddressControlEnabled": true,
            "WMACAddresses": [{ "MACAddress": "aa:bb:cc:dd:ee:ff", "HostName": "phone" }],
            "BMACAddresses": [],
            "ID": "InternetGatewayDevice.X_Config.Wifi.Radio.2.Ssid.1.",
            "MacFilterPolicy": 1,
            "SSIDName": "home"
        }))
        .unwrap();

        assert_eq!(state.band(), Some(Band::FiveGhz));
        assert!(state.is_enabled());
        assert_eq!(state.filter_mode(), Some(FilterMode::Whitelist));
        assert_eq!(state.extra.get("SSIDName"), Some(&json!("home")));
        let mac: MacAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        assert!(state.whitelist.unwrap()[0].matches(&mac));
    }

    #[test]
    fn non_bool_enabled_counts_as_disabled() {
        let state: BandFilterState =
            serde_json::from_value(json!({ "MACAddressControlEnabled": "true" })).unwrap();
        assert!(!state.is_enabled());
        assert!(state.whitelist.is_none());
    }

    #[test]
    fn config_serializes_with_router_field_names() {
        let state = BandFilterState {
            frequency_band: Some("2.4GHz".into()),
            enabled: Some(json!(false)),
            whitelist: Some(vec![]),
            blacklist: None,
            id: Some(json!("id-1")),
            policy: Some(json!(0)),
            extra: Map::new(),
        };
        let value = serde_json::to_value(BandFilterConfig::from(&state)).unwrap();
        assert_eq!(
            value,
            json!({
                "MACAddressControlEnabled": false,
                "WMacFilters": [],
                "ID": "id-1",
                "MacFilterPolicy": 0,
                "BMacFilters": null,
                "FrequencyBand": "2.4GHz",
            })
        );
    }

    #[test]
    fn entry_without_address_does_not_break_band() {
        let state: BandFilterState = serde_json::from_value(json!({
            "FrequencyBand": "2.4GHz",
            "WMACAddresses": [
                { "MACAddress": null, "HostName": "ghost" },
                { "HostName": "nameless" },
                { "MACAddress": "11:22:33:44:55:66", "HostName": "tv" }
            ],
            "BMACAddresses": []
        }))
        .unwrap();

        let whitelist = state.whitelist.unwrap();
        assert_eq!(whitelist.len(), 3);
        assert!(whitelist[0].mac().is_none());
        assert!(whitelist[1].mac_address.is_none());
        let tv: MacAddress = "11:22:33:44:55:66".parse().unwrap();
        assert!(!whitelist[0].matches(&tv));
        assert!(whitelist[2].matches(&tv));
    }

    #[test]
    fn entry_keeps_unknown_fields() {
        let entry: AccessListEntry = serde_json::from_value(json!({
            "MACAddress": "11:22:33:44:55:66",
            "HostName": "tv",
            "DeviceType": "tv"
        }))
        .unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["DeviceType"], "tv");
    }
}
