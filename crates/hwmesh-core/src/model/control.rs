// ── Features, switches and actions ──
//
// Stable string names are what the CLI accepts and prints.

use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// Optional capability a firmware may or may not expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[derive(strum::Display, strum::EnumIter, strum::IntoStaticStr)]
pub enum Feature {
    #[strum(serialize = "nfc")]
    #[serde(rename = "nfc")]
    Nfc,
    #[strum(serialize = "wifi_80211r")]
    #[serde(rename = "wifi_80211r")]
    Wifi80211r,
    #[strum(serialize = "wifi_twt")]
    #[serde(rename = "wifi_twt")]
    WifiTwt,
    #[strum(serialize = "wlan_filter")]
    #[serde(rename = "wlan_filter")]
    WlanFilter,
}

/// A boolean router setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[derive(strum::Display, strum::EnumIter, strum::IntoStaticStr)]
pub enum Switch {
    #[strum(serialize = "nfc_switch")]
    #[serde(rename = "nfc_switch")]
    Nfc,
    #[strum(serialize = "wifi_80211r_switch")]
    #[serde(rename = "wifi_80211r_switch")]
    Wifi80211r,
    #[strum(serialize = "wifi_twt_switch")]
    #[serde(rename = "wifi_twt_switch")]
    WifiTwt,
    #[strum(serialize = "wlan_filter_switch")]
    #[serde(rename = "wlan_filter_switch")]
    WlanFilter,
}

impl Switch {
    /// The feature that must be available for this switch to work.
    pub const fn feature(self) -> Feature {
        match self {
            Self::Nfc => Feature::Nfc,
            Self::Wifi80211r => Feature::Wifi80211r,
            Self::WifiTwt => Feature::WifiTwt,
            Self::WlanFilter => Feature::WlanFilter,
        }
    }
}

impl FromStr for Switch {
    type Err = CoreError;

    /// Accepts `nfc_switch` as well as the short `nfc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let short = name.strip_suffix("_switch").unwrap_or(&name);
        match short {
            "nfc" => Ok(Self::Nfc),
            "wifi_80211r" | "80211r" => Ok(Self::Wifi80211r),
            "wifi_twt" | "twt" => Ok(Self::WifiTwt),
            "wlan_filter" => Ok(Self::WlanFilter),
            _ => Err(CoreError::unsupported(format!("Unsupported switch name: {s}"))),
        }
    }
}

/// A one-shot router command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum RouterAction {
    #[strum(serialize = "reboot_action")]
    Reboot,
}

impl FromStr for RouterAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "reboot_action" | "reboot" => Ok(Self::Reboot),
            _ => Err(CoreError::unsupported(format!("Unsupported action name: {s}"))),
        }
    }
}
