// ── Feature detection ──
//
// Each probe is one GET. A probe is composed as
// `log_feature(feature, unauthorized_as_false(probe))`: an unauthorized
// reply means "not available", any other failure propagates.

use std::collections::BTreeSet;
use std::future::Future;

use hwmesh_api::Transport;
use serde_json::Value;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::error::CoreError;
use crate::filter::fetch::WLAN_FILTER_PATH;
use crate::model::Feature;

pub(crate) const NFC_PATH: &str = "api/bsp/nfc_switch";
pub(crate) const WLAN_GUIDE_PATH: &str = "api/ntwk/WlanGuideBasic?type=notshowpassall";

/// Treat an unauthorized failure as `false`.
pub async fn unauthorized_as_false<F>(check: F) -> Result<bool, CoreError>
where
    F: Future<Output = Result<bool, CoreError>>,
{
    match check.await {
        Err(e) if e.is_unauthorized() => Ok(false),
        other => other,
    }
}

/// Log around a feature check.
pub async fn log_feature<F>(feature: Feature, check: F) -> Result<bool, CoreError>
where
    F: Future<Output = Result<bool, CoreError>>,
{
    debug!(%feature, "checking feature availability");
    let result = check.await;
    match &result {
        Ok(true) => debug!(%feature, "feature is available"),
        Ok(false) => debug!(%feature, "feature is not available"),
        Err(e) => debug!(%feature, error = %e, "feature availability check failed"),
    }
    result
}

/// Probe every known feature and return the available ones.
pub async fn detect_features<T>(transport: &T) -> Result<BTreeSet<Feature>, CoreError>
where
    T: Transport + ?Sized,
{
    let mut available = BTreeSet::new();
    for feature in Feature::iter() {
        if log_feature(feature, unauthorized_as_false(probe(transport, feature))).await? {
            available.insert(feature);
        }
    }
    Ok(available)
}

async fn probe<T>(transport: &T, feature: Feature) -> Result<bool, CoreError>
where
    T: Transport + ?Sized,
{
    match feature {
        Feature::Nfc => {
            let data = transport.get(NFC_PATH).await?;
            Ok(data.get("nfcSwitch").is_some_and(|v| !v.is_null()))
        }
        Feature::Wifi80211r => {
            let data = transport.get(WLAN_GUIDE_PATH).await?;
            Ok(wifi_config(&data, "Dot11REnable").is_some())
        }
        Feature::WifiTwt => {
            let data = transport.get(WLAN_GUIDE_PATH).await?;
            Ok(wifi_config(&data, "TWTEnable").is_some())
        }
        Feature::WlanFilter => {
            let data = transport.get(WLAN_FILTER_PATH).await?;
            Ok(!data.is_null())
        }
    }
}

/// `WifiConfig[0].<key>`, if present and non-null.
pub(crate) fn wifi_config<'v>(data: &'v Value, key: &str) -> Option<&'v Value> {
    data.get("WifiConfig")
        .and_then(|configs| configs.get(0))
        .and_then(|config| config.get(key))
        .filter(|v| !v.is_null())
}
