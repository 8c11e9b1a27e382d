// ── Router facade ──
//
// One entry point per router: feature detection, switches, actions,
// info reads and the WLAN filter. Generic over the transport so tests
// can drive it without HTTP.

use std::collections::BTreeSet;

use async_trait::async_trait;
use hwmesh_api::{RouterClient, Transport};
use serde_json::{Value, json};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::RouterConfig;
use crate::convert;
use crate::error::CoreError;
use crate::features::{NFC_PATH, WLAN_GUIDE_PATH, detect_features, wifi_config};
use crate::filter::{DeviceDirectory, FilterManager};
use crate::model::{
    ConnectionInfo, DeviceNode, Feature, FilterAction, FilterInfo, FilterMode, KnownDevice,
    MacAddress, RouterAction, RouterInfo, Switch,
};

const DEVICE_INFO_PATH: &str = "api/system/deviceinfo";
const HOST_INFO_PATH: &str = "api/system/HostInfo";
const TOPOLOGY_PATH: &str = "api/device/topology";
const REBOOT_PATH: &str = "api/service/reboot.cgi";
const WANDETECT_PATH: &str = "api/ntwk/wandetect";

/// Deviceinfo answers 200 with placeholder data when not logged in.
fn device_info_authorized(status: u16, body: &Value) -> bool {
    status != 404 && body.get("EmuiVersion").and_then(Value::as_str).unwrap_or("-") != "-"
}

fn wan_info_authorized(status: u16, body: &Value) -> bool {
    status != 404
        && body
            .get("ExternalIPAddress")
            .and_then(Value::as_str)
            .unwrap_or("-")
            != "-"
}

/// A connected router.
pub struct Router<T> {
    transport: T,
    features: OnceCell<BTreeSet<Feature>>,
}

impl Router<RouterClient> {
    /// Build an HTTP client from `config` and log in.
    pub async fn connect(config: &RouterConfig) -> Result<Self, CoreError> {
        if config.username.trim().is_empty() {
            return Err(CoreError::Config {
                message: "username must not be empty".into(),
            });
        }

        let client = RouterClient::new(config.url.clone(), &config.transport_config())?;
        client.login(&config.username, &config.password).await?;
        info!(url = %config.url, "connected to router");
        Ok(Self::new(client))
    }

    /// Log out. The router keeps few session slots, so do this when done.
    pub async fn disconnect(&self) -> Result<(), CoreError> {
        if let Err(e) = self.transport.logout().await {
            warn!(error = %e, "logout failed");
            return Err(e.into());
        }
        debug!("disconnected from router");
        Ok(())
    }
}

impl<T: Transport> Router<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            features: OnceCell::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Features ─────────────────────────────────────────────────────

    async fn features(&self) -> Result<&BTreeSet<Feature>, CoreError> {
        self.features
            .get_or_try_init(|| async {
                debug!("updating available features");
                let features = detect_features(&self.transport).await?;
                debug!(count = features.len(), "available features updated");
                Ok::<_, CoreError>(features)
            })
            .await
    }

    /// Probed once per `Router`; later calls use the cached result.
    pub async fn is_feature_available(&self, feature: Feature) -> Result<bool, CoreError> {
        Ok(self.features().await?.contains(&feature))
    }

    pub async fn available_features(&self) -> Result<Vec<Feature>, CoreError> {
        Ok(self.features().await?.iter().copied().collect())
    }

    async fn require(&self, switch: Switch) -> Result<(), CoreError> {
        if self.is_feature_available(switch.feature()).await? {
            Ok(())
        } else {
            Err(CoreError::unsupported(format!(
                "Unsupported switch name: {switch} (feature {} not available)",
                switch.feature()
            )))
        }
    }

    // ── Switches ─────────────────────────────────────────────────────

    pub async fn switch_state(&self, switch: Switch) -> Result<bool, CoreError> {
        self.require(switch).await?;

        match switch {
            Switch::Nfc => {
                let data = self.transport.get(NFC_PATH).await?;
                Ok(data.get("nfcSwitch").and_then(Value::as_i64) == Some(1))
            }
            Switch::Wifi80211r => {
                let data = self.transport.get(WLAN_GUIDE_PATH).await?;
                Ok(wifi_config(&data, "Dot11REnable").and_then(Value::as_bool) == Some(true))
            }
            Switch::WifiTwt => {
                let data = self.transport.get(WLAN_GUIDE_PATH).await?;
                Ok(wifi_config(&data, "TWTEnable").and_then(Value::as_bool) == Some(true))
            }
            Switch::WlanFilter => {
                let (_, info_5g) = self.wlan_filter_info().await?;
                Ok(info_5g.is_some_and(|info| info.enabled))
            }
        }
    }

    /// Returns `false` only when the WLAN filter state could not be verified.
    pub async fn set_switch_state(&self, switch: Switch, state: bool) -> Result<bool, CoreError> {
        self.require(switch).await?;
        debug!(%switch, state, "setting switch");

        match switch {
            Switch::Nfc => {
                let payload = json!({ "nfcSwitch": i32::from(state) });
                self.transport.post(NFC_PATH, payload, None).await?;
            }
            Switch::Wifi80211r => {
                let payload = json!({ "Dot11REnable": state });
                let extra = json!({ "action": "11rSetting" });
                self.transport.post(WLAN_GUIDE_PATH, payload, Some(extra)).await?;
            }
            Switch::WifiTwt => {
                let payload = json!({ "TWTEnable": state });
                let extra = json!({ "action": "TWTSetting" });
                self.transport.post(WLAN_GUIDE_PATH, payload, Some(extra)).await?;
            }
            Switch::WlanFilter => return self.set_wlan_filter_enabled(state).await,
        }
        Ok(true)
    }

    // ── Actions ──────────────────────────────────────────────────────

    pub async fn execute_action(&self, action: RouterAction) -> Result<(), CoreError> {
        match action {
            RouterAction::Reboot => {
                info!("rebooting router");
                self.transport.post(REBOOT_PATH, json!({}), None).await?;
            }
        }
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub async fn router_info(&self) -> Result<RouterInfo, CoreError> {
        let data = self
            .transport
            .get_checked(DEVICE_INFO_PATH, device_info_authorized)
            .await?;
        Ok(convert::router_info(&data))
    }

    pub async fn wan_connection_info(&self) -> Result<ConnectionInfo, CoreError> {
        let data = self
            .transport
            .get_checked(WANDETECT_PATH, wan_info_authorized)
            .await?;
        Ok(convert::connection_info(&data))
    }

    pub async fn known_devices(&self) -> Result<Vec<KnownDevice>, CoreError> {
        let data = self.transport.get(HOST_INFO_PATH).await?;
        convert::list(HOST_INFO_PATH, data)
    }

    pub async fn devices_topology(&self) -> Result<Vec<DeviceNode>, CoreError> {
        let data = self.transport.get(TOPOLOGY_PATH).await?;
        convert::list(TOPOLOGY_PATH, data)
    }

    // ── WLAN filter ──────────────────────────────────────────────────

    /// Filter operations, resolving names through this router's device list.
    pub fn filter(&self) -> FilterManager<'_, T, Self> {
        FilterManager::new(&self.transport, self)
    }

    pub async fn apply_wlan_filter(
        &self,
        mode: FilterMode,
        action: FilterAction,
        mac: &MacAddress,
        name: Option<&str>,
    ) -> Result<bool, CoreError> {
        self.filter().apply(mode, action, mac, name).await
    }

    pub async fn set_wlan_filter_mode(&self, mode: FilterMode) -> Result<bool, CoreError> {
        self.filter().set_filter_mode(mode).await
    }

    pub async fn set_wlan_filter_enabled(&self, enabled: bool) -> Result<bool, CoreError> {
        self.filter().set_filter_enabled(enabled).await
    }

    pub async fn wlan_filter_info(
        &self,
    ) -> Result<(Option<FilterInfo>, Option<FilterInfo>), CoreError> {
        self.filter().filter_info().await
    }
}

#[async_trait]
impl<T: Transport> DeviceDirectory for Router<T> {
    async fn known_devices(&self) -> Result<Vec<KnownDevice>, CoreError> {
        Router::known_devices(self).await
    }
}
