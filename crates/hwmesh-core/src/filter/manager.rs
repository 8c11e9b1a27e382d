// ── Filter-intent orchestration ──
//
// Every operation reads both bands fresh, computes both sides fully,
// and only then issues a single combined write. Unusable router state
// is reported as `Ok(false)`; transport failures propagate.

use hwmesh_api::Transport;
use serde_json::Value;
use tracing::{debug, warn};

use super::fetch::{BandStates, WLAN_FILTER_PATH, fetch_band_states};
use super::names::{DeviceDirectory, resolve_entry};
use super::reconcile::{Reconciliation, reconcile};
use crate::error::CoreError;
use crate::model::{
    BandFilterConfig, BandFilterState, FilterAction, FilterCommand, FilterInfo, FilterMode,
    MacAddress,
};

/// Drives the WLAN MAC filter of one router.
///
/// Holds no state between calls; concurrent operations against the same
/// router race at the device, so callers run one at a time.
pub struct FilterManager<'a, T: ?Sized, D: ?Sized> {
    transport: &'a T,
    directory: &'a D,
}

impl<'a, T, D> FilterManager<'a, T, D>
where
    T: Transport + ?Sized,
    D: DeviceDirectory + ?Sized,
{
    pub fn new(transport: &'a T, directory: &'a D) -> Self {
        Self {
            transport,
            directory,
        }
    }

    /// Add `mac` to, or remove it from, the list named by `mode` on both bands.
    ///
    /// Refuses (returns `false`) unless filtering is enabled on both bands.
    pub async fn apply(
        &self,
        mode: FilterMode,
        action: FilterAction,
        mac: &MacAddress,
        name: Option<&str>,
    ) -> Result<bool, CoreError> {
        let Some((state_2g, state_5g)) = self.both_bands().await? else {
            return Ok(false);
        };

        if !verify_enabled(&state_2g) || !verify_enabled(&state_5g) {
            debug!("filter state verification failed");
            return Ok(false);
        }

        let new_entry = || resolve_entry(self.directory, mac, name);

        let Some(lists_2g) = reconcile(&state_2g, mode, action, mac, new_entry).await? else {
            debug!("processing 2.4GHz filter failed");
            return Ok(false);
        };
        let Some(lists_5g) = reconcile(&state_5g, mode, action, mac, new_entry).await? else {
            debug!("processing 5GHz filter failed");
            return Ok(false);
        };

        if !lists_2g.need_action && !lists_5g.need_action {
            debug!(%mac, %mode, %action, "filter already satisfied");
            return Ok(true);
        }

        let command = FilterCommand {
            config2g: with_lists(&state_2g, lists_2g),
            config5g: with_lists(&state_5g, lists_5g),
        };
        self.write(&command).await?;
        debug!(%mac, %mode, %action, "filter applied");
        Ok(true)
    }

    /// Switch the active policy on both bands.
    ///
    /// The 5GHz band is the comparison point; both bands are kept equal.
    pub async fn set_filter_mode(&self, mode: FilterMode) -> Result<bool, CoreError> {
        let Some((state_2g, state_5g)) = self.both_bands().await? else {
            return Ok(false);
        };

        let current = state_5g.policy.as_ref().and_then(Value::as_i64);
        if current == Some(mode.policy_value()) {
            debug!(%mode, "filter mode already set");
            return Ok(true);
        }

        let policy = Some(Value::from(mode.policy_value()));
        let mut config2g = BandFilterConfig::from(&state_2g);
        config2g.policy.clone_from(&policy);
        let mut config5g = BandFilterConfig::from(&state_5g);
        config5g.policy = policy;

        self.write(&FilterCommand { config2g, config5g }).await?;
        debug!(%mode, "filter mode changed");
        Ok(true)
    }

    /// Turn MAC filtering on or off on both bands.
    ///
    /// Filtering counts as on only when both bands report it enabled.
    pub async fn set_filter_enabled(&self, enabled: bool) -> Result<bool, CoreError> {
        let Some((state_2g, state_5g)) = self.both_bands().await? else {
            return Ok(false);
        };

        if (state_2g.is_enabled() && state_5g.is_enabled()) == enabled {
            debug!(enabled, "filter enablement already set");
            return Ok(true);
        }

        let mut config2g = BandFilterConfig::from(&state_2g);
        config2g.enabled = Some(Value::Bool(enabled));
        let mut config5g = BandFilterConfig::from(&state_5g);
        config5g.enabled = Some(Value::Bool(enabled));

        self.write(&FilterCommand { config2g, config5g }).await?;
        debug!(enabled, "filter enablement changed");
        Ok(true)
    }

    /// Read-only view of both bands: `(2.4GHz, 5GHz)`.
    pub async fn filter_info(&self) -> Result<(Option<FilterInfo>, Option<FilterInfo>), CoreError> {
        let BandStates { two_ghz, five_ghz } = fetch_band_states(self.transport).await?;
        Ok((
            two_ghz.as_ref().map(FilterInfo::from),
            five_ghz.as_ref().map(FilterInfo::from),
        ))
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn both_bands(&self) -> Result<Option<(BandFilterState, BandFilterState)>, CoreError> {
        let BandStates { two_ghz, five_ghz } = fetch_band_states(self.transport).await?;

        let Some(state_2g) = two_ghz else {
            debug!("cannot find current 2.4GHz filter state");
            return Ok(None);
        };
        let Some(state_5g) = five_ghz else {
            debug!("cannot find current 5GHz filter state");
            return Ok(None);
        };
        Ok(Some((state_2g, state_5g)))
    }

    async fn write(&self, command: &FilterCommand) -> Result<(), CoreError> {
        let payload =
            serde_json::to_value(command).map_err(|e| CoreError::decode(WLAN_FILTER_PATH, e))?;
        self.transport.post(WLAN_FILTER_PATH, payload, None).await?;
        Ok(())
    }
}

fn verify_enabled(state: &BandFilterState) -> bool {
    let enabled = state.is_enabled();
    if !enabled {
        warn!(band = state.band_label(), "WLAN filtering is not enabled");
    }
    enabled
}

/// The band's config with reconciled lists; filtering stays on.
fn with_lists(state: &BandFilterState, lists: Reconciliation) -> BandFilterConfig {
    BandFilterConfig {
        enabled: Some(Value::Bool(true)),
        whitelist: Some(lists.whitelist),
        blacklist: Some(lists.blacklist),
        ..BandFilterConfig::from(state)
    }
}
