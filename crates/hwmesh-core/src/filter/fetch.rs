// Band-state fetching: one read of the filter endpoint, split by band.

use hwmesh_api::Transport;
use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{Band, BandFilterState};

pub(crate) const WLAN_FILTER_PATH: &str = "api/ntwk/wlanfilterenhance";

/// Current filter state of both bands. Either side may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandStates {
    pub two_ghz: Option<BandFilterState>,
    pub five_ghz: Option<BandFilterState>,
}

/// Read the filter endpoint and partition the reply by band.
pub async fn fetch_band_states<T>(transport: &T) -> Result<BandStates, CoreError>
where
    T: Transport + ?Sized,
{
    let reply = transport.get(WLAN_FILTER_PATH).await?;
    Ok(partition(reply))
}

/// Split a list of band records by their `FrequencyBand` label.
///
/// Records with unknown labels or an undecodable shape are skipped; a
/// later record for the same band replaces an earlier one.
pub fn partition(reply: Value) -> BandStates {
    let mut states = BandStates::default();

    let Value::Array(records) = reply else {
        debug!("filter endpoint did not return a list of bands");
        return states;
    };

    for record in records {
        let state: BandFilterState = match serde_json::from_value(record) {
            Ok(state) => state,
            Err(e) => {
                debug!(error = %e, "skipping undecodable band record");
                continue;
            }
        };
        match state.band() {
            Some(Band::TwoGhz) => states.two_ghz = Some(state),
            Some(Band::FiveGhz) => states.five_ghz = Some(state),
            None => debug!(band = state.band_label(), "skipping unrecognized band"),
        }
    }

    states
}
