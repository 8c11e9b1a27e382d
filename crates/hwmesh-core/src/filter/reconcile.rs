// ── Access-list reconciliation ──
//
// For one band, one device and one (mode, action) intent, compute the
// new whitelist/blacklist pair. Works on copies; nothing is written here.
//
// | Action | Mode      | Whitelist | Blacklist |
// |--------|-----------|-----------|-----------|
// | Add    | Whitelist | add       | remove    |
// | Add    | Blacklist | remove    | add       |
// | Remove | Whitelist | remove    | -         |
// | Remove | Blacklist | -         | remove    |

use std::future::Future;

use tracing::debug;

use crate::error::CoreError;
use crate::model::{AccessListEntry, BandFilterState, FilterAction, FilterMode, MacAddress};

/// New list contents for one band.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// `false` when the band already satisfies the intent.
    pub need_action: bool,
    pub whitelist: Vec<AccessListEntry>,
    pub blacklist: Vec<AccessListEntry>,
}

/// Reconcile one band's lists against the requested intent.
///
/// Returns `Ok(None)` when the band lacks either list. `new_entry` is
/// awaited only when the device is in neither list and must be created;
/// a device found in the opposite list is moved with its stored name.
/// An add always clears the device from the opposite list, even when the
/// target list already holds it.
pub async fn reconcile<F, Fut>(
    state: &BandFilterState,
    mode: FilterMode,
    action: FilterAction,
    mac: &MacAddress,
    new_entry: F,
) -> Result<Option<Reconciliation>, CoreError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<AccessListEntry, CoreError>>,
{
    let band = state.band_label();

    let Some(whitelist) = state.whitelist.as_ref() else {
        debug!(band, "cannot find whitelist");
        return Ok(None);
    };
    let Some(blacklist) = state.blacklist.as_ref() else {
        debug!(band, "cannot find blacklist");
        return Ok(None);
    };

    let mut whitelist = whitelist.clone();
    let mut blacklist = blacklist.clone();

    let (target, other) = match mode {
        FilterMode::Whitelist => (&mut whitelist, &mut blacklist),
        FilterMode::Blacklist => (&mut blacklist, &mut whitelist),
    };

    let need_action = match action {
        FilterAction::Remove => {
            let before = target.len();
            target.retain(|entry| !entry.matches(mac));
            let removed = target.len() != before;
            if !removed {
                debug!(%mac, band, list = %mode, "device not in list, nothing to remove");
            }
            removed
        }
        FilterAction::Add => {
            let moved = other
                .iter()
                .position(|entry| entry.matches(mac))
                .map(|index| other.remove(index));
            other.retain(|entry| !entry.matches(mac));

            if target.iter().any(|entry| entry.matches(mac)) {
                debug!(%mac, band, list = %mode, "device already in list");
                false
            } else {
                let entry = match moved {
                    Some(entry) => {
                        debug!(%mac, band, "moving device between lists");
                        entry
                    }
                    None => new_entry().await?,
                };
                target.push(entry);
                true
            }
        }
    };

    Ok(Some(Reconciliation {
        need_action,
        whitelist,
        blacklist,
    }))
}
