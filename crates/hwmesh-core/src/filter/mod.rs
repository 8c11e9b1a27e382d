// ── WLAN MAC access filter ──
//
// fetch      one read of both band states
// reconcile  per-band list computation
// names      labels for newly created entries
// manager    the public operations, one combined write each

pub mod fetch;
pub mod manager;
pub mod names;
pub mod reconcile;

pub use fetch::{BandStates, fetch_band_states, partition};
pub use manager::FilterManager;
pub use names::{DeviceDirectory, placeholder_name, resolve_entry};
pub use reconcile::{Reconciliation, reconcile};
