// hwmesh-core: Domain model and WLAN filter logic between hwmesh-api and the CLI.

pub mod config;
mod convert;
pub mod error;
pub mod features;
pub mod filter;
pub mod model;
pub mod router;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{RouterConfig, TlsVerification};
pub use error::{ActionErrorKind, CoreError};
pub use filter::{DeviceDirectory, FilterManager};
pub use router::Router;

pub use model::{
    AccessListEntry, Band, BandFilterState, ConnectionInfo, DeviceNode, Feature, FilterAction,
    FilterInfo, FilterMode, KnownDevice, MacAddress, RouterAction, RouterInfo, Switch,
};
