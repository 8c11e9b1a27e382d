// ── Domain model ──
//
// Canonical types shared by the filter engine, the router facade and
// the CLI.

pub mod control;
pub mod device;
pub mod filter;
pub mod mac;
pub mod router;

pub use control::{Feature, RouterAction, Switch};
pub use device::{DeviceNode, KnownDevice};
pub use filter::{
    AccessListEntry, Band, BandFilterConfig, BandFilterState, FilterAction, FilterCommand,
    FilterInfo, FilterMode,
};
pub use mac::MacAddress;
pub use router::{ConnectionInfo, RouterInfo};
