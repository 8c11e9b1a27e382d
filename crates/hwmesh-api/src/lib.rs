// hwmesh-api: Async session client for the Huawei mesh router JSON API

pub mod auth;
pub mod client;
pub mod error;
pub mod scram;
pub mod transport;

pub use client::{CsrfToken, RouterClient};
pub use error::Error;
pub use transport::{AuthCheck, TlsMode, Transport, TransportConfig};
