// Shared transport configuration for building reqwest::Client instances.
//
// TLS mode, timeout and the session cookie jar live here so the router
// client and the one-off probes share the same builder logic.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use serde_json::Value;

use crate::client::RouterClient;
use crate::error::Error;

/// Authorization check applied to a GET reply: receives the HTTP status
/// and decoded body (`Null` if undecodable); `false` means unauthorized.
pub type AuthCheck = fn(u16, &Value) -> bool;

/// The read/write surface the domain layer drives.
///
/// [`RouterClient`] is the production implementation; tests substitute
/// in-memory doubles.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Read an endpoint and return its decoded JSON payload.
    async fn get(&self, path: &str) -> Result<Value, Error>;

    /// Read an endpoint whose unauthorized replies look like success.
    async fn get_checked(&self, path: &str, check: AuthCheck) -> Result<Value, Error> {
        let _ = check;
        self.get(path).await
    }

    /// Write `payload` to an endpoint; `extra` fields ride beside the envelope.
    async fn post(&self, path: &str, payload: Value, extra: Option<Value>) -> Result<(), Error>;
}

#[async_trait]
impl Transport for RouterClient {
    async fn get(&self, path: &str) -> Result<Value, Error> {
        self.get_json(path).await
    }

    async fn get_checked(&self, path: &str, check: AuthCheck) -> Result<Value, Error> {
        self.get_json_checked(path, check).await
    }

    async fn post(&self, path: &str, payload: Value, extra: Option<Value>) -> Result<(), Error> {
        self.post_json(path, &payload, extra.as_ref()).await?;
        Ok(())
    }
}

/// TLS verification mode (api-level mirror of core's `TlsVerification`).
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (routers ship self-signed certificates).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(30),
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("hwmesh/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        if let Some(ref jar) = self.cookie_jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Create a config with a fresh cookie jar (the router session id is a cookie).
    pub fn with_cookie_jar(mut self) -> Self {
        self.cookie_jar = Some(Arc::new(Jar::default()));
        self
    }
}
