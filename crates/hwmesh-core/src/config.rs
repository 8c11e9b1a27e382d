// ── Runtime connection configuration ──
//
// Describes how to reach one router. Carries credentials and connection
// tuning but never touches disk; the CLI builds a `RouterConfig` from
// its profile and hands it in.

use std::time::Duration;

use hwmesh_api::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

const DEFAULT_URL: &str = "http://192.168.3.1";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification. Routers ship self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Router URL (e.g., `http://192.168.3.1`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_URL).expect("default router URL is valid"),
            username: "admin".into(),
            password: SecretString::from(String::new()),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RouterConfig {
    /// Transport settings for the HTTP client, with a fresh cookie jar.
    pub fn transport_config(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }
}
