use thiserror::Error;

/// Top-level error type for the `hwmesh-api` crate.
///
/// Every failure the router session can produce is categorized here so
/// callers can branch on the category (most importantly "unauthorized")
/// without inspecting HTTP details. `hwmesh-core` passes these through
/// unchanged.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, locked account, bad handshake).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The session is not (or no longer) authorized for the request.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// A write was attempted before any CSRF token was obtained.
    #[error("No CSRF token available -- log in first")]
    MissingCsrf,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success HTTP status that is not an authorization failure.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Router API ──────────────────────────────────────────────────
    /// The router answered with a non-zero `errcode`.
    #[error("Router API error {code}: {message}")]
    Api { code: i64, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if the endpoint does not exist on this firmware.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Http { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}
