//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use hwmesh_api::Error as TransportError;
use hwmesh_config::ConfigError;
use hwmesh_core::{ActionErrorKind, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const FILTER_REFUSED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to router at {url}")]
    #[diagnostic(
        code(hwmesh::connection_failed),
        help(
            "Check that the router is reachable from this machine.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS error: {message}")]
    #[diagnostic(
        code(hwmesh::tls_error),
        help(
            "The router normally uses a self-signed certificate.\n\
             Use --insecure (-k), or set ca_cert in your profile."
        )
    )]
    TlsError { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(hwmesh::timeout),
        help("Increase the timeout with --timeout or check the router's responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(hwmesh::auth_failed),
        help(
            "Verify the user name and password.\n\
             Run: hwmesh config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(hwmesh::no_credentials),
        help(
            "Store one with: hwmesh config set-password --profile {profile}\n\
             Or set the HWMESH_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Router ───────────────────────────────────────────────────────

    #[error("Not found: {message}")]
    #[diagnostic(
        code(hwmesh::not_found),
        help("This firmware does not expose the endpoint. Run: hwmesh features")
    )]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(hwmesh::unsupported),
        help("Run: hwmesh features to see what this router supports")
    )]
    Unsupported { message: String },

    #[error("Router API error ({code}): {message}")]
    #[diagnostic(code(hwmesh::api_error))]
    ApiError { code: String, message: String },

    #[error("WLAN filter {operation} was not applied")]
    #[diagnostic(
        code(hwmesh::filter_refused),
        help(
            "The router's filter state could not be verified: a band is missing,\n\
             filtering is disabled, or the access list is absent.\n\
             Run: hwmesh filter info"
        )
    )]
    FilterNotApplied { operation: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hwmesh::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hwmesh::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: hwmesh config set host <address> --profile {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(hwmesh::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(hwmesh::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::FilterNotApplied { .. } => exit_code::FILTER_REFUSED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Transport / CoreError → CliError mapping ─────────────────────────

impl From<TransportError> for CliError {
    fn from(err: TransportError) -> Self {
        if err.is_not_found() {
            return CliError::NotFound {
                message: err.to_string(),
            };
        }
        match err {
            TransportError::Authentication { message }
            | TransportError::Unauthorized { message } => CliError::AuthFailed { message },
            TransportError::MissingCsrf => CliError::AuthFailed {
                message: "no CSRF token; the login did not complete".into(),
            },
            TransportError::Transport(e) if e.is_timeout() => CliError::Timeout,
            TransportError::Transport(e) => CliError::ConnectionFailed {
                url: e.url().map(ToString::to_string).unwrap_or_default(),
                source: Box::new(e),
            },
            TransportError::InvalidUrl(e) => CliError::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            TransportError::Tls(message) => CliError::TlsError { message },
            TransportError::Http { status, message } => CliError::ApiError {
                code: status.to_string(),
                message,
            },
            TransportError::Api { code, message } => CliError::ApiError {
                code: code.to_string(),
                message,
            },
            TransportError::Deserialization { message, .. } => CliError::ApiError {
                code: "decode".into(),
                message,
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(e) => e.into(),

            CoreError::Action {
                kind: ActionErrorKind::Unsupported,
                message,
            } => CliError::Unsupported { message },

            CoreError::Action {
                kind: ActionErrorKind::Invalid,
                message,
            } => CliError::Validation {
                field: "argument".into(),
                reason: message,
            },

            CoreError::Decode { endpoint, message } => CliError::ApiError {
                code: "decode".into(),
                message: format!("{endpoint}: {message}"),
            },

            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
