// ── Core error types ──
//
// Transport failures from hwmesh-api pass through unchanged so callers
// can still tell "unauthorized" from "HTTP 500". Domain failures get
// their own variants.

use thiserror::Error;

/// Why a requested action was refused before reaching the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ActionErrorKind {
    /// The switch or action does not exist, or this firmware lacks it.
    Unsupported,
    /// A filter mode, filter action or MAC address argument is malformed.
    Invalid,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Transport ────────────────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] hwmesh_api::Error),

    // ── Caller errors ────────────────────────────────────────────────
    #[error("{message} ({kind})")]
    Action {
        kind: ActionErrorKind,
        message: String,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Unexpected payload from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Action {
            kind: ActionErrorKind::Unsupported,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Action {
            kind: ActionErrorKind::Invalid,
            message: message.into(),
        }
    }

    pub(crate) fn decode(endpoint: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            endpoint: endpoint.to_owned(),
            message: err.to_string(),
        }
    }

    /// Returns `true` if the router rejected the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }

    /// The action error kind, if this is an `Action` error.
    pub fn action_kind(&self) -> Option<ActionErrorKind> {
        match self {
            Self::Action { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
