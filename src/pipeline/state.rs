//! Per-request state machine.
//!
//! Every request handled by the pipeline starts `Pending` and ends in exactly
//! one terminal state:
//!
//! ```text
//! Pending ──ok──────────────▶ Success
//!         ──failure, policy = fallback──▶ Fallback(kind)
//!         ──failure, policy = propagate─▶ Error(kind)
//! ```
//!
//! Terminal states never move again; there is no path back to `Pending`.

use std::fmt;

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

/// Why a request did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A provider credential is not configured.
    CredentialMissing,
    /// The caller sent something unusable.
    InvalidInput,
    /// The provider answered with a non-2xx status.
    Upstream,
    /// The provider could not be reached.
    Network,
    /// The provider's answer could not be understood.
    Parse,
}

impl FailureKind {
    pub fn label(self) -> &'static str {
        match self {
            FailureKind::CredentialMissing => "credential missing",
            FailureKind::InvalidInput => "invalid input",
            FailureKind::Upstream => "upstream error",
            FailureKind::Network => "network error",
            FailureKind::Parse => "parse error",
        }
    }
}

// ---------------------------------------------------------------------------
// RequestState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Pending,
    Success,
    Fallback(FailureKind),
    Error(FailureKind),
}

impl RequestState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestState::Pending)
    }

    /// Move to `next`.  Only `Pending` may transition; a terminal state, or a
    /// request to go back to `Pending`, leaves the state unchanged.
    pub fn advance(self, next: RequestState) -> RequestState {
        match (self, next) {
            (RequestState::Pending, next) => next,
            (current, _) => {
                log::warn!("ignoring transition {current} -> {next}");
                current
            }
        }
    }

    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            RequestState::Fallback(kind) | RequestState::Error(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestState::Pending => write!(f, "pending"),
            RequestState::Success => write!(f, "success"),
            RequestState::Fallback(kind) => write!(f, "fallback ({})", kind.label()),
            RequestState::Error(kind) => write!(f, "error ({})", kind.label()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
