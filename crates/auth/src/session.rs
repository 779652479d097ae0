//! Session state machine.
//!
//! States: `Unauthenticated`, `Resolving`, `Authenticated`.
//! Valid transitions:
//!
//! ```text
//! Unauthenticated ──login attempt / startup restore──▶ Resolving
//! Resolving ──profile resolved──▶ Authenticated
//! Resolving ──any failure──▶ Unauthenticated
//! Authenticated ──logout / external signed-out──▶ Unauthenticated
//! ```
//!
//! No other transitions exist. The transition methods are pure; sequencing
//! them against the identity provider is done in the infra layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::UserProfile;

/// Attempted transition that the machine does not define.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid session transition: {0}")]
pub struct SessionStateError(pub String);

/// Where a session currently stands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    /// Credentials accepted (or a stored token found); profile resolution in
    /// flight.
    Resolving,
    Authenticated(UserProfile),
}

impl SessionState {
    /// Login attempt or startup session check.
    pub fn begin_resolving(self) -> Result<Self, SessionStateError> {
        match self {
            SessionState::Unauthenticated => Ok(SessionState::Resolving),
            other => Err(SessionStateError(format!(
                "cannot begin resolving from {}",
                other.label()
            ))),
        }
    }

    /// Profile resolution succeeded.
    pub fn resolved(self, profile: UserProfile) -> Result<Self, SessionStateError> {
        match self {
            SessionState::Resolving => Ok(SessionState::Authenticated(profile)),
            other => Err(SessionStateError(format!(
                "cannot resolve a profile from {}",
                other.label()
            ))),
        }
    }

    /// Bad credential, provider error, or missing profile.
    pub fn failed(self) -> Result<Self, SessionStateError> {
        match self {
            SessionState::Resolving => Ok(SessionState::Unauthenticated),
            other => Err(SessionStateError(format!(
                "cannot fail resolution from {}",
                other.label()
            ))),
        }
    }

    /// Logout or an external signed-out notification.
    ///
    /// Idempotent: signing out an already-unauthenticated session is a no-op,
    /// not an error.
    pub fn signed_out(self) -> Self {
        SessionState::Unauthenticated
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Authenticated(profile) => Some(profile),
            SessionState::Unauthenticated | SessionState::Resolving => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    fn label(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "Unauthenticated",
            SessionState::Resolving => "Resolving",
            SessionState::Authenticated(_) => "Authenticated",
        }
    }
}
