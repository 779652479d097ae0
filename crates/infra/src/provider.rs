//! Identity-provider contract.
//!
//! Credential verification is delegated entirely to an external provider:
//! it accepts a username-derived identifier plus password, issues a durable
//! opaque session token, and supports restore-on-startup and explicit
//! sign-out. The gate only observes its verdicts.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockline_core::{SessionToken, SubjectId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider rejected the credentials. Deterministic.
    #[error("credentials rejected")]
    InvalidCredentials,

    /// The provider is unreachable or returned a server error. Recoverable.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// A provider-side session established by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSession {
    pub subject_id: SubjectId,
    pub token: SessionToken,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, username: &str, password: &str)
        -> Result<ProviderSession, ProviderError>;

    /// Revoke a session. Unknown tokens are not an error (idempotent).
    async fn sign_out(&self, token: &SessionToken) -> Result<(), ProviderError>;

    /// Resolve a stored token back to its subject, or `None` if the provider
    /// no longer recognizes it (signed out elsewhere, expired, revoked).
    async fn restore(&self, token: &SessionToken) -> Result<Option<SubjectId>, ProviderError>;
}

#[async_trait]
impl<P> IdentityProvider for Arc<P>
where
    P: IdentityProvider + ?Sized,
{
    async fn sign_in(
        &self,
        username: &str,
        password: &str,
    ) -> Result<ProviderSession, ProviderError> {
        (**self).sign_in(username, password).await
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<(), ProviderError> {
        (**self).sign_out(token).await
    }

    async fn restore(&self, token: &SessionToken) -> Result<Option<SubjectId>, ProviderError> {
        (**self).restore(token).await
    }
}
