//! Session orchestration.
//!
//! `SessionGate` drives the pure state machine in `stockline-auth` against
//! the identity provider and the profile registry. It holds the live
//! token → session mapping; nothing else in the process keeps ambient
//! "current user" state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use stockline_auth::{AuthError, SessionState, UserProfile};
use stockline_core::SessionToken;

use crate::provider::{IdentityProvider, ProviderError};
use crate::store::{ProfileStore, StoreError};

/// An established session: the provider's durable token plus the resolved
/// profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: SessionToken,
    pub profile: UserProfile,
}

/// The Session Gate component.
pub struct SessionGate {
    provider: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    sessions: RwLock<HashMap<SessionToken, SessionState>>,
}

impl SessionGate {
    pub fn new(provider: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            provider,
            profiles,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Verify credentials with the provider, then resolve the profile row for
    /// the provider's subject.
    ///
    /// A provider-accepted subject with no profile row is a failure: the
    /// half-established provider session is revoked and no identity is
    /// retained. Deterministic causes collapse to `AuthError::Failed`; only
    /// transport faults surface as `Unavailable`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let flow = SessionState::default()
            .begin_resolving()
            .map_err(|_| AuthError::Failed)?;

        let provider_session = match self.provider.sign_in(username, password).await {
            Ok(session) => session,
            Err(ProviderError::InvalidCredentials) => {
                tracing::debug!(username, "provider rejected credentials");
                flow.failed().map_err(|_| AuthError::Failed)?;
                return Err(AuthError::Failed);
            }
            Err(ProviderError::Unavailable(detail)) => {
                return Err(AuthError::Unavailable(detail));
            }
        };

        let profile = match self.profiles.find_by_subject(provider_session.subject_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::debug!(
                    subject = %provider_session.subject_id,
                    "no profile row for provider subject; revoking session"
                );
                self.revoke_best_effort(&provider_session.token).await;
                flow.failed().map_err(|_| AuthError::Failed)?;
                return Err(AuthError::Failed);
            }
            Err(StoreError::Unavailable(detail)) => {
                self.revoke_best_effort(&provider_session.token).await;
                return Err(AuthError::Unavailable(detail));
            }
            Err(err) => {
                tracing::debug!(error = %err, "profile lookup failed");
                self.revoke_best_effort(&provider_session.token).await;
                flow.failed().map_err(|_| AuthError::Failed)?;
                return Err(AuthError::Failed);
            }
        };

        let state = flow.resolved(profile.clone()).map_err(|_| AuthError::Failed)?;
        self.sessions
            .write()
            .await
            .insert(provider_session.token, state);

        tracing::info!(username = %profile.username, role = %profile.role, "session established");
        Ok(Session {
            token: provider_session.token,
            profile,
        })
    }

    /// The live identity for a token, or none.
    pub async fn current_user(&self, token: &SessionToken) -> Option<UserProfile> {
        let sessions = self.sessions.read().await;
        sessions.get(token).and_then(SessionState::profile).cloned()
    }

    /// Revoke the provider session and clear the local identity. Idempotent:
    /// unknown tokens are a no-op.
    pub async fn logout(&self, token: &SessionToken) -> Result<(), AuthError> {
        if let Some(state) = self.sessions.write().await.remove(token) {
            // Authenticated → Unauthenticated; always valid.
            state.signed_out();
        }

        match self.provider.sign_out(token).await {
            Ok(()) => Ok(()),
            Err(ProviderError::InvalidCredentials) => Ok(()),
            Err(ProviderError::Unavailable(detail)) => Err(AuthError::Unavailable(detail)),
        }
    }

    /// Startup session check: ask the provider whether the stored token is
    /// still live and re-resolve its profile. A token whose subject lost its
    /// profile row is revoked, same as the login path.
    pub async fn restore(
        &self,
        token: &SessionToken,
    ) -> Result<Option<UserProfile>, AuthError> {
        let subject = match self.provider.restore(token).await {
            Ok(Some(subject)) => subject,
            Ok(None) => {
                // Signed out elsewhere or expired: external signed-out edge.
                self.handle_signed_out(token).await;
                return Ok(None);
            }
            Err(ProviderError::InvalidCredentials) => {
                self.handle_signed_out(token).await;
                return Ok(None);
            }
            Err(ProviderError::Unavailable(detail)) => {
                return Err(AuthError::Unavailable(detail));
            }
        };

        let flow = SessionState::default()
            .begin_resolving()
            .map_err(|_| AuthError::Failed)?;

        match self.profiles.find_by_subject(subject).await {
            Ok(Some(profile)) => {
                let state = flow.resolved(profile.clone()).map_err(|_| AuthError::Failed)?;
                self.sessions.write().await.insert(*token, state);
                Ok(Some(profile))
            }
            Ok(None) => {
                tracing::debug!(subject = %subject, "restored subject has no profile row; revoking");
                self.revoke_best_effort(token).await;
                self.sessions.write().await.remove(token);
                flow.failed().map_err(|_| AuthError::Failed)?;
                Ok(None)
            }
            Err(StoreError::Unavailable(detail)) => Err(AuthError::Unavailable(detail)),
            Err(err) => {
                tracing::debug!(error = %err, "profile lookup failed during restore");
                Ok(None)
            }
        }
    }

    /// External "signed out" notification: clear the local identity only.
    pub async fn handle_signed_out(&self, token: &SessionToken) {
        if let Some(state) = self.sessions.write().await.remove(token) {
            state.signed_out();
        }
    }

    async fn revoke_best_effort(&self, token: &SessionToken) {
        if let Err(err) = self.provider.sign_out(token).await {
            tracing::warn!(error = %err, "failed to revoke provider session");
        }
    }
}

#[cfg(test)]
mod tests {
    use stockline_auth::Role;
    use stockline_core::{ProfileId, SubjectId};

    use super::*;
    use crate::memory::{InMemoryProfileStore, StaticIdentityProvider};

    struct Fixture {
        gate: SessionGate,
        provider: Arc<StaticIdentityProvider>,
    }

    fn profile(username: &str, role: Role, name: &str) -> UserProfile {
        UserProfile {
            id: ProfileId::new(),
            username: username.to_string(),
            role,
            name: name.to_string(),
            created_at: None,
        }
    }

    /// Two provisioned users plus one credential-valid subject with no
    /// profile row ("ghost").
    fn fixture() -> Fixture {
        let owner_subject = SubjectId::new();
        let worker_subject = SubjectId::new();
        let ghost_subject = SubjectId::new();

        let provider = Arc::new(
            StaticIdentityProvider::new()
                .with_user("owner", "owner123", owner_subject)
                .with_user("worker", "worker123", worker_subject)
                .with_user("ghost", "ghost123", ghost_subject),
        );

        let profiles = Arc::new(InMemoryProfileStore::new());
        profiles.insert(owner_subject, profile("owner", Role::Owner, "Factory Owner"));
        profiles.insert(worker_subject, profile("worker", Role::Worker, "Factory Worker"));

        Fixture {
            gate: SessionGate::new(provider.clone(), profiles),
            provider,
        }
    }

    #[tokio::test]
    async fn owner_authenticates_and_sees_pricing() {
        let f = fixture();
        let session = f.gate.authenticate("owner", "owner123").await.unwrap();
        assert_eq!(session.profile.role, Role::Owner);
        assert!(session.profile.can_view_pricing());

        let current = f.gate.current_user(&session.token).await.unwrap();
        assert_eq!(current.username, "owner");
    }

    #[tokio::test]
    async fn worker_cannot_view_pricing() {
        let f = fixture();
        let session = f.gate.authenticate("worker", "worker123").await.unwrap();
        assert!(!session.profile.can_view_pricing());
    }

    #[tokio::test]
    async fn bad_credentials_collapse_to_failed() {
        let f = fixture();
        let err = f.gate.authenticate("owner", "nope").await.unwrap_err();
        assert_eq!(err, AuthError::Failed);
        let err = f.gate.authenticate("nobody", "owner123").await.unwrap_err();
        assert_eq!(err, AuthError::Failed);
    }

    #[tokio::test]
    async fn unprovisioned_subject_fails_and_is_revoked() {
        let f = fixture();
        let err = f.gate.authenticate("ghost", "ghost123").await.unwrap_err();
        assert_eq!(err, AuthError::Failed);
        // The provider session established by sign-in was revoked again: no
        // half-authenticated leftovers.
        assert_eq!(f.provider.active_session_count(), 0);
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let f = fixture();
        let session = f.gate.authenticate("owner", "owner123").await.unwrap();

        f.gate.logout(&session.token).await.unwrap();
        assert_eq!(f.gate.current_user(&session.token).await, None);

        // Second logout: still fine, still unauthenticated.
        f.gate.logout(&session.token).await.unwrap();
        assert_eq!(f.gate.current_user(&session.token).await, None);
    }

    #[tokio::test]
    async fn restore_round_trip() {
        let f = fixture();
        let session = f.gate.authenticate("owner", "owner123").await.unwrap();

        // Simulate a fresh process: the gate forgets, the provider remembers.
        f.gate.handle_signed_out(&session.token).await;
        assert_eq!(f.gate.current_user(&session.token).await, None);

        let restored = f.gate.restore(&session.token).await.unwrap().unwrap();
        assert_eq!(restored.username, "owner");
        assert!(f.gate.current_user(&session.token).await.is_some());
    }

    #[tokio::test]
    async fn restore_after_provider_sign_out_is_none() {
        let f = fixture();
        let session = f.gate.authenticate("owner", "owner123").await.unwrap();
        f.provider.sign_out(&session.token).await.unwrap();

        assert_eq!(f.gate.restore(&session.token).await.unwrap(), None);
        assert_eq!(f.gate.current_user(&session.token).await, None);
    }
}
