use stockline_auth::UserProfile;
use stockline_core::SessionToken;

/// Session context for a request: the resolved identity, explicitly threaded
/// into handlers via a request extension (never a process-wide ambient user).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    token: SessionToken,
    profile: UserProfile,
}

impl SessionContext {
    pub fn new(token: SessionToken, profile: UserProfile) -> Self {
        Self { token, profile }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn can_view_pricing(&self) -> bool {
        self.profile.can_view_pricing()
    }
}
