use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::ProfileId;

use crate::Role;

/// The profile record resolved from the user registry after the identity
/// provider accepts credentials.
///
/// Lifecycle is external: the gate only observes profiles, it never creates
/// or mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: ProfileId,
    pub username: String,
    pub role: Role,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn can_view_pricing(&self) -> bool {
        self.role.can_view_pricing()
    }
}
