use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockline_core::DomainError;

/// Staff role. Closed set: adding a role is a compile-time-visible change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Worker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Worker => "worker",
        }
    }

    /// Whether price-bearing columns and aggregate monetary values may be
    /// rendered for this role. A UI-visibility gate, not data-access control.
    pub fn can_view_pricing(&self) -> bool {
        match self {
            Role::Owner => true,
            Role::Worker => false,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "worker" => Ok(Role::Worker),
            other => Err(DomainError::validation(format!(
                "role must be one of: owner, worker (got '{other}')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_owners_view_pricing() {
        assert!(Role::Owner.can_view_pricing());
        assert!(!Role::Worker.can_view_pricing());
    }

    #[test]
    fn role_wire_strings_round_trip() {
        assert_eq!(serde_json::to_string(&Role::Owner).unwrap(), "\"owner\"");
        assert_eq!("worker".parse::<Role>().unwrap(), Role::Worker);
        assert!("admin".parse::<Role>().is_err());
    }
}
