//! User roles.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role held by a user account. Fixed at seed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Worker who creates tasks and reports progress.
    Pelaksana,
    /// Reviewer who approves, revises, and overrides progress.
    Leader,
    /// Read-only oversight of approved work.
    Manager,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pelaksana => "pelaksana",
            Self::Leader => "leader",
            Self::Manager => "manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pelaksana" => Ok(Self::Pelaksana),
            "leader" => Ok(Self::Leader),
            "manager" => Ok(Self::Manager),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}
