//! Role-gated access policies.
//!
//! Every protected operation declares one [`AccessPolicy`]. The gate compares
//! the caller's [`Role`] against the policy's allow-list before the operation
//! runs, and reports both sides when it refuses.

use super::{Role, UserId, Username};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allow-list of roles permitted to invoke an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessPolicy {
    /// Only workers.
    PelaksanaOnly,
    /// Only leaders.
    LeaderOnly,
    /// Only managers.
    ManagerOnly,
    /// Leaders and managers.
    LeaderOrManager,
    /// Workers and leaders.
    PelaksanaOrLeader,
}

impl AccessPolicy {
    /// Returns the roles this policy admits, in declaration order.
    #[must_use]
    pub const fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::PelaksanaOnly => &[Role::Pelaksana],
            Self::LeaderOnly => &[Role::Leader],
            Self::ManagerOnly => &[Role::Manager],
            Self::LeaderOrManager => &[Role::Leader, Role::Manager],
            Self::PelaksanaOrLeader => &[Role::Pelaksana, Role::Leader],
        }
    }

    /// Returns whether `role` is admitted by this policy.
    #[must_use]
    pub fn permits(self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }

    /// Checks `role` against this policy.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] naming the required roles and the caller's
    /// role when the role is not admitted.
    pub fn authorize(self, role: Role) -> Result<(), AccessDenied> {
        if self.permits(role) {
            return Ok(());
        }
        Err(AccessDenied {
            required: self.allowed_roles().to_vec(),
            actual: role,
        })
    }
}

/// Permission failure raised by the access gate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("role '{actual}' is not permitted; requires one of {required:?}")]
pub struct AccessDenied {
    /// Roles the operation admits.
    pub required: Vec<Role>,
    /// Role presented by the caller.
    pub actual: Role,
}

/// Caller identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Authenticated user identifier.
    pub user_id: UserId,
    /// Authenticated username.
    pub username: Username,
    /// Role carried by the token.
    pub role: Role,
}
