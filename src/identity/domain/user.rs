//! User account aggregate.

use super::{Role, UserId, Username};

/// A seeded user account.
///
/// The password hash never leaves the identity context; read models expose
/// only id, username, and role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    password_hash: String,
    role: Role,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted username.
    pub username: Username,
    /// Persisted password hash.
    pub password_hash: String,
    /// Persisted role.
    pub role: Role,
}

impl User {
    /// Creates a new user with a fresh identifier.
    #[must_use]
    pub fn new(username: Username, password_hash: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            username,
            password_hash: password_hash.into(),
            role,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            username: data.username,
            password_hash: data.password_hash,
            role: data.role,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the stored password hash.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Returns the account role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}
