//! Repository port for user account lookup.

use crate::identity::domain::{Role, User, UserId, Username};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateUsername`] when the username is
    /// already taken.
    async fn store(&self, user: &User) -> UserRepositoryResult<()>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by login name.
    async fn find_by_username(&self, username: &Username) -> UserRepositoryResult<Option<User>>;

    /// Returns every user whose identifier appears in `ids`.
    ///
    /// Unknown identifiers are skipped; order is unspecified.
    async fn find_by_ids(&self, ids: &[UserId]) -> UserRepositoryResult<Vec<User>>;

    /// Returns all users holding `role`, ordered by username.
    async fn list_by_role(&self, role: Role) -> UserRepositoryResult<Vec<User>>;

    /// Returns the number of stored users.
    async fn count(&self) -> UserRepositoryResult<u64>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// The username is already in use.
    #[error("duplicate username: {0}")]
    DuplicateUsername(Username),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
