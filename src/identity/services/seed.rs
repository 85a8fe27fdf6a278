//! Default account seeding for fresh installations.

use crate::identity::{
    domain::{IdentityDomainError, Role, User, Username},
    ports::{PasswordHashError, PasswordHasher, UserRepository, UserRepositoryError},
};
use thiserror::Error;

/// Password given to every seeded account.
pub const DEFAULT_PASSWORD: &str = "password123";

const DEFAULT_ACCOUNTS: [(&str, Role); 3] = [
    ("pelaksana1", Role::Pelaksana),
    ("leader1", Role::Leader),
    ("manager1", Role::Manager),
];

/// Result of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already held users; nothing was written.
    AlreadySeeded,
    /// Default accounts were created.
    Seeded {
        /// Number of accounts written.
        created: usize,
    },
}

/// Errors raised while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// A default username failed validation.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// Hashing the default password failed.
    #[error(transparent)]
    Hash(#[from] PasswordHashError),
    /// The user store failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

/// Creates one account per role when the user store is empty.
///
/// Individual insert failures are logged and skipped so a partially seeded
/// store still starts.
///
/// # Errors
///
/// Returns [`SeedError`] when counting users or hashing the default password
/// fails.
pub async fn seed_default_users<U, H>(users: &U, hasher: &H) -> Result<SeedOutcome, SeedError>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    if users.count().await? > 0 {
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let mut created = 0;
    for (name, role) in DEFAULT_ACCOUNTS {
        let hash = hasher.hash(DEFAULT_PASSWORD).await?;
        let user = User::new(Username::new(name)?, hash, role);
        match users.store(&user).await {
            Ok(()) => created += 1,
            Err(err) => tracing::error!(username = name, error = %err, "seed user failed"),
        }
    }
    tracing::info!(created, "seed users done, default password: {DEFAULT_PASSWORD}");
    Ok(SeedOutcome::Seeded { created })
}
