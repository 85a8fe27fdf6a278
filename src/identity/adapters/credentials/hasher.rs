//! Bcrypt-backed [`PasswordHasher`].

use crate::identity::ports::{PasswordHashError, PasswordHasher};
use async_trait::async_trait;

/// Password hasher using bcrypt with a configurable work factor.
///
/// Each call runs on the blocking thread pool.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Creates a hasher with the given bcrypt cost.
    #[must_use]
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }

    async fn run_blocking<F, T>(f: F) -> Result<T, PasswordHashError>
    where
        F: FnOnce() -> bcrypt::BcryptResult<T> + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(f)
            .await
            .map_err(PasswordHashError::new)?
            .map_err(PasswordHashError::new)
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let cost = self.cost;
        let plaintext = password.to_owned();
        Self::run_blocking(move || bcrypt::hash(plaintext, cost)).await
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let plaintext = password.to_owned();
        let stored = hash.to_owned();
        Self::run_blocking(move || bcrypt::verify(plaintext, &stored)).await
    }
}
