//! Ports for password hashing and bearer token handling.

use crate::identity::domain::Identity;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// One-way password hashing.
///
/// Implementations must keep the hashing work off the async executor
/// threads.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password for storage.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when the hashing backend fails.
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Checks a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` for a well-formed hash that does not match.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when the stored hash is malformed.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}

/// Password hashing failure.
#[derive(Debug, Clone, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(pub Arc<dyn std::error::Error + Send + Sync>);

impl PasswordHashError {
    /// Wraps a hashing backend error.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}

/// Issues and verifies signed bearer tokens carrying an [`Identity`].
pub trait TokenCodec: Send + Sync {
    /// Issues a signed token for `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Issue`] when signing fails.
    fn issue(&self, identity: &Identity) -> Result<String, TokenError>;

    /// Verifies a token's signature and expiry and returns its identity.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] for malformed, tampered, or expired
    /// tokens.
    fn verify(&self, token: &str) -> Result<Identity, TokenError>;
}

/// Errors returned by token codec implementations.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    /// The token could not be signed.
    #[error("failed to issue token: {0}")]
    Issue(Arc<dyn std::error::Error + Send + Sync>),

    /// The token is malformed, tampered with, or expired.
    #[error("invalid token: {0}")]
    Invalid(String),
}

impl TokenError {
    /// Wraps a signing error.
    pub fn issue(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Issue(Arc::new(err))
    }
}
