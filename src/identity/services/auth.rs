//! Login and bearer token verification.

use crate::identity::{
    domain::{Identity, Role, Username},
    ports::{
        PasswordHashError, PasswordHasher, TokenCodec, TokenError, UserRepository,
        UserRepositoryError,
    },
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Both cases share one message.
    #[error("Invalid username or password")]
    InvalidCredentials,
    /// The presented bearer token was rejected.
    #[error("{0}")]
    InvalidToken(TokenError),
    /// Token signing failed.
    #[error("failed to generate token: {0}")]
    TokenIssue(TokenError),
    /// Password hashing backend failed.
    #[error(transparent)]
    Hash(#[from] PasswordHashError),
    /// User lookup failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Signed bearer token.
    pub token: String,
    /// Role of the authenticated user.
    pub role: Role,
}

/// Authenticates users and verifies their tokens.
pub struct AuthService<U, H, T>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
    T: TokenCodec + ?Sized,
{
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> AuthService<U, H, T>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
    T: TokenCodec + ?Sized,
{
    /// Creates a new authentication service.
    #[must_use]
    pub const fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Checks a username/password pair and issues a token on success.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for unknown users and wrong
    /// passwords, or an infrastructure error when lookup, hashing, or signing
    /// fails.
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<LoginOutcome> {
        let Ok(name) = Username::new(username) else {
            return Err(AuthError::InvalidCredentials);
        };
        let Some(user) = self.users.find_by_username(&name).await? else {
            tracing::warn!(username = %name, "login rejected: unknown user");
            return Err(AuthError::InvalidCredentials);
        };
        if !self.hasher.verify(password, user.password_hash()).await? {
            tracing::warn!(username = %name, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let identity = Identity {
            user_id: user.id(),
            username: user.username().clone(),
            role: user.role(),
        };
        let token = self
            .tokens
            .issue(&identity)
            .map_err(AuthError::TokenIssue)?;
        tracing::info!(user_id = %identity.user_id, role = %identity.role, "login succeeded");
        Ok(LoginOutcome {
            token,
            role: identity.role,
        })
    }

    /// Verifies a bearer token and returns the caller identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] when the token is malformed,
    /// tampered with, or expired.
    pub fn verify(&self, token: &str) -> AuthResult<Identity> {
        self.tokens.verify(token).map_err(AuthError::InvalidToken)
    }
}
