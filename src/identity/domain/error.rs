//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The username contains whitespace.
    #[error("username '{0}' must not contain whitespace")]
    InvalidUsername(String),

    /// The user identifier is not a valid UUID.
    #[error("invalid user identifier: {0}")]
    InvalidUserId(String),
}

/// Error returned while parsing a role from persistence or token claims.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
