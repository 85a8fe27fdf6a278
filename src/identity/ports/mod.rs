//! Port contracts for the identity context.
//!
//! Ports define infrastructure-agnostic interfaces used by identity and task
//! services.

pub mod credentials;
pub mod repository;

pub use credentials::{PasswordHashError, PasswordHasher, TokenCodec, TokenError};
pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
