//! Domain model for users, roles, and role-gated access.

mod access;
mod error;
mod ids;
mod role;
mod user;

pub use access::{AccessDenied, AccessPolicy, Identity};
pub use error::{IdentityDomainError, ParseRoleError};
pub use ids::{UserId, Username};
pub use role::Role;
pub use user::{PersistedUserData, User};
