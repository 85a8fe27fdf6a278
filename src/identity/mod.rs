//! User identity, roles, and access control for the task service.
//!
//! Users are seeded rather than registered, so this context only covers the
//! pieces the workflow consumes:
//!
//! - Domain types in [`domain`]: roles, users, and the [`domain::AccessPolicy`]
//!   gate evaluated before every protected operation
//! - Port contracts in [`ports`]: user storage, password hashing, tokens
//! - Adapter implementations in [`adapters`]
//! - Login, token verification, and seeding in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
