//! Application services for login, token verification, and seeding.

mod auth;
mod seed;

pub use auth::{AuthError, AuthService, LoginOutcome};
pub use seed::{DEFAULT_PASSWORD, SeedError, SeedOutcome, seed_default_users};
