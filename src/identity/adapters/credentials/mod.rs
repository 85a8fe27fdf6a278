//! Credential adapters: bcrypt password hashing and HS256 JWT tokens.

mod hasher;
mod token;

pub use hasher::BcryptPasswordHasher;
pub use token::JwtTokenCodec;
