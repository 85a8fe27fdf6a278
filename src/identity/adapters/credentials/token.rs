//! HS256 JSON Web Token [`TokenCodec`].

use crate::identity::{
    domain::{Identity, Role, UserId, Username},
    ports::{TokenCodec, TokenError},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims carried by issued tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    user_id: UserId,
    username: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Token codec signing HS256 JWTs with a shared secret.
#[derive(Clone)]
pub struct JwtTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for JwtTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtTokenCodec {
    /// Creates a codec from a signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        let issued_at = Utc::now();
        let claims = Claims {
            user_id: identity.user_id,
            username: identity.username.as_str().to_owned(),
            role: identity.role,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::issue)
    }

    fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|err| TokenError::Invalid(err.to_string()))?;
        let username = Username::new(data.claims.username)
            .map_err(|err| TokenError::Invalid(err.to_string()))?;
        Ok(Identity {
            user_id: data.claims.user_id,
            username,
            role: data.claims.role,
        })
    }
}
