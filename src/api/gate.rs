//! Bearer-token access gate applied per route group.

use super::{error::ApiError, state::Authenticator};
use crate::identity::domain::{AccessPolicy, Identity};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Gate configuration for one route group.
#[derive(Clone)]
pub struct Gate {
    auth: Arc<Authenticator>,
    policy: AccessPolicy,
}

impl Gate {
    /// Creates a gate admitting the roles of `policy`.
    #[must_use]
    pub const fn new(auth: Arc<Authenticator>, policy: AccessPolicy) -> Self {
        Self { auth, policy }
    }
}

/// Verifies the bearer token, checks the caller's role, and stores the
/// verified identity in request extensions.
pub async fn require_access(
    State(gate): State<Gate>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match authenticate(&gate, &request) {
        Ok(identity) => identity,
        Err(err) => return err.into_response(),
    };
    if let Err(denied) = gate.policy.authorize(identity.role) {
        tracing::warn!(
            user_id = %identity.user_id,
            role = %identity.role,
            path = %request.uri().path(),
            "access denied"
        );
        return ApiError::from(denied).into_response();
    }
    request.extensions_mut().insert(identity);
    next.run(request).await
}

fn authenticate(gate: &Gate, request: &Request) -> Result<Identity, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Authorization header required".to_owned()))?;
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_owned()))?;
    Ok(gate.auth.verify(token)?)
}
