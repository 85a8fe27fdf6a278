//! Login handler.

use crate::api::{
    dto::{LoginRequest, LoginResponse},
    error::ApiResult,
    state::AppState,
};
use axum::{Json, extract::State, extract::rejection::JsonRejection};

/// Exchanges a username and password for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(body) = payload?;
    let outcome = state.auth.login(&body.username, &body.password).await?;
    Ok(Json(LoginResponse {
        token: outcome.token,
        role: outcome.role,
    }))
}
