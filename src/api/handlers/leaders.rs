//! Leader directory handler.

use crate::api::{dto::LeaderList, error::ApiResult, state::AppState};
use crate::identity::domain::Identity;
use axum::{Extension, Json, extract::State};

/// Lists leader accounts a task can be assigned to.
pub async fn list_leaders(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<LeaderList>> {
    let leaders = state.workflow.list_leaders(&identity).await?;
    Ok(Json(LeaderList { leaders }))
}
