//! Task workflow handlers.

use crate::api::{
    dto::{MessageResponse, ProgressRequest, ReviseRequest, TaskEnvelope, TaskList, TaskRequest},
    error::ApiResult,
    state::AppState,
};
use crate::identity::domain::Identity;
use crate::task::{domain::TaskId, services::TaskView};
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};

fn parse_task_id(raw: &str) -> ApiResult<TaskId> {
    Ok(raw.parse::<TaskId>()?)
}

const fn envelope(message: &'static str, task: TaskView) -> TaskEnvelope {
    TaskEnvelope { message, task }
}

/// Creates a task assigned to a leader.
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> ApiResult<Json<TaskEnvelope>> {
    let Json(body) = payload?;
    let task = state.workflow.create(&identity, body.into()).await?;
    Ok(Json(envelope("Task created successfully", task)))
}

/// Lists tasks created by the caller.
pub async fn list_own(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<TaskList>> {
    let tasks = state.workflow.list_for_owner(&identity).await?;
    Ok(Json(TaskList { tasks }))
}

/// Fetches one task.
pub async fn show(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskEnvelope>> {
    let task_id = parse_task_id(&id)?;
    let task = state.workflow.get(&identity, task_id).await?;
    Ok(Json(envelope("Task retrieved successfully", task)))
}

/// Resubmits a task that was sent back for revision.
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> ApiResult<Json<TaskEnvelope>> {
    let task_id = parse_task_id(&id)?;
    let Json(body) = payload?;
    let task = state
        .workflow
        .resubmit(&identity, task_id, body.into())
        .await?;
    Ok(Json(envelope("Task updated successfully", task)))
}

/// Records progress reported by the task owner.
pub async fn update_progress(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    payload: Result<Json<ProgressRequest>, JsonRejection>,
) -> ApiResult<Json<TaskEnvelope>> {
    let task_id = parse_task_id(&id)?;
    let Json(body) = payload?;
    let task = state
        .workflow
        .update_progress(&identity, task_id, body.into())
        .await?;
    Ok(Json(envelope("Task progress updated successfully", task)))
}

/// Deletes a task and its history.
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let task_id = parse_task_id(&id)?;
    state.workflow.delete(&identity, task_id).await?;
    Ok(Json(MessageResponse {
        message: "Task deleted successfully",
    }))
}

/// Lists tasks awaiting the calling leader.
pub async fn pending(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<TaskList>> {
    let tasks = state.workflow.list_pending_for_leader(&identity).await?;
    Ok(Json(TaskList { tasks }))
}

/// Sends a submitted task back for revision.
pub async fn revise(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    payload: Result<Json<ReviseRequest>, JsonRejection>,
) -> ApiResult<Json<TaskEnvelope>> {
    let task_id = parse_task_id(&id)?;
    let Json(body) = payload?;
    let task = state
        .workflow
        .revise(&identity, task_id, &body.note)
        .await?;
    Ok(Json(envelope("Task revised successfully", task)))
}

/// Approves a submitted task.
pub async fn approve(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskEnvelope>> {
    let task_id = parse_task_id(&id)?;
    let task = state.workflow.approve(&identity, task_id).await?;
    Ok(Json(envelope("Task approved successfully", task)))
}

/// Sets progress on behalf of the reviewing leader.
pub async fn override_progress(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    payload: Result<Json<ProgressRequest>, JsonRejection>,
) -> ApiResult<Json<TaskEnvelope>> {
    let task_id = parse_task_id(&id)?;
    let Json(body) = payload?;
    let task = state
        .workflow
        .override_progress(&identity, task_id, body.into())
        .await?;
    Ok(Json(envelope("Task progress overridden successfully", task)))
}

/// Lists approved, in-progress, and completed tasks.
pub async fn approved(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<TaskList>> {
    let tasks = state.workflow.list_for_manager(&identity).await?;
    Ok(Json(TaskList { tasks }))
}
