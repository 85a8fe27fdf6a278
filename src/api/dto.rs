//! Request and response bodies.

use crate::identity::domain::{Role, UserId};
use crate::task::services::{ProgressReport, SubmitTaskRequest, TaskView, UserSummary};
use serde::{Deserialize, Serialize};

/// `POST /auth/login` body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// `POST /auth/login` response.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Signed bearer token.
    pub token: String,
    /// Role of the authenticated user.
    pub role: Role,
}

/// Body for task creation and resubmission.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRequest {
    /// Task title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Leader asked to review the task.
    pub assignee_id: UserId,
    /// Raw due date; unparseable values leave the deadline unset.
    #[serde(default)]
    pub due_date: String,
}

impl From<TaskRequest> for SubmitTaskRequest {
    fn from(body: TaskRequest) -> Self {
        Self::new(body.title, body.assignee_id)
            .with_description(body.description)
            .with_due_date(body.due_date)
    }
}

/// Body for progress updates and overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressRequest {
    /// Completion percentage.
    pub progress: i64,
    /// Optional history note.
    #[serde(default)]
    pub note: Option<String>,
}

impl From<ProgressRequest> for ProgressReport {
    fn from(body: ProgressRequest) -> Self {
        let progress = body.progress;
        body.note.map_or_else(
            || Self::new(progress),
            |note| Self::new(progress).with_note(note),
        )
    }
}

/// Body for revision requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviseRequest {
    /// Reason for sending the task back.
    #[serde(default)]
    pub note: String,
}

/// A confirmation message with the affected task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskEnvelope {
    /// Confirmation message.
    pub message: &'static str,
    /// Task after the operation.
    pub task: TaskView,
}

/// A confirmation message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Confirmation message.
    pub message: &'static str,
}

/// A list of tasks.
#[derive(Debug, Clone, Serialize)]
pub struct TaskList {
    /// Tasks in creation order.
    pub tasks: Vec<TaskView>,
}

/// A list of leader accounts.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderList {
    /// Leaders ordered by username.
    pub leaders: Vec<UserSummary>,
}
