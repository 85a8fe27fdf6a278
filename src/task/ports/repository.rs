//! Repository port for task and history persistence.

use crate::identity::domain::UserId;
use crate::task::domain::{Task, TaskHistory, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Writes that change a task always carry the history entry describing the
/// change, and implementations commit both or neither.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task with its submission history entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn create(&self, task: &Task, history: &TaskHistory) -> TaskRepositoryResult<()>;

    /// Persists the new state of `task` and appends `history`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn record_transition(&self, task: &Task, history: &TaskHistory)
    -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks created by `creator`, oldest first.
    async fn list_by_creator(&self, creator: UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns tasks assigned to `leader` whose status is in `statuses`,
    /// oldest first.
    async fn list_by_leader(
        &self,
        leader: UserId,
        statuses: &[TaskStatus],
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns tasks whose status is in `statuses`, oldest first.
    async fn list_by_status(&self, statuses: &[TaskStatus]) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the history entries of the given tasks in creation order.
    async fn history_for(&self, task_ids: &[TaskId]) -> TaskRepositoryResult<Vec<TaskHistory>>;

    /// Deletes a task and, by cascade, its history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
