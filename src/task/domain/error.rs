//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use std::fmt;
use thiserror::Error;

/// Workflow operation named in state-conflict errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowOperation {
    /// Resubmission after revision.
    Update,
    /// Owner progress report.
    UpdateProgress,
    /// Leader revision request.
    Revise,
    /// Leader approval.
    Approve,
}

impl fmt::Display for WorkflowOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Update | Self::UpdateProgress => "updated",
            Self::Revise => "revised",
            Self::Approve => "approved",
        })
    }
}

/// Errors returned while constructing or transitioning tasks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The task title is longer than the storage column allows.
    #[error("title must be at most {max} characters, got {actual}")]
    TitleTooLong {
        /// Maximum accepted length in characters.
        max: usize,
        /// Length of the rejected title in characters.
        actual: usize,
    },

    /// A revision request carried no note.
    #[error("note is required when requesting a revision")]
    EmptyRevisionNote,

    /// The progress value is outside `0..=100`.
    #[error("progress must be between 0 and 100, got {0}")]
    ProgressOutOfRange(i64),

    /// The due date did not match any accepted format.
    #[error("unrecognised due date '{0}'")]
    InvalidDueDate(String),

    /// The task identifier is not a valid UUID.
    #[error("invalid task identifier: {0}")]
    InvalidTaskId(String),

    /// The operation is not allowed from the task's current status.
    #[error("Task cannot be {operation} because status is '{status}'")]
    StatusConflict {
        /// Task that rejected the operation.
        task_id: TaskId,
        /// Operation that was attempted.
        operation: WorkflowOperation,
        /// Status the task was in.
        status: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing history actions from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown history action: {0}")]
pub struct ParseHistoryActionError(pub String);
