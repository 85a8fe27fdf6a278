//! Task status and history action enumerations.

use super::{ParseHistoryActionError, ParseTaskStatusError, Progress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Awaiting leader review.
    #[serde(rename = "Submitted")]
    Submitted,
    /// Sent back to the worker for changes.
    #[serde(rename = "Revision")]
    Revision,
    /// Approved and ready for work.
    #[serde(rename = "Approved by Leader")]
    ApprovedByLeader,
    /// Work has started.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Progress reached 100%.
    #[serde(rename = "Completed")]
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Revision => "Revision",
            Self::ApprovedByLeader => "Approved by Leader",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Returns whether the owner may report progress from this status.
    #[must_use]
    pub const fn accepts_progress(self) -> bool {
        matches!(self, Self::ApprovedByLeader | Self::InProgress)
    }

    /// Returns the status a task moves to after recording `progress`.
    ///
    /// 100 completes the task and any other positive value marks it in
    /// progress. Zero keeps the current status, except that a completed task
    /// reopens as in progress so `Completed` always implies 100%.
    #[must_use]
    pub const fn after_progress(self, progress: Progress) -> Self {
        if progress.is_complete() {
            return Self::Completed;
        }
        if progress.value() > 0 {
            return Self::InProgress;
        }
        match self {
            Self::Completed => Self::InProgress,
            other => other,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "submitted" => Ok(Self::Submitted),
            "revision" => Ok(Self::Revision),
            "approved by leader" => Ok(Self::ApprovedByLeader),
            "in progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Kind of transition recorded in a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// Task submitted or resubmitted for review.
    Submit,
    /// Leader requested changes.
    Revision,
    /// Leader approved the task.
    Approve,
    /// Progress changed without completing.
    UpdateProgress,
    /// Progress reached 100%.
    Complete,
}

impl HistoryAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Revision => "revision",
            Self::Approve => "approve",
            Self::UpdateProgress => "update_progress",
            Self::Complete => "complete",
        }
    }

    /// Returns the action recorded for a progress change to `progress`.
    #[must_use]
    pub const fn for_progress(progress: Progress) -> Self {
        if progress.is_complete() {
            Self::Complete
        } else {
            Self::UpdateProgress
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for HistoryAction {
    type Error = ParseHistoryActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "submit" => Ok(Self::Submit),
            "revision" => Ok(Self::Revision),
            "approve" => Ok(Self::Approve),
            "update_progress" => Ok(Self::UpdateProgress),
            "complete" => Ok(Self::Complete),
            _ => Err(ParseHistoryActionError(value.to_owned())),
        }
    }
}
