//! Append-only audit entries for task transitions.

use super::{HistoryAction, HistoryId, TaskId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One recorded transition of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHistory {
    id: HistoryId,
    task_id: TaskId,
    action_by: UserId,
    action: HistoryAction,
    note: String,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryData {
    /// Persisted entry identifier.
    pub id: HistoryId,
    /// Owning task.
    pub task_id: TaskId,
    /// User who performed the transition.
    pub action_by: UserId,
    /// Recorded action.
    pub action: HistoryAction,
    /// Free-text note.
    pub note: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TaskHistory {
    pub(super) fn record(
        task_id: TaskId,
        action_by: UserId,
        action: HistoryAction,
        note: String,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: HistoryId::new(),
            task_id,
            action_by,
            action,
            note,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a history entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            action_by: data.action_by,
            action: data.action,
            note: data.note,
            created_at: data.created_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn action_by(&self) -> UserId {
        self.action_by
    }

    /// Returns the recorded action.
    #[must_use]
    pub const fn action(&self) -> HistoryAction {
        self.action
    }

    /// Returns the note, empty when none was given.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
