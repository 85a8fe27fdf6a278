//! Request payloads accepted by the workflow service.

use crate::identity::domain::UserId;

/// Fields supplied when creating a task or resubmitting it after revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTaskRequest {
    pub(super) title: String,
    pub(super) description: String,
    pub(super) assignee: UserId,
    pub(super) due_date: String,
}

impl SubmitTaskRequest {
    /// Creates a request with the required title and reviewing leader.
    #[must_use]
    pub fn new(title: impl Into<String>, assignee: UserId) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            assignee,
            due_date: String::new(),
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the raw due date string.
    ///
    /// Unparseable values are tolerated and leave the deadline unset.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = due_date.into();
        self
    }
}

/// A progress value with an optional note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub(super) progress: i64,
    pub(super) note: Option<String>,
}

impl ProgressReport {
    /// Creates a report without a note.
    #[must_use]
    pub const fn new(progress: i64) -> Self {
        Self {
            progress,
            note: None,
        }
    }

    /// Attaches a note to the history entry.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
