//! Task aggregate root and its review workflow transitions.

use super::{
    HistoryAction, Progress, TaskDomainError, TaskHistory, TaskId, TaskStatus, WorkflowOperation,
};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty task title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Longest accepted title, in characters. Matches the `tasks.title`
    /// column width.
    pub const MAX_CHARS: usize = 255;

    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the value is blank, or
    /// [`TaskDomainError::TitleTooLong`] when it exceeds
    /// [`Self::MAX_CHARS`] characters after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let length = normalized.chars().count();
        if length > Self::MAX_CHARS {
            return Err(TaskDomainError::TitleTooLong {
                max: Self::MAX_CHARS,
                actual: length,
            });
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Editable task fields supplied on submission and resubmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Task title.
    pub title: TaskTitle,
    /// Free-text description.
    pub description: String,
    /// Leader asked to review the task.
    pub assignee: UserId,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: String,
    created_by: UserId,
    assigned_leader: UserId,
    status: TaskStatus,
    progress: Progress,
    progress_by: UserId,
    deadline: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: String,
    /// Creator of the task.
    pub created_by: UserId,
    /// Leader reviewing the task.
    pub assigned_leader: UserId,
    /// Persisted workflow status.
    pub status: TaskStatus,
    /// Persisted progress.
    pub progress: Progress,
    /// Last user to change progress.
    pub progress_by: UserId,
    /// Persisted deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest change timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a newly submitted task and its `submit` history entry.
    #[must_use]
    pub fn submit(draft: TaskDraft, creator: UserId, clock: &impl Clock) -> (Self, TaskHistory) {
        let timestamp = clock.utc();
        let task = Self {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            created_by: creator,
            assigned_leader: draft.assignee,
            status: TaskStatus::Submitted,
            progress: Progress::ZERO,
            progress_by: creator,
            deadline: draft.deadline,
            created_at: timestamp,
            updated_at: timestamp,
        };
        let history = task.record(creator, HistoryAction::Submit, String::new(), clock);
        (task, history)
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            created_by: data.created_by,
            assigned_leader: data.assigned_leader,
            status: data.status,
            progress: data.progress,
            progress_by: data.progress_by,
            deadline: data.deadline,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the creator.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the reviewing leader.
    #[must_use]
    pub const fn assigned_leader(&self) -> UserId {
        self.assigned_leader
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the current progress.
    #[must_use]
    pub const fn progress(&self) -> Progress {
        self.progress
    }

    /// Returns the last user to change progress.
    #[must_use]
    pub const fn progress_by(&self) -> UserId {
        self.progress_by
    }

    /// Returns the deadline, if set.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest change timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the editable fields of a task under revision and submits it
    /// again with progress reset.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StatusConflict`] unless the task is in
    /// [`TaskStatus::Revision`].
    pub fn resubmit(
        &mut self,
        draft: TaskDraft,
        updater: UserId,
        clock: &impl Clock,
    ) -> Result<TaskHistory, TaskDomainError> {
        self.require(TaskStatus::Revision == self.status, WorkflowOperation::Update)?;
        self.title = draft.title;
        self.description = draft.description;
        self.assigned_leader = draft.assignee;
        self.deadline = draft.deadline;
        self.status = TaskStatus::Submitted;
        self.progress = Progress::ZERO;
        self.progress_by = updater;
        self.touch(clock);
        Ok(self.record(updater, HistoryAction::Submit, String::new(), clock))
    }

    /// Sends a submitted task back to its creator with a note.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyRevisionNote`] when the note is blank,
    /// or [`TaskDomainError::StatusConflict`] unless the task is
    /// [`TaskStatus::Submitted`].
    pub fn revise(
        &mut self,
        note: &str,
        leader: UserId,
        clock: &impl Clock,
    ) -> Result<TaskHistory, TaskDomainError> {
        let trimmed = note.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyRevisionNote);
        }
        self.require(TaskStatus::Submitted == self.status, WorkflowOperation::Revise)?;
        self.status = TaskStatus::Revision;
        self.touch(clock);
        Ok(self.record(leader, HistoryAction::Revision, trimmed.to_owned(), clock))
    }

    /// Approves a submitted task. Progress is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StatusConflict`] unless the task is
    /// [`TaskStatus::Submitted`].
    pub fn approve(
        &mut self,
        leader: UserId,
        clock: &impl Clock,
    ) -> Result<TaskHistory, TaskDomainError> {
        self.require(TaskStatus::Submitted == self.status, WorkflowOperation::Approve)?;
        self.status = TaskStatus::ApprovedByLeader;
        self.touch(clock);
        Ok(self.record(leader, HistoryAction::Approve, String::new(), clock))
    }

    /// Records progress reported by the task owner.
    ///
    /// A blank note is replaced with `Progress updated to N%`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StatusConflict`] unless the task is
    /// approved or already in progress.
    pub fn report_progress(
        &mut self,
        progress: Progress,
        note: Option<&str>,
        actor: UserId,
        clock: &impl Clock,
    ) -> Result<TaskHistory, TaskDomainError> {
        self.require(self.status.accepts_progress(), WorkflowOperation::UpdateProgress)?;
        let entry_note = note_or(note, || format!("Progress updated to {progress}"));
        Ok(self.apply_progress(progress, entry_note, actor, clock))
    }

    /// Sets progress on behalf of a leader regardless of status.
    ///
    /// A blank note is replaced with `Progress overridden to N%`.
    pub fn override_progress(
        &mut self,
        progress: Progress,
        note: Option<&str>,
        leader: UserId,
        clock: &impl Clock,
    ) -> TaskHistory {
        let entry_note = note_or(note, || format!("Progress overridden to {progress}"));
        self.apply_progress(progress, entry_note, leader, clock)
    }

    fn apply_progress(
        &mut self,
        progress: Progress,
        note: String,
        actor: UserId,
        clock: &impl Clock,
    ) -> TaskHistory {
        self.status = self.status.after_progress(progress);
        self.progress = progress;
        self.progress_by = actor;
        self.touch(clock);
        self.record(actor, HistoryAction::for_progress(progress), note, clock)
    }

    const fn require(
        &self,
        allowed: bool,
        operation: WorkflowOperation,
    ) -> Result<(), TaskDomainError> {
        if allowed {
            return Ok(());
        }
        Err(TaskDomainError::StatusConflict {
            task_id: self.id,
            operation,
            status: self.status,
        })
    }

    fn record(
        &self,
        actor: UserId,
        action: HistoryAction,
        note: String,
        clock: &impl Clock,
    ) -> TaskHistory {
        TaskHistory::record(self.id, actor, action, note, clock)
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Returns the trimmed note, or `fallback()` when it is missing or blank.
fn note_or(note: Option<&str>, fallback: impl FnOnce() -> String) -> String {
    match note.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_owned(),
        _ => fallback(),
    }
}
