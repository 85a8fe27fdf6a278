//! Read models returned to clients, with user references resolved.

use crate::identity::domain::{Role, User, UserId, Username};
use crate::task::domain::{
    HistoryAction, HistoryId, Task, TaskHistory, TaskId, TaskStatus, TaskTitle,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Public projection of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    /// User identifier.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// Account role.
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            username: user.username().clone(),
            role: user.role(),
        }
    }
}

/// One history entry with its actor resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    /// Entry identifier.
    pub id: HistoryId,
    /// Owning task.
    pub task_id: TaskId,
    /// Acting user, `None` when the account no longer resolves.
    pub action_by: Option<UserSummary>,
    /// Recorded action.
    pub action: HistoryAction,
    /// Free-text note.
    pub note: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A task with its user references and full history resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Title.
    pub title: TaskTitle,
    /// Description.
    pub description: String,
    /// Creating user.
    pub created_by: Option<UserSummary>,
    /// Reviewing leader.
    pub assigned_leader: Option<UserSummary>,
    /// Workflow status.
    pub status: TaskStatus,
    /// Completion percentage.
    pub progress: u8,
    /// Last user to change progress.
    pub progress_by: Option<UserSummary>,
    /// Deadline, if set.
    pub deadline: Option<DateTime<Utc>>,
    /// History entries in creation order.
    pub histories: Vec<HistoryView>,
}

/// Identifiers of every user referenced by `tasks` and `history`.
pub(super) fn referenced_users(tasks: &[Task], history: &[TaskHistory]) -> Vec<UserId> {
    let mut ids: Vec<UserId> = tasks
        .iter()
        .flat_map(|task| [task.created_by(), task.assigned_leader(), task.progress_by()])
        .chain(history.iter().map(TaskHistory::action_by))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Joins tasks with their history and users.
pub(super) fn assemble(
    tasks: Vec<Task>,
    history: Vec<TaskHistory>,
    users: &[User],
) -> Vec<TaskView> {
    let directory: HashMap<UserId, UserSummary> = users
        .iter()
        .map(|user| (user.id(), UserSummary::from(user)))
        .collect();
    let lookup = |id: UserId| directory.get(&id).cloned();

    let mut grouped: HashMap<TaskId, Vec<HistoryView>> = HashMap::new();
    for entry in history {
        grouped
            .entry(entry.task_id())
            .or_default()
            .push(HistoryView {
                id: entry.id(),
                task_id: entry.task_id(),
                action_by: lookup(entry.action_by()),
                action: entry.action(),
                note: entry.note().to_owned(),
                created_at: entry.created_at(),
            });
    }

    tasks
        .into_iter()
        .map(|task| TaskView {
            id: task.id(),
            title: task.title().clone(),
            description: task.description().to_owned(),
            created_by: lookup(task.created_by()),
            assigned_leader: lookup(task.assigned_leader()),
            status: task.status(),
            progress: task.progress().value(),
            progress_by: lookup(task.progress_by()),
            deadline: task.deadline(),
            histories: grouped.remove(&task.id()).unwrap_or_default(),
        })
        .collect()
}
