//! Task review workflow orchestration.

use super::{
    requests::{ProgressReport, SubmitTaskRequest},
    views::{TaskView, UserSummary, assemble, referenced_users},
};
use crate::identity::{
    domain::{AccessDenied, AccessPolicy, Identity, Role, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use crate::task::{
    domain::{
        Progress, Task, TaskDomainError, TaskDraft, TaskHistory, TaskId, TaskStatus, TaskTitle,
        parse_due_date,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

const PENDING_FOR_LEADER: [TaskStatus; 2] = [TaskStatus::Submitted, TaskStatus::InProgress];
const VISIBLE_TO_MANAGER: [TaskStatus; 3] = [
    TaskStatus::ApprovedByLeader,
    TaskStatus::InProgress,
    TaskStatus::Completed,
];

/// Service-level errors for the task workflow.
#[derive(Debug, Error)]
pub enum TaskWorkflowError {
    /// The caller's role is not permitted for the operation.
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    /// Domain validation or a status precondition failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The assignee does not exist or is not a leader.
    #[error("Assigned user must be an existing leader")]
    InvalidAssignee(UserId),
    /// No task has the given identifier.
    #[error("Task not found")]
    NotFound(TaskId),
    /// Task persistence failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
    /// User lookup failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
}

impl From<TaskRepositoryError> for TaskWorkflowError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for workflow operations.
pub type TaskWorkflowResult<T> = Result<T, TaskWorkflowError>;

/// Runs role-gated task transitions and returns resolved views.
///
/// Every mutation reads the current task, applies the domain transition, and
/// hands the task and its new history entry to the repository in one call.
pub struct TaskWorkflowService<R, U, C>
where
    R: TaskRepository + ?Sized,
    U: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<R, U, C> TaskWorkflowService<R, U, C>
where
    R: TaskRepository + ?Sized,
    U: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new workflow service.
    #[must_use]
    pub const fn new(tasks: Arc<R>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            users,
            clock,
        }
    }

    /// Creates a task in [`TaskStatus::Submitted`] owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Domain`] for a blank title,
    /// [`TaskWorkflowError::InvalidAssignee`] when the assignee is not a
    /// leader, or a persistence error.
    pub async fn create(
        &self,
        actor: &Identity,
        request: SubmitTaskRequest,
    ) -> TaskWorkflowResult<TaskView> {
        AccessPolicy::PelaksanaOnly.authorize(actor.role)?;
        let draft = self.draft(request).await?;
        let (task, history) = Task::submit(draft, actor.user_id, &*self.clock);
        self.tasks.create(&task, &history).await?;
        log_transition(actor, &task, &history);
        self.view(task).await
    }

    /// Lists the tasks created by `actor`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when loading fails.
    pub async fn list_for_owner(&self, actor: &Identity) -> TaskWorkflowResult<Vec<TaskView>> {
        AccessPolicy::PelaksanaOnly.authorize(actor.role)?;
        let tasks = self.tasks.list_by_creator(actor.user_id).await?;
        self.resolve(tasks).await
    }

    /// Fetches a single task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotFound`] for an unknown identifier.
    pub async fn get(&self, actor: &Identity, id: TaskId) -> TaskWorkflowResult<TaskView> {
        AccessPolicy::PelaksanaOrLeader.authorize(actor.role)?;
        let task = self.load(id).await?;
        self.view(task).await
    }

    /// Replaces the fields of a task under revision and submits it again.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotFound`], a validation error as for
    /// [`Self::create`], or a status conflict unless the task is in
    /// [`TaskStatus::Revision`].
    pub async fn resubmit(
        &self,
        actor: &Identity,
        id: TaskId,
        request: SubmitTaskRequest,
    ) -> TaskWorkflowResult<TaskView> {
        AccessPolicy::PelaksanaOnly.authorize(actor.role)?;
        let draft = self.draft(request).await?;
        let mut task = self.load(id).await?;
        let history = task.resubmit(draft, actor.user_id, &*self.clock)?;
        self.commit(actor, task, history).await
    }

    /// Records progress reported by the task owner.
    ///
    /// # Errors
    ///
    /// Returns a validation error for progress outside 0-100,
    /// [`TaskWorkflowError::NotFound`], or a status conflict unless the task
    /// is approved or in progress.
    pub async fn update_progress(
        &self,
        actor: &Identity,
        id: TaskId,
        report: ProgressReport,
    ) -> TaskWorkflowResult<TaskView> {
        AccessPolicy::PelaksanaOnly.authorize(actor.role)?;
        let progress = Progress::new(report.progress)?;
        let mut task = self.load(id).await?;
        let history =
            task.report_progress(progress, report.note.as_deref(), actor.user_id, &*self.clock)?;
        self.commit(actor, task, history).await
    }

    /// Sends a submitted task back for revision.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank note,
    /// [`TaskWorkflowError::NotFound`], or a status conflict unless the task
    /// is submitted.
    pub async fn revise(
        &self,
        actor: &Identity,
        id: TaskId,
        note: &str,
    ) -> TaskWorkflowResult<TaskView> {
        AccessPolicy::LeaderOnly.authorize(actor.role)?;
        if note.trim().is_empty() {
            return Err(TaskDomainError::EmptyRevisionNote.into());
        }
        let mut task = self.load(id).await?;
        let history = task.revise(note, actor.user_id, &*self.clock)?;
        self.commit(actor, task, history).await
    }

    /// Approves a submitted task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotFound`] or a status conflict unless
    /// the task is submitted.
    pub async fn approve(&self, actor: &Identity, id: TaskId) -> TaskWorkflowResult<TaskView> {
        AccessPolicy::LeaderOnly.authorize(actor.role)?;
        let mut task = self.load(id).await?;
        let history = task.approve(actor.user_id, &*self.clock)?;
        self.commit(actor, task, history).await
    }

    /// Sets progress on behalf of a leader regardless of status.
    ///
    /// # Errors
    ///
    /// Returns a validation error for progress outside 0-100 or
    /// [`TaskWorkflowError::NotFound`].
    pub async fn override_progress(
        &self,
        actor: &Identity,
        id: TaskId,
        report: ProgressReport,
    ) -> TaskWorkflowResult<TaskView> {
        AccessPolicy::LeaderOnly.authorize(actor.role)?;
        let progress = Progress::new(report.progress)?;
        let mut task = self.load(id).await?;
        let history =
            task.override_progress(progress, report.note.as_deref(), actor.user_id, &*self.clock);
        self.commit(actor, task, history).await
    }

    /// Lists tasks assigned to `actor` that are submitted or in progress.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when loading fails.
    pub async fn list_pending_for_leader(
        &self,
        actor: &Identity,
    ) -> TaskWorkflowResult<Vec<TaskView>> {
        AccessPolicy::LeaderOnly.authorize(actor.role)?;
        let tasks = self
            .tasks
            .list_by_leader(actor.user_id, &PENDING_FOR_LEADER)
            .await?;
        self.resolve(tasks).await
    }

    /// Lists approved, in-progress, and completed tasks for oversight.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when loading fails.
    pub async fn list_for_manager(&self, actor: &Identity) -> TaskWorkflowResult<Vec<TaskView>> {
        AccessPolicy::ManagerOnly.authorize(actor.role)?;
        let tasks = self.tasks.list_by_status(&VISIBLE_TO_MANAGER).await?;
        self.resolve(tasks).await
    }

    /// Deletes a task and its history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotFound`] for an unknown identifier.
    pub async fn delete(&self, actor: &Identity, id: TaskId) -> TaskWorkflowResult<()> {
        AccessPolicy::PelaksanaOnly.authorize(actor.role)?;
        self.tasks.delete(id).await?;
        tracing::info!(task_id = %id, actor = %actor.user_id, "task deleted");
        Ok(())
    }

    /// Lists every leader account, ordered by username.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when loading fails.
    pub async fn list_leaders(&self, actor: &Identity) -> TaskWorkflowResult<Vec<UserSummary>> {
        AccessPolicy::PelaksanaOnly.authorize(actor.role)?;
        let leaders = self.users.list_by_role(Role::Leader).await?;
        Ok(leaders.iter().map(UserSummary::from).collect())
    }

    async fn draft(&self, request: SubmitTaskRequest) -> TaskWorkflowResult<TaskDraft> {
        let SubmitTaskRequest {
            title,
            description,
            assignee,
            due_date,
        } = request;
        let validated_title = TaskTitle::new(title)?;
        self.require_leader(assignee).await?;
        let deadline = parse_due_date(&due_date).unwrap_or_else(|err| {
            tracing::warn!(due_date = %due_date, error = %err, "ignoring unparseable due date");
            None
        });
        Ok(TaskDraft {
            title: validated_title,
            description,
            assignee,
            deadline,
        })
    }

    async fn require_leader(&self, assignee: UserId) -> TaskWorkflowResult<()> {
        match self.users.find_by_id(assignee).await? {
            Some(user) if user.role() == Role::Leader => Ok(()),
            _ => Err(TaskWorkflowError::InvalidAssignee(assignee)),
        }
    }

    async fn load(&self, id: TaskId) -> TaskWorkflowResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskWorkflowError::NotFound(id))
    }

    async fn commit(
        &self,
        actor: &Identity,
        task: Task,
        history: TaskHistory,
    ) -> TaskWorkflowResult<TaskView> {
        self.tasks.record_transition(&task, &history).await?;
        log_transition(actor, &task, &history);
        self.view(task).await
    }

    async fn view(&self, task: Task) -> TaskWorkflowResult<TaskView> {
        let id = task.id();
        self.resolve(vec![task])
            .await?
            .pop()
            .ok_or(TaskWorkflowError::NotFound(id))
    }

    async fn resolve(&self, tasks: Vec<Task>) -> TaskWorkflowResult<Vec<TaskView>> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<TaskId> = tasks.iter().map(Task::id).collect();
        let history = self.tasks.history_for(&ids).await?;
        let users = self
            .users
            .find_by_ids(&referenced_users(&tasks, &history))
            .await?;
        Ok(assemble(tasks, history, &users))
    }
}

fn log_transition(actor: &Identity, task: &Task, history: &TaskHistory) {
    tracing::info!(
        task_id = %task.id(),
        actor = %actor.user_id,
        action = %history.action(),
        status = %task.status(),
        progress = task.progress().value(),
        "task transition recorded"
    );
}
