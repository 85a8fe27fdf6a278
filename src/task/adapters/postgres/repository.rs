//! `PostgreSQL` repository implementation for tasks and their history.

use super::{
    models::{HistoryRow, NewHistoryRow, NewTaskRow, TaskChangeset, TaskRow},
    schema::{task_history, tasks},
};
use crate::identity::domain::UserId;
use crate::task::{
    domain::{
        HistoryAction, HistoryId, PersistedHistoryData, PersistedTaskData, Progress, Task,
        TaskHistory, TaskId, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Every write runs inside a transaction that also inserts the matching
/// `task_history` row.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }

    async fn load_tasks<F>(&self, query: F) -> TaskRepositoryResult<Vec<Task>>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<Vec<TaskRow>> + Send + 'static,
    {
        self.run_blocking(move |connection| {
            let rows = query(connection).map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, task: &Task, history: &TaskHistory) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let task_row = to_new_task_row(task);
        let history_row = to_new_history_row(history);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                diesel::insert_into(tasks::table)
                    .values(&task_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TaskRepositoryError::DuplicateTask(task_id)
                        }
                        _ => TaskRepositoryError::persistence(err),
                    })?;
                diesel::insert_into(task_history::table)
                    .values(&history_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn record_transition(
        &self,
        task: &Task,
        history: &TaskHistory,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task);
        let history_row = to_new_history_row(history);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                    .set(&changeset)
                    .execute(tx)?;
                if updated == 0 {
                    return Err(TaskRepositoryError::NotFound(task_id));
                }
                diesel::insert_into(task_history::table)
                    .values(&history_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_creator(&self, creator: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.load_tasks(move |connection| {
            tasks::table
                .filter(tasks::created_by.eq(creator.into_inner()))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
        })
        .await
    }

    async fn list_by_leader(
        &self,
        leader: UserId,
        statuses: &[TaskStatus],
    ) -> TaskRepositoryResult<Vec<Task>> {
        let labels = status_labels(statuses);
        self.load_tasks(move |connection| {
            tasks::table
                .filter(tasks::assigned_leader.eq(leader.into_inner()))
                .filter(tasks::status.eq_any(labels))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
        })
        .await
    }

    async fn list_by_status(&self, statuses: &[TaskStatus]) -> TaskRepositoryResult<Vec<Task>> {
        let labels = status_labels(statuses);
        self.load_tasks(move |connection| {
            tasks::table
                .filter(tasks::status.eq_any(labels))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
        })
        .await
    }

    async fn history_for(&self, task_ids: &[TaskId]) -> TaskRepositoryResult<Vec<TaskHistory>> {
        let lookup: Vec<uuid::Uuid> = task_ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            let rows = task_history::table
                .filter(task_history::task_id.eq_any(lookup))
                .order(task_history::sequence.asc())
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_history).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn status_labels(statuses: &[TaskStatus]) -> Vec<String> {
    statuses
        .iter()
        .map(|status| status.as_str().to_owned())
        .collect()
}

fn to_new_task_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        created_by: task.created_by().into_inner(),
        assigned_leader: task.assigned_leader().into_inner(),
        status: task.status().as_str().to_owned(),
        progress: i16::from(task.progress().value()),
        progress_by: task.progress_by().into_inner(),
        deadline: task.deadline(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        assigned_leader: task.assigned_leader().into_inner(),
        status: task.status().as_str().to_owned(),
        progress: i16::from(task.progress().value()),
        progress_by: task.progress_by().into_inner(),
        deadline: task.deadline(),
        updated_at: task.updated_at(),
    }
}

fn to_new_history_row(history: &TaskHistory) -> NewHistoryRow {
    NewHistoryRow {
        id: history.id().into_inner(),
        task_id: history.task_id().into_inner(),
        action_by: history.action_by().into_inner(),
        action: history.action().as_str().to_owned(),
        note: history.note().to_owned(),
        created_at: history.created_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let title = TaskTitle::new(row.title).map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let progress =
        Progress::new(i64::from(row.progress)).map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title,
        description: row.description,
        created_by: UserId::from_uuid(row.created_by),
        assigned_leader: UserId::from_uuid(row.assigned_leader),
        status,
        progress,
        progress_by: UserId::from_uuid(row.progress_by),
        deadline: row.deadline,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_history(row: HistoryRow) -> TaskRepositoryResult<TaskHistory> {
    let action =
        HistoryAction::try_from(row.action.as_str()).map_err(TaskRepositoryError::persistence)?;

    Ok(TaskHistory::from_persisted(PersistedHistoryData {
        id: HistoryId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        action_by: UserId::from_uuid(row.action_by),
        action,
        note: row.note,
        created_at: row.created_at,
    }))
}
