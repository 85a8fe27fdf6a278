//! Diesel row models for task persistence.

use super::schema::{task_history, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_by: Uuid,
    pub assigned_leader: Uuid,
    pub status: String,
    pub progress: i16,
    pub progress_by: Uuid,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_by: Uuid,
    pub assigned_leader: Uuid,
    pub status: String,
    pub progress: i16,
    pub progress_by: Uuid,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied when a task transitions.
///
/// A `None` deadline clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    pub title: String,
    pub description: String,
    pub assigned_leader: Uuid,
    pub status: String,
    pub progress: i16,
    pub progress_by: Uuid,
    pub deadline: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Query result row for history records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    pub id: Uuid,
    pub task_id: Uuid,
    pub action_by: Uuid,
    pub action: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// Insert model for history records. `sequence` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_history)]
pub struct NewHistoryRow {
    pub id: Uuid,
    pub task_id: Uuid,
    pub action_by: Uuid,
    pub action: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}
