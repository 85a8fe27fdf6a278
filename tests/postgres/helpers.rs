//! Shared test helpers for `PostgreSQL` integration tests.

pub use super::cluster::{BoxError, PostgresCluster, TemporaryDatabase, postgres_cluster};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use std::sync::Arc;
use task_todo::identity::{
    adapters::postgres::PostgresUserRepository,
    domain::{Identity, Role, User, Username},
    ports::UserRepository,
};
use uuid::Uuid;

/// SQL creating the users, tasks, and history tables.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-01-01-000000_create_users_tasks/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "task_todo_test_template";

/// Connection pool shared by both repositories in a test.
pub type TestPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a current-thread runtime for blocking cluster lifecycles.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built.
pub fn test_runtime() -> Result<tokio::runtime::Runtime, BoxError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Box::new(err) as BoxError)
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub async fn ensure_template(cluster: PostgresCluster) -> Result<(), BoxError> {
    tokio::task::spawn_blocking(move || {
        let connection = cluster.connection();
        cluster.ensure_template_exists(TEMPLATE_DB, |db_name| {
            apply_schema(&connection.database_url(db_name))
        })
    })
    .await
    .map_err(|err| Box::new(err) as BoxError)?
}

fn apply_schema(url: &str) -> Result<(), BoxError> {
    let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    conn.batch_execute(CREATE_SCHEMA_SQL)
        .map_err(|err| Box::new(err) as BoxError)
}

/// Clones the template into a uniquely named database and pools it.
///
/// # Errors
///
/// Returns an error if database creation or pool setup fails.
pub async fn temporary_pool(
    cluster: PostgresCluster,
    prefix: &str,
) -> Result<(TemporaryDatabase, TestPool), BoxError> {
    ensure_template(cluster).await?;
    let db = cluster
        .temporary_database_from_template(&format!("{prefix}_{}", Uuid::new_v4()), TEMPLATE_DB)
        .await?;
    let manager = ConnectionManager::<PgConnection>::new(db.url());
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok((db, pool))
}

/// Stores one account per role and returns their identities.
///
/// # Errors
///
/// Returns an error if a username is invalid or the insert fails.
pub async fn seed_accounts(
    users: &Arc<PostgresUserRepository>,
    accounts: &[(&str, Role)],
) -> Result<Vec<Identity>, BoxError> {
    let mut identities = Vec::with_capacity(accounts.len());
    for (name, role) in accounts {
        let user = User::new(Username::new(*name)?, "unused-hash", *role);
        users.store(&user).await?;
        identities.push(Identity {
            user_id: user.id(),
            username: user.username().clone(),
            role: user.role(),
        });
    }
    Ok(identities)
}
