//! `PostgreSQL` integration tests for account storage, seeding, and login.

use chrono::Duration;
use rstest::{fixture, rstest};
use std::sync::Arc;
use task_todo::identity::{
    adapters::{
        credentials::{BcryptPasswordHasher, JwtTokenCodec},
        postgres::PostgresUserRepository,
    },
    domain::{Role, User, Username},
    ports::{UserRepository, UserRepositoryError},
    services::{AuthError, AuthService, DEFAULT_PASSWORD, SeedOutcome, seed_default_users},
};

use crate::postgres::helpers::{
    BoxError, PostgresCluster, TemporaryDatabase, postgres_cluster, temporary_pool,
};

struct UserContext {
    users: Arc<PostgresUserRepository>,
    hasher: Arc<BcryptPasswordHasher>,
    _temp_db: TemporaryDatabase,
}

#[fixture]
async fn context(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> Result<UserContext, BoxError> {
    let (db, pool) = temporary_pool(postgres_cluster?, "users").await?;
    Ok(UserContext {
        users: Arc::new(PostgresUserRepository::new(pool)),
        hasher: Arc::new(BcryptPasswordHasher::new(4)),
        _temp_db: db,
    })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_seed_creates_one_account_per_role_once(
    #[future] context: Result<UserContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;

    let first = seed_default_users(&*ctx.users, &*ctx.hasher).await?;
    let second = seed_default_users(&*ctx.users, &*ctx.hasher).await?;

    assert_eq!(first, SeedOutcome::Seeded { created: 3 });
    assert_eq!(second, SeedOutcome::AlreadySeeded);
    assert_eq!(ctx.users.count().await?, 3);
    let leaders = ctx.users.list_by_role(Role::Leader).await?;
    assert_eq!(leaders.len(), 1);
    assert_eq!(leaders[0].username().as_str(), "leader1");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_seeded_account_can_log_in(
    #[future] context: Result<UserContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    seed_default_users(&*ctx.users, &*ctx.hasher).await?;
    let auth = AuthService::new(
        ctx.users.clone(),
        ctx.hasher.clone(),
        Arc::new(JwtTokenCodec::new(b"test-secret", Duration::hours(1))),
    );

    let outcome = auth.login("manager1", DEFAULT_PASSWORD).await?;
    let identity = auth.verify(&outcome.token)?;
    let rejected = auth.login("manager1", "wrong-password").await;

    assert_eq!(outcome.role, Role::Manager);
    assert_eq!(identity.username.as_str(), "manager1");
    assert!(matches!(rejected, Err(AuthError::InvalidCredentials)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_duplicate_username_is_rejected(
    #[future] context: Result<UserContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let username = Username::new("leader1")?;
    ctx.users
        .store(&User::new(username.clone(), "hash-a", Role::Leader))
        .await?;

    let result = ctx
        .users
        .store(&User::new(username.clone(), "hash-b", Role::Manager))
        .await;

    assert!(matches!(
        result,
        Err(UserRepositoryError::DuplicateUsername(name)) if name == username
    ));
    assert_eq!(ctx.users.count().await?, 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_lookups_resolve_stored_accounts(
    #[future] context: Result<UserContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let leader = User::new(Username::new("leader2")?, "hash", Role::Leader);
    let earlier_leader = User::new(Username::new("leader1")?, "hash", Role::Leader);
    let worker = User::new(Username::new("pelaksana1")?, "hash", Role::Pelaksana);
    for user in [&leader, &earlier_leader, &worker] {
        ctx.users.store(user).await?;
    }

    let by_name = ctx
        .users
        .find_by_username(worker.username())
        .await?
        .expect("worker should be found");
    let by_id = ctx
        .users
        .find_by_id(leader.id())
        .await?
        .expect("leader should be found");
    let mut batch: Vec<_> = ctx
        .users
        .find_by_ids(&[worker.id(), leader.id()])
        .await?
        .iter()
        .map(User::id)
        .collect();
    batch.sort();
    let mut expected = vec![worker.id(), leader.id()];
    expected.sort();
    let leader_names: Vec<_> = ctx
        .users
        .list_by_role(Role::Leader)
        .await?
        .iter()
        .map(|user| user.username().as_str().to_owned())
        .collect();

    assert_eq!(by_name, worker);
    assert_eq!(by_id.role(), Role::Leader);
    assert_eq!(batch, expected);
    assert_eq!(leader_names, ["leader1", "leader2"]);
    assert!(
        ctx.users
            .find_by_username(&Username::new("nobody")?)
            .await?
            .is_none()
    );
    Ok(())
}
