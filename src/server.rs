//! Service bootstrap: logging, storage, schema, seed data, and serving.

use crate::api::{AppState, create_router};
use crate::config::{ConfigError, Settings, StorageKind};
use crate::identity::{
    adapters::{
        credentials::{BcryptPasswordHasher, JwtTokenCodec},
        memory::InMemoryUserRepository,
        postgres::PostgresUserRepository,
    },
    ports::{PasswordHasher, TokenCodec, UserRepository},
    services::{SeedError, SeedOutcome, seed_default_users},
};
use crate::task::{
    adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository},
    ports::TaskRepository,
};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Schema applied at startup. Every statement is idempotent.
const SCHEMA_SQL: &str = include_str!("../migrations/2026-01-01-000000_create_users_tasks/up.sql");

type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Startup and serving failures.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Settings failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The global subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),
    /// The database pool could not be created.
    #[error("failed to connect to database: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// Applying the schema failed.
    #[error("failed to apply schema: {0}")]
    Schema(#[from] diesel::result::Error),
    /// Seeding default accounts failed.
    #[error("failed to seed users: {0}")]
    Seed(#[from] SeedError),
    /// A blocking startup task panicked or was cancelled.
    #[error("startup task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    /// Binding or serving failed.
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured log level.
///
/// # Errors
///
/// Returns [`ServerError::Tracing`] when a subscriber is already installed.
pub fn init_tracing(settings: &Settings) -> Result<(), ServerError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    if settings.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?;
    }
    Ok(())
}

/// Builds adapters for the configured storage, prepares the schema, seeds
/// default accounts, and wires the application state.
///
/// # Errors
///
/// Returns [`ServerError`] when the database is unreachable, the schema
/// cannot be applied, or seeding fails.
pub async fn build_state(settings: &Settings) -> Result<AppState, ServerError> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::new(settings.bcrypt_cost));
    let tokens: Arc<dyn TokenCodec> = Arc::new(JwtTokenCodec::new(
        settings.jwt_secret.as_bytes(),
        settings.token_ttl(),
    ));

    let (users, tasks): (Arc<dyn UserRepository>, Arc<dyn TaskRepository>) =
        match settings.storage {
            StorageKind::Memory => {
                tracing::warn!("using in-memory storage; data is lost on exit");
                (
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::new(InMemoryTaskRepository::new()),
                )
            }
            StorageKind::Postgres => {
                let pool = connect(settings).await?;
                (
                    Arc::new(PostgresUserRepository::new(pool.clone())),
                    Arc::new(PostgresTaskRepository::new(pool)),
                )
            }
        };

    match seed_default_users(&*users, &*hasher).await? {
        SeedOutcome::AlreadySeeded => tracing::info!("users already present; skipping seed"),
        SeedOutcome::Seeded { created } => tracing::info!(created, "seeded default users"),
    }

    Ok(AppState::new(users, tasks, hasher, tokens))
}

async fn connect(settings: &Settings) -> Result<PgPool, ServerError> {
    let url = settings.database_url();
    let max_size = settings.db_pool_size;
    tokio::task::spawn_blocking(move || -> Result<PgPool, ServerError> {
        let pool = Pool::builder()
            .max_size(max_size)
            .build(ConnectionManager::<PgConnection>::new(url))?;
        let mut connection = pool.get()?;
        connection.batch_execute(SCHEMA_SQL)?;
        tracing::info!(max_size, "database ready");
        Ok(pool)
    })
    .await?
}

/// Runs the HTTP server until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns [`ServerError`] when startup fails or the listener errors.
pub async fn run(settings: Settings) -> Result<(), ServerError> {
    let addr = settings.listen_addr()?;
    let state = build_state(&settings).await?;
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, storage = ?settings.storage, "task service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("task service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
