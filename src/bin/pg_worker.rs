//! Runs embedded `PostgreSQL` lifecycle steps for the integration test harness.
//!
//! ```text
//! pg_worker <setup|start|stop> <payload.json>
//! ```
//!
//! The payload is a serialized `WorkerPayload` holding cluster settings and
//! environment overrides. When started as root the worker switches to the
//! `nobody` account before touching the cluster.

/// Boxed error type for the process result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(unix)]
mod unix {
    use super::BoxError;
    use camino::{Utf8Path, Utf8PathBuf};
    use nix::unistd::{Uid, User, initgroups, setgid, setuid};
    use pg_embedded_setup_unpriv::ambient_dir_and_path;
    use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
    use postgresql_embedded::{PostgreSQL, Status};
    use std::env;
    use std::ffi::CString;
    use std::io::Read;
    use std::str::FromStr;
    use thiserror::Error;

    const UNPRIVILEGED_USER: &str = "nobody";

    /// Failures raised by the worker.
    #[derive(Debug, Error)]
    pub enum WorkerError {
        #[error("usage: pg_worker <setup|start|stop> <payload.json>: {0}")]
        Usage(String),
        #[error("failed to read payload: {0}")]
        PayloadRead(#[source] BoxError),
        #[error("failed to parse payload: {0}")]
        PayloadParse(#[source] serde_json::Error),
        #[error("invalid cluster settings: {0}")]
        Settings(String),
        #[error("failed to build runtime: {0}")]
        Runtime(#[source] std::io::Error),
        #[error("failed to switch to the unprivileged account: {0}")]
        Privileges(String),
        #[error("cluster {operation} failed: {message}")]
        Cluster {
            operation: Operation,
            message: String,
        },
    }

    /// Lifecycle step requested by the harness.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Operation {
        Setup,
        Start,
        Stop,
    }

    impl FromStr for Operation {
        type Err = WorkerError;

        fn from_str(value: &str) -> Result<Self, Self::Err> {
            match value {
                "setup" => Ok(Self::Setup),
                "start" => Ok(Self::Start),
                "stop" => Ok(Self::Stop),
                other => Err(WorkerError::Usage(format!("unknown operation '{other}'"))),
            }
        }
    }

    impl std::fmt::Display for Operation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(match self {
                Self::Setup => "setup",
                Self::Start => "start",
                Self::Stop => "stop",
            })
        }
    }

    /// Splits the command line into an operation and payload path.
    pub fn parse_args(
        mut args: impl Iterator<Item = String>,
    ) -> Result<(Operation, Utf8PathBuf), WorkerError> {
        let _program = args.next();
        let operation = args
            .next()
            .ok_or_else(|| WorkerError::Usage("missing operation".to_owned()))?
            .parse()?;
        let payload = args
            .next()
            .map(Utf8PathBuf::from)
            .ok_or_else(|| WorkerError::Usage("missing payload path".to_owned()))?;
        if let Some(extra) = args.next() {
            return Err(WorkerError::Usage(format!("unexpected argument '{extra}'")));
        }
        Ok((operation, payload))
    }

    pub fn run(args: impl Iterator<Item = String>) -> Result<(), WorkerError> {
        let (operation, payload_path) = parse_args(args)?;
        let payload = load_payload(&payload_path)?;
        drop_root_privileges()?;
        let settings = payload
            .settings
            .into_settings()
            .map_err(|err| WorkerError::Settings(err.to_string()))?;
        apply_environment(&payload.environment);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(WorkerError::Runtime)?;
        let mut postgres = PostgreSQL::new(settings);
        runtime
            .block_on(execute(&mut postgres, operation))
            .map_err(|err| WorkerError::Cluster {
                operation,
                message: err.to_string(),
            })?;

        if operation != Operation::Stop {
            // The server process must outlive this worker.
            std::mem::forget(postgres);
        }
        Ok(())
    }

    async fn execute(
        postgres: &mut PostgreSQL,
        operation: Operation,
    ) -> Result<(), postgresql_embedded::Error> {
        match operation {
            Operation::Setup => {
                postgres.setup().await?;
                ensure_started(postgres).await
            }
            Operation::Start => ensure_started(postgres).await,
            Operation::Stop => postgres.stop().await,
        }
    }

    async fn ensure_started(postgres: &mut PostgreSQL) -> Result<(), postgresql_embedded::Error> {
        if matches!(postgres.status(), Status::Started) {
            return Ok(());
        }
        postgres.start().await
    }

    fn load_payload(path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
        let bytes = read_file(path).map_err(WorkerError::PayloadRead)?;
        serde_json::from_slice(&bytes).map_err(WorkerError::PayloadParse)
    }

    fn read_file(path: &Utf8Path) -> Result<Vec<u8>, BoxError> {
        let (dir, relative) = ambient_dir_and_path(path)?;
        let mut file = dir.open(relative.as_std_path())?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn drop_root_privileges() -> Result<(), WorkerError> {
        if !Uid::effective().is_root() {
            return Ok(());
        }
        let privileges = |err: nix::Error| WorkerError::Privileges(err.to_string());
        let user = User::from_name(UNPRIVILEGED_USER)
            .map_err(privileges)?
            .ok_or_else(|| WorkerError::Privileges("account not found".to_owned()))?;
        let name = CString::new(user.name.clone())
            .map_err(|err| WorkerError::Privileges(err.to_string()))?;
        initgroups(&name, user.gid).map_err(privileges)?;
        setgid(user.gid).map_err(privileges)?;
        setuid(user.uid).map_err(privileges)?;

        // SAFETY: the worker is single-threaded at this point.
        unsafe {
            env::set_var("HOME", &user.dir);
            env::set_var("USER", &user.name);
            env::set_var("LOGNAME", &user.name);
        }
        Ok(())
    }

    fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
        for (key, value) in environment {
            // SAFETY: the worker is single-threaded until the runtime starts.
            unsafe {
                match value {
                    Some(secret) => env::set_var(key, secret.expose()),
                    None => env::remove_var(key),
                }
            }
        }
    }

}

#[cfg(unix)]
fn main() -> Result<(), BoxError> {
    unix::run(std::env::args()).map_err(Into::into)
}

#[cfg(not(unix))]
fn main() -> Result<(), BoxError> {
    Err("pg_worker requires a Unix platform".into())
}
