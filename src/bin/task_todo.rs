//! Task review workflow service executable.

use task_todo::{
    config::Settings,
    server::{self, ServerError},
};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let settings = Settings::load()?;
    server::init_tracing(&settings)?;
    server::run(settings).await
}
