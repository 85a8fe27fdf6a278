//! Application state shared by handlers.

use crate::identity::{
    ports::{PasswordHasher, TokenCodec, UserRepository},
    services::AuthService,
};
use crate::task::{ports::TaskRepository, services::TaskWorkflowService};
use mockable::DefaultClock;
use std::sync::Arc;

/// Login and token verification over injected adapters.
pub type Authenticator = AuthService<dyn UserRepository, dyn PasswordHasher, dyn TokenCodec>;

/// Task workflow over injected repositories.
pub type Workflow = TaskWorkflowService<dyn TaskRepository, dyn UserRepository, DefaultClock>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service.
    pub auth: Arc<Authenticator>,
    /// Task workflow service.
    pub workflow: Arc<Workflow>,
}

impl AppState {
    /// Wires services over the given adapters.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(Arc::clone(&users), hasher, tokens)),
            workflow: Arc::new(TaskWorkflowService::new(
                tasks,
                users,
                Arc::new(DefaultClock),
            )),
        }
    }
}
