//! HTTP surface: axum router, access gate, DTOs, and handlers.

mod dto;
mod error;
mod gate;
mod handlers;
mod router;
mod state;

pub use dto::{
    LeaderList, LoginRequest, LoginResponse, MessageResponse, ProgressRequest, ReviseRequest,
    TaskEnvelope, TaskList, TaskRequest,
};
pub use error::{ApiError, ApiResult};
pub use gate::Gate;
pub use router::create_router;
pub use state::{AppState, Authenticator, Workflow};
