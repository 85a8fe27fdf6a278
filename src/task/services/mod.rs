//! Application services for the task review workflow.

mod requests;
mod views;
mod workflow;

pub use requests::{ProgressReport, SubmitTaskRequest};
pub use views::{HistoryView, TaskView, UserSummary};
pub use workflow::{TaskWorkflowError, TaskWorkflowResult, TaskWorkflowService};
