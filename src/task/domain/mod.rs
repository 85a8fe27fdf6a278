//! Domain model for the task review workflow.
//!
//! A [`Task`] moves through a small fixed set of [`TaskStatus`] values. Every
//! transition method on the aggregate returns the [`TaskHistory`] entry that
//! records it, so callers cannot change status or progress without producing
//! an audit row.

mod deadline;
mod error;
mod history;
mod ids;
mod progress;
mod status;
mod task;

pub use deadline::parse_due_date;
pub use error::{
    ParseHistoryActionError, ParseTaskStatusError, TaskDomainError, WorkflowOperation,
};
pub use history::{PersistedHistoryData, TaskHistory};
pub use ids::{HistoryId, TaskId};
pub use progress::Progress;
pub use status::{HistoryAction, TaskStatus};
pub use task::{PersistedTaskData, Task, TaskDraft, TaskTitle};
