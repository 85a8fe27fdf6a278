//! Then steps for task workflow scenarios.

use super::world::WorkflowWorld;
use rstest_bdd_macros::then;
use task_todo::task::services::TaskWorkflowError;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &mut WorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    eyre::ensure!(
        task.status.as_str() == status,
        "expected status {status}, got {}",
        task.status
    );
    Ok(())
}

#[then("the task progress is {progress:u8}")]
fn task_progress_is(world: &mut WorkflowWorld, progress: u8) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    eyre::ensure!(
        task.progress == progress,
        "expected progress {progress}, got {}",
        task.progress
    );
    Ok(())
}

#[then("the task has {count:usize} history entries")]
fn history_count_is(world: &mut WorkflowWorld, count: usize) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    eyre::ensure!(
        task.histories.len() == count,
        "expected {count} history entries, got {}",
        task.histories.len()
    );
    Ok(())
}

#[then(r#"the last history action is "{action}""#)]
fn last_history_action_is(world: &mut WorkflowWorld, action: String) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    let last = task
        .histories
        .last()
        .ok_or_else(|| eyre::eyre!("task has no history"))?;
    eyre::ensure!(
        last.action.as_str() == action,
        "expected last action {action}, got {}",
        last.action
    );
    Ok(())
}

#[then(r#"the last history note is "{note}""#)]
fn last_history_note_is(world: &mut WorkflowWorld, note: String) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    let last = task
        .histories
        .last()
        .ok_or_else(|| eyre::eyre!("task has no history"))?;
    eyre::ensure!(last.note == note, "expected note {note}, got {}", last.note);
    Ok(())
}

#[then(r#"the operation fails with message "{message}""#)]
fn operation_fails_with(world: &mut WorkflowWorld, message: String) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the last operation to fail"))?;
    eyre::ensure!(
        err.to_string() == message,
        "expected error {message}, got {err}"
    );
    Ok(())
}

#[then(r#"the operation is refused for role "{role}""#)]
fn operation_refused_for(world: &mut WorkflowWorld, role: String) -> Result<(), eyre::Report> {
    match world.last_error.as_ref() {
        Some(TaskWorkflowError::AccessDenied(denied)) => {
            eyre::ensure!(
                denied.actual.as_str() == role,
                "expected refusal for {role}, got {}",
                denied.actual
            );
            Ok(())
        }
        other => Err(eyre::eyre!("expected access refusal, got {other:?}")),
    }
}
