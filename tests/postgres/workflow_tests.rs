//! The review workflow end to end over the `PostgreSQL` adapters.

use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;
use task_todo::identity::{
    adapters::postgres::PostgresUserRepository,
    domain::{Identity, Role},
};
use task_todo::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{HistoryAction, TaskDomainError, TaskStatus},
    services::{ProgressReport, SubmitTaskRequest, TaskWorkflowError, TaskWorkflowService},
};

use crate::postgres::helpers::{
    BoxError, PostgresCluster, TemporaryDatabase, postgres_cluster, seed_accounts, temporary_pool,
};

type PostgresWorkflow =
    TaskWorkflowService<PostgresTaskRepository, PostgresUserRepository, DefaultClock>;

struct WorkflowContext {
    service: PostgresWorkflow,
    worker: Identity,
    leader: Identity,
    manager: Identity,
    _temp_db: TemporaryDatabase,
}

#[fixture]
async fn context(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> Result<WorkflowContext, BoxError> {
    let (db, pool) = temporary_pool(postgres_cluster?, "workflow").await?;
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let accounts = seed_accounts(
        &users,
        &[
            ("pelaksana1", Role::Pelaksana),
            ("leader1", Role::Leader),
            ("manager1", Role::Manager),
        ],
    )
    .await?;
    let [worker, leader, manager] =
        <[Identity; 3]>::try_from(accounts).map_err(|_| "expected three seeded accounts")?;
    Ok(WorkflowContext {
        service: TaskWorkflowService::new(
            Arc::new(PostgresTaskRepository::new(pool)),
            users,
            Arc::new(DefaultClock),
        ),
        worker,
        leader,
        manager,
        _temp_db: db,
    })
}

impl WorkflowContext {
    fn request(&self, title: &str) -> SubmitTaskRequest {
        SubmitTaskRequest::new(title, self.leader.user_id)
            .with_description("Quarterly figures")
            .with_due_date("2026-05-01 09:00:00")
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_task_runs_from_submission_to_completion(
    #[future] context: Result<WorkflowContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let service = &ctx.service;

    let created = service.create(&ctx.worker, ctx.request("Report")).await?;
    let pending = service.list_pending_for_leader(&ctx.leader).await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, created.id);

    service.approve(&ctx.leader, created.id).await?;
    service
        .update_progress(&ctx.worker, created.id, ProgressReport::new(50))
        .await?;
    let done = service
        .update_progress(
            &ctx.worker,
            created.id,
            ProgressReport::new(100).with_note("All done"),
        )
        .await?;

    assert_eq!(done.status, TaskStatus::Completed);
    assert_eq!(done.progress, 100);
    let actions: Vec<_> = done.histories.iter().map(|entry| entry.action).collect();
    assert_eq!(
        actions,
        vec![
            HistoryAction::Submit,
            HistoryAction::Approve,
            HistoryAction::UpdateProgress,
            HistoryAction::Complete,
        ]
    );
    let last = done.histories.last().expect("history should not be empty");
    assert_eq!(last.note, "All done");
    assert_eq!(
        last.action_by.as_ref().map(|user| user.id),
        Some(ctx.worker.user_id)
    );
    assert_eq!(
        done.assigned_leader.as_ref().map(|user| user.username.as_str()),
        Some("leader1")
    );

    let overview = service.list_for_manager(&ctx.manager).await?;
    assert_eq!(overview.len(), 1);
    assert!(service.list_pending_for_leader(&ctx.leader).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_revision_resubmit_clears_deadline(
    #[future] context: Result<WorkflowContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let service = &ctx.service;
    let created = service.create(&ctx.worker, ctx.request("Draft")).await?;
    assert!(created.deadline.is_some());

    let revised = service
        .revise(&ctx.leader, created.id, "  Add the totals  ")
        .await?;
    assert_eq!(revised.status, TaskStatus::Revision);

    let resubmitted = service
        .resubmit(
            &ctx.worker,
            created.id,
            SubmitTaskRequest::new("Draft v2", ctx.leader.user_id).with_due_date(""),
        )
        .await?;
    let reloaded = service.get(&ctx.leader, created.id).await?;

    assert_eq!(resubmitted.status, TaskStatus::Submitted);
    assert_eq!(reloaded.deadline, None);
    assert_eq!(reloaded.title.as_str(), "Draft v2");
    assert_eq!(reloaded.description, "");
    let notes: Vec<_> = reloaded
        .histories
        .iter()
        .map(|entry| (entry.action, entry.note.as_str()))
        .collect();
    assert_eq!(
        notes,
        vec![
            (HistoryAction::Submit, ""),
            (HistoryAction::Revision, "Add the totals"),
            (HistoryAction::Submit, ""),
        ]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_deleted_task_is_not_found(
    #[future] context: Result<WorkflowContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let service = &ctx.service;
    let created = service.create(&ctx.worker, ctx.request("Temporary")).await?;
    service.approve(&ctx.leader, created.id).await?;

    service.delete(&ctx.worker, created.id).await?;

    assert!(matches!(
        service.get(&ctx.worker, created.id).await,
        Err(TaskWorkflowError::NotFound(id)) if id == created.id
    ));
    assert!(matches!(
        service.delete(&ctx.worker, created.id).await,
        Err(TaskWorkflowError::NotFound(_))
    ));
    assert!(service.list_for_owner(&ctx.worker).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_leader_override_reopens_completed_task(
    #[future] context: Result<WorkflowContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let service = &ctx.service;
    let created = service.create(&ctx.worker, ctx.request("Audit")).await?;
    service
        .override_progress(&ctx.leader, created.id, ProgressReport::new(100))
        .await?;

    let reopened = service
        .override_progress(&ctx.leader, created.id, ProgressReport::new(60))
        .await?;

    assert_eq!(reopened.status, TaskStatus::InProgress);
    assert_eq!(reopened.progress, 60);
    assert_eq!(
        reopened.progress_by.as_ref().map(|user| user.id),
        Some(ctx.leader.user_id)
    );
    let last = reopened.histories.last().expect("history should not be empty");
    assert_eq!(last.note, "Progress overridden to 60%");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_overlong_title_is_rejected_before_insert(
    #[future] context: Result<WorkflowContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let title = "t".repeat(256);

    let result = ctx
        .service
        .create(&ctx.worker, SubmitTaskRequest::new(title, ctx.leader.user_id))
        .await;

    assert!(matches!(
        result,
        Err(TaskWorkflowError::Domain(TaskDomainError::TitleTooLong {
            max: 255,
            actual: 256
        }))
    ));
    assert!(ctx.service.list_for_owner(&ctx.worker).await?.is_empty());
    Ok(())
}
