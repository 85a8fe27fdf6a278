//! `PostgreSQL` integration tests for task persistence.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;
use task_todo::identity::{
    adapters::postgres::PostgresUserRepository,
    domain::{Identity, Role, UserId},
};
use task_todo::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{HistoryAction, Progress, Task, TaskDraft, TaskHistory, TaskStatus, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
};

use crate::postgres::helpers::{
    BoxError, PostgresCluster, TemporaryDatabase, postgres_cluster, seed_accounts, temporary_pool,
};

struct RepositoryContext {
    tasks: PostgresTaskRepository,
    worker: Identity,
    leader: Identity,
    other_leader: Identity,
    _temp_db: TemporaryDatabase,
}

impl RepositoryContext {
    fn draft(&self, title: &str, leader: UserId) -> TaskDraft {
        TaskDraft {
            title: TaskTitle::new(title).expect("title should be valid"),
            description: format!("{title} details"),
            assignee: leader,
            deadline: Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).single(),
        }
    }

    async fn submitted(&self, title: &str, leader: UserId) -> Result<Task, BoxError> {
        let (task, history) =
            Task::submit(self.draft(title, leader), self.worker.user_id, &DefaultClock);
        self.tasks.create(&task, &history).await?;
        Ok(task)
    }

    async fn history(&self, task: &Task) -> Result<Vec<TaskHistory>, BoxError> {
        Ok(self.tasks.history_for(&[task.id()]).await?)
    }
}

#[fixture]
async fn context(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> Result<RepositoryContext, BoxError> {
    let (db, pool) = temporary_pool(postgres_cluster?, "tasks").await?;
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let accounts = seed_accounts(
        &users,
        &[
            ("pelaksana1", Role::Pelaksana),
            ("leader1", Role::Leader),
            ("leader2", Role::Leader),
        ],
    )
    .await?;
    let [worker, leader, other_leader] = <[Identity; 3]>::try_from(accounts)
        .map_err(|_| "expected three seeded accounts")?;
    Ok(RepositoryContext {
        tasks: PostgresTaskRepository::new(pool),
        worker,
        leader,
        other_leader,
        _temp_db: db,
    })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_create_persists_task_and_submit_entry(
    #[future] context: Result<RepositoryContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let task = ctx.submitted("Persist me", ctx.leader.user_id).await?;

    let found = ctx
        .tasks
        .find_by_id(task.id())
        .await?
        .expect("task should be stored");
    assert_eq!(found.title(), task.title());
    assert_eq!(found.status(), TaskStatus::Submitted);
    assert_eq!(found.deadline(), task.deadline());
    assert_eq!(
        found.created_at().timestamp_micros(),
        task.created_at().timestamp_micros()
    );

    let history = ctx.history(&task).await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action(), HistoryAction::Submit);
    assert_eq!(history[0].action_by(), ctx.worker.user_id);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_duplicate_task_identifier_is_rejected(
    #[future] context: Result<RepositoryContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let task = ctx.submitted("Once only", ctx.leader.user_id).await?;
    let (_, history) = Task::submit(
        ctx.draft("Again", ctx.leader.user_id),
        ctx.worker.user_id,
        &DefaultClock,
    );

    let result = ctx.tasks.create(&task, &history).await;

    assert!(matches!(
        result,
        Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()
    ));
    assert_eq!(ctx.history(&task).await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_resubmit_clears_the_deadline(
    #[future] context: Result<RepositoryContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let mut task = ctx.submitted("Needs rework", ctx.leader.user_id).await?;
    assert!(task.deadline().is_some());

    let revision = task.revise("Add numbers", ctx.leader.user_id, &DefaultClock)?;
    ctx.tasks.record_transition(&task, &revision).await?;
    let draft = TaskDraft {
        deadline: None,
        ..ctx.draft("Reworked", ctx.other_leader.user_id)
    };
    let resubmission = task.resubmit(draft, ctx.worker.user_id, &DefaultClock)?;
    ctx.tasks.record_transition(&task, &resubmission).await?;

    let found = ctx
        .tasks
        .find_by_id(task.id())
        .await?
        .expect("task should be stored");
    assert_eq!(found.deadline(), None);
    assert_eq!(found.title().as_str(), "Reworked");
    assert_eq!(found.assigned_leader(), ctx.other_leader.user_id);
    assert_eq!(found.status(), TaskStatus::Submitted);
    assert_eq!(found.progress(), Progress::ZERO);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_history_follows_insertion_order(
    #[future] context: Result<RepositoryContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let mut task = ctx.submitted("Ordered", ctx.leader.user_id).await?;

    // Every entry shares one timestamp so only the insertion sequence orders them.
    let frozen = FrozenClock(
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid instant"),
    );
    let approval = task.approve(ctx.leader.user_id, &frozen)?;
    ctx.tasks.record_transition(&task, &approval).await?;
    for value in [10, 40, 100] {
        let entry =
            task.report_progress(Progress::new(value)?, None, ctx.worker.user_id, &frozen)?;
        ctx.tasks.record_transition(&task, &entry).await?;
    }

    let actions: Vec<_> = ctx
        .history(&task)
        .await?
        .iter()
        .map(|entry| (entry.action(), entry.note().to_owned()))
        .collect();
    assert_eq!(
        actions,
        vec![
            (HistoryAction::Submit, String::new()),
            (HistoryAction::Approve, String::new()),
            (HistoryAction::UpdateProgress, "Progress updated to 10%".to_owned()),
            (HistoryAction::UpdateProgress, "Progress updated to 40%".to_owned()),
            (HistoryAction::Complete, "Progress updated to 100%".to_owned()),
        ]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_status_filters_select_matching_tasks(
    #[future] context: Result<RepositoryContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let pending = ctx.submitted("Pending", ctx.leader.user_id).await?;
    let mut approved = ctx.submitted("Approved", ctx.leader.user_id).await?;
    let elsewhere = ctx.submitted("Elsewhere", ctx.other_leader.user_id).await?;
    let approval = approved.approve(ctx.leader.user_id, &DefaultClock)?;
    ctx.tasks.record_transition(&approved, &approval).await?;

    let for_leader: Vec<_> = ctx
        .tasks
        .list_by_leader(
            ctx.leader.user_id,
            &[TaskStatus::Submitted, TaskStatus::InProgress],
        )
        .await?
        .iter()
        .map(Task::id)
        .collect();
    assert_eq!(for_leader, vec![pending.id()]);

    let approved_only: Vec<_> = ctx
        .tasks
        .list_by_status(&[TaskStatus::ApprovedByLeader])
        .await?
        .iter()
        .map(Task::id)
        .collect();
    assert_eq!(approved_only, vec![approved.id()]);

    let created: Vec<_> = ctx
        .tasks
        .list_by_creator(ctx.worker.user_id)
        .await?
        .iter()
        .map(Task::id)
        .collect();
    assert_eq!(created, vec![pending.id(), approved.id(), elsewhere.id()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_delete_cascades_history_then_reports_not_found(
    #[future] context: Result<RepositoryContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let mut task = ctx.submitted("Short lived", ctx.leader.user_id).await?;
    let approval = task.approve(ctx.leader.user_id, &DefaultClock)?;
    ctx.tasks.record_transition(&task, &approval).await?;

    ctx.tasks.delete(task.id()).await?;

    assert!(ctx.tasks.find_by_id(task.id()).await?.is_none());
    assert!(ctx.history(&task).await?.is_empty());
    assert!(matches!(
        ctx.tasks.delete(task.id()).await,
        Err(TaskRepositoryError::NotFound(id)) if id == task.id()
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_transition_on_missing_task_writes_nothing(
    #[future] context: Result<RepositoryContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let (mut task, _) = Task::submit(
        ctx.draft("Never stored", ctx.leader.user_id),
        ctx.worker.user_id,
        &DefaultClock,
    );
    let approval = task.approve(ctx.leader.user_id, &DefaultClock)?;

    let result = ctx.tasks.record_transition(&task, &approval).await;

    assert!(matches!(
        result,
        Err(TaskRepositoryError::NotFound(id)) if id == task.id()
    ));
    assert!(ctx.history(&task).await?.is_empty());
    Ok(())
}

struct FrozenClock(DateTime<Utc>);

impl mockable::Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

