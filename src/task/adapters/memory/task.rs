//! In-memory task repository for tests and the `memory` storage backend.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::task::{
    domain::{Task, TaskHistory, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    insertion_order: Vec<TaskId>,
    history: Vec<TaskHistory>,
}

impl InMemoryTaskState {
    fn tasks_matching(&self, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .filter(|task| predicate(task))
            .cloned()
            .collect()
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: &Task, history: &TaskHistory) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        state.insertion_order.push(task.id());
        state.history.push(history.clone());
        Ok(())
    }

    async fn record_transition(
        &self,
        task: &Task,
        history: &TaskHistory,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *stored = task.clone();
        state.history.push(history.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_by_creator(&self, creator: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks_matching(|task| task.created_by() == creator))
    }

    async fn list_by_leader(
        &self,
        leader: UserId,
        statuses: &[TaskStatus],
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks_matching(|task| {
            task.assigned_leader() == leader && statuses.contains(&task.status())
        }))
    }

    async fn list_by_status(&self, statuses: &[TaskStatus]) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks_matching(|task| statuses.contains(&task.status())))
    }

    async fn history_for(&self, task_ids: &[TaskId]) -> TaskRepositoryResult<Vec<TaskHistory>> {
        let state = self.state.read().map_err(lock_error)?;
        let wanted: HashSet<TaskId> = task_ids.iter().copied().collect();
        Ok(state
            .history
            .iter()
            .filter(|entry| wanted.contains(&entry.task_id()))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.remove(&id).is_none() {
            return Err(TaskRepositoryError::NotFound(id));
        }
        state.insertion_order.retain(|task_id| *task_id != id);
        state.history.retain(|entry| entry.task_id() != id);
        Ok(())
    }
}
