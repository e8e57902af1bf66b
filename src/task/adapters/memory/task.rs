//! In-memory repository for the task board.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{BucketKey, Placement, Task, TaskId, TaskQuery, sort_for_display},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Every write takes the single state lock, so record writes and their
/// neighbour shifts are applied atomically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Checks every placement target exists before anything is mutated.
fn ensure_placed_tasks_exist(
    state: &InMemoryTaskState,
    placements: &[Placement],
) -> TaskRepositoryResult<()> {
    placements
        .iter()
        .map(|placement| placement.task_id())
        .find(|id| !state.tasks.contains_key(id))
        .map_or(Ok(()), |missing| Err(TaskRepositoryError::NotFound(missing)))
}

fn apply_to_state(state: &mut InMemoryTaskState, placements: &[Placement], at: DateTime<Utc>) {
    for placement in placements {
        if let Some(task) = state.tasks.get_mut(&placement.task_id()) {
            task.shift_to(placement.order(), at);
        }
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut found: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| query.matches(task))
            .cloned()
            .collect();
        sort_for_display(&mut found);
        Ok(found)
    }

    async fn find_bucket(&self, bucket: BucketKey) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut found: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.bucket() == bucket)
            .cloned()
            .collect();
        sort_for_display(&mut found);
        Ok(found)
    }

    async fn save_with_placements(
        &self,
        task: &Task,
        placements: &[Placement],
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        ensure_placed_tasks_exist(&state, placements)?;

        state.tasks.insert(task.id(), task.clone());
        apply_to_state(&mut state, placements, at);
        Ok(())
    }

    async fn apply_placements(
        &self,
        placements: &[Placement],
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        ensure_placed_tasks_exist(&state, placements)?;
        apply_to_state(&mut state, placements, at);
        Ok(())
    }

    async fn delete_with_placements(
        &self,
        id: TaskId,
        placements: &[Placement],
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&id) {
            return Err(TaskRepositoryError::NotFound(id));
        }
        ensure_placed_tasks_exist(&state, placements)?;

        state.tasks.remove(&id);
        apply_to_state(&mut state, placements, at);
        Ok(())
    }
}
