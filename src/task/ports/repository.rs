//! Repository port for task persistence and bucket maintenance.

use crate::task::domain::{BucketKey, Placement, Task, TaskId, TaskQuery};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Writes that carry [`Placement`]s must be atomic: either the record write
/// and every neighbour shift are persisted, or none are.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task matching `query`, sorted by status then order.
    async fn find(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the tasks of one bucket, sorted by order.
    async fn find_bucket(&self, bucket: BucketKey) -> TaskRepositoryResult<Vec<Task>>;

    /// Persists `task` and the given neighbour shifts in one atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when `task` or any placed
    /// task does not exist; nothing is written in that case.
    async fn save_with_placements(
        &self,
        task: &Task,
        placements: &[Placement],
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()>;

    /// Applies neighbour shifts without touching any other field.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when a placed task does not
    /// exist; nothing is written in that case.
    async fn apply_placements(
        &self,
        placements: &[Placement],
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()>;

    /// Deletes a task and applies the compaction shifts atomically.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task or a placed
    /// task does not exist; nothing is written in that case.
    async fn delete_with_placements(
        &self,
        id: TaskId,
        placements: &[Placement],
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
