//! Task board orchestration: ownership checks, bucket locking, and position
//! maintenance around every repository write.

use super::locks::{BucketGuard, BucketLocks};
use super::requests::{CreateTaskRequest, ReorderTaskRequest, TaskChanges, UpdateTaskRequest};
use crate::task::{
    domain::{
        BucketKey, MovePlan, Percent, Placement, Task, TaskDomainError, TaskFilter, TaskId, TaskStatus,
        UserId, average_percent,
        ordering::{append_order, plan_compaction, plan_move_across, plan_move_within, plan_removal},
        sort_for_display,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Default upper bound on a single board operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Service-level errors for task board operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The task does not exist.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// The caller does not own the task.
    #[error("user {caller} does not own task {task_id}")]
    NotOwner {
        /// Task the caller tried to change.
        task_id: TaskId,
        /// Caller identity.
        caller: UserId,
    },
    /// The operation did not finish in time.
    #[error("task store did not respond within {0:?}")]
    Timeout(Duration),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task board service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Per-column totals for the board summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    /// Column.
    pub status: TaskStatus,
    /// Number of matching tasks in the column.
    pub task_count: usize,
    /// Rounded mean progress of those tasks.
    pub average_percent: Percent,
}

/// Task board orchestration service.
pub struct TaskBoardService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    locks: Arc<BucketLocks>,
    timeout: Duration,
}

impl<R, C> Clone for TaskBoardService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            locks: Arc::clone(&self.locks),
            timeout: self.timeout,
        }
    }
}

impl<R, C> TaskBoardService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task board service.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            locks: Arc::new(BucketLocks::default()),
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Replaces the limit on lock acquisition and reads.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates a task at the tail of the owner's bucket for its status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when the request is invalid,
    /// [`TaskServiceError::Timeout`] when the store does not respond, and
    /// [`TaskServiceError::Repository`] when persistence fails.
    pub async fn create(&self, owner: UserId, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let new_task = request.into_new_task(owner)?;
        let bucket = BucketKey::new(owner, new_task.status);
        let (task, _guard) = self
            .bounded(async {
                let guard = self.locks.lock(bucket).await;
                let size = self.repository.find_bucket(bucket).await?.len();
                Ok((Task::create(new_task, append_order(size), &*self.clock), guard))
            })
            .await?;

        commit(self.repository.store(&task)).await?;
        info!(task_id = %task.id(), bucket = %bucket, order = %task.order(), "task created");
        Ok(task)
    }

    /// Returns a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn get(&self, task_id: TaskId) -> TaskServiceResult<Task> {
        self.bounded(async {
            self.repository
                .find_by_id(task_id)
                .await?
                .ok_or(TaskServiceError::NotFound(task_id))
        })
        .await
    }

    /// Applies a partial update.
    ///
    /// A status change moves the task to the tail of the new column, or to
    /// the requested `order` when one is given. An `order` alone moves the
    /// task inside its current column.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`], [`TaskServiceError::NotOwner`],
    /// [`TaskServiceError::Domain`], [`TaskServiceError::Timeout`], or
    /// [`TaskServiceError::Repository`].
    pub async fn update(
        &self,
        task_id: TaskId,
        caller: UserId,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let (task, placements, _guard) = self
            .bounded(async {
                let (mut task, guard) = self.lock_task(task_id, caller, request.status()).await?;
                let TaskChanges {
                    patch,
                    status,
                    order,
                } = request.into_changes()?;

                let previous = task.clone();
                let current_status = previous.status();
                task.apply_patch(patch, &*self.clock);

                let target_status = status.unwrap_or(current_status);
                let plan = if target_status == current_status && order.is_none() {
                    None
                } else {
                    let index = order.unwrap_or(usize::MAX);
                    Some(self.plan_move(&previous, target_status, index).await?.0)
                };

                let placements = plan.map_or_else(Vec::new, |moved| {
                    task.place(target_status, moved.order, &*self.clock);
                    moved.placements
                });
                Ok((task, placements, guard))
            })
            .await?;

        commit(
            self.repository
                .save_with_placements(&task, &placements, task.updated_at()),
        )
        .await?;
        info!(
            task_id = %task.id(),
            bucket = %task.bucket(),
            order = %task.order(),
            shifted = placements.len(),
            "task updated"
        );
        Ok(task)
    }

    /// Moves a task within its column or across columns.
    ///
    /// Returns the affected buckets after the move, ordered for display.
    /// Moving a task to the slot it already holds writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StatusMismatch`] (as
    /// [`TaskServiceError::Domain`]) when `from_status` does not match the
    /// task's column, plus the errors of [`Self::update`].
    pub async fn reorder(
        &self,
        caller: UserId,
        request: ReorderTaskRequest,
    ) -> TaskServiceResult<Vec<Task>> {
        let task_id = request.task_id();
        let to_status = request.to_status();
        let (mut task, plan, affected, _guard) = self
            .bounded(async {
                let (task, guard) = self.lock_task(task_id, caller, Some(to_status)).await?;
                if request.from_status() != task.status() {
                    return Err(TaskDomainError::StatusMismatch {
                        expected: request.from_status(),
                        actual: task.status(),
                    }
                    .into());
                }
                let to_index = request.to_index()?;
                let (plan, affected) = self.plan_move(&task, to_status, to_index).await?;
                Ok((task, plan, affected, guard))
            })
            .await?;

        let source = task.bucket();
        let destination = BucketKey::new(task.owner(), to_status);
        if source == destination && plan.order == task.order() && plan.placements.is_empty() {
            debug!(task_id = %task_id, order = %task.order(), "reorder is a no-op");
            return Ok(settle(affected, None, &[], task.updated_at()));
        }

        task.place(to_status, plan.order, &*self.clock);
        let at = task.updated_at();
        commit(
            self.repository
                .save_with_placements(&task, &plan.placements, at),
        )
        .await?;
        info!(
            task_id = %task_id,
            from = %source,
            to = %destination,
            order = %plan.order,
            shifted = plan.placements.len(),
            "task reordered"
        );
        Ok(settle(affected, Some(&task), &plan.placements, at))
    }

    /// Deletes a task and closes the gap it leaves.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`], [`TaskServiceError::NotOwner`],
    /// [`TaskServiceError::Timeout`], or [`TaskServiceError::Repository`].
    pub async fn delete(&self, task_id: TaskId, caller: UserId) -> TaskServiceResult<TaskId> {
        let (task, placements, _guard) = self
            .bounded(async {
                let (task, guard) = self.lock_task(task_id, caller, None).await?;
                let bucket = self.repository.find_bucket(task.bucket()).await?;
                let placements = plan_removal(&bucket, &task);
                Ok((task, placements, guard))
            })
            .await?;

        commit(
            self.repository
                .delete_with_placements(task_id, &placements, self.clock.utc()),
        )
        .await?;
        info!(
            task_id = %task_id,
            bucket = %task.bucket(),
            shifted = placements.len(),
            "task deleted"
        );
        Ok(task_id)
    }

    /// Renumbers the caller's bucket for `status` to `0..N-1`.
    ///
    /// Returns the bucket after repair, ordered by position.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Timeout`] or
    /// [`TaskServiceError::Repository`].
    pub async fn compact(&self, caller: UserId, status: TaskStatus) -> TaskServiceResult<Vec<Task>> {
        let bucket = BucketKey::new(caller, status);
        let (snapshot, _guard) = self
            .bounded(async {
                let guard = self.locks.lock(bucket).await;
                Ok((self.repository.find_bucket(bucket).await?, guard))
            })
            .await?;

        let placements = plan_compaction(&snapshot);
        if placements.is_empty() {
            return Ok(snapshot);
        }

        let at = self.clock.utc();
        commit(self.repository.apply_placements(&placements, at)).await?;
        warn!(
            bucket = %bucket,
            repaired = placements.len(),
            "renumbered non-contiguous bucket"
        );
        Ok(settle(snapshot, None, &placements, at))
    }

    /// Lists tasks visible under `filter`, ordered by status then position.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Timeout`] or
    /// [`TaskServiceError::Repository`].
    pub async fn list(&self, caller: UserId, filter: TaskFilter) -> TaskServiceResult<Vec<Task>> {
        self.bounded(async {
            let query = filter.into_query(caller);
            Ok(self.repository.find(&query).await?)
        })
        .await
    }

    /// Summarises each column over the tasks matching `filter`.
    ///
    /// Every column is reported, including empty ones.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Timeout`] or
    /// [`TaskServiceError::Repository`].
    pub async fn board_summary(
        &self,
        caller: UserId,
        filter: TaskFilter,
    ) -> TaskServiceResult<Vec<ColumnSummary>> {
        let tasks = self.list(caller, filter).await?;
        Ok(TaskStatus::ALL
            .into_iter()
            .map(|status| {
                let percents: Vec<Percent> = tasks
                    .iter()
                    .filter(|task| task.status() == status)
                    .map(Task::percent)
                    .collect();
                ColumnSummary {
                    status,
                    task_count: percents.len(),
                    average_percent: average_percent(percents),
                }
            })
            .collect())
    }

    /// Bounds the lock-and-read phase of an operation.
    ///
    /// Store writes are awaited outside this limit with the bucket guard
    /// still held.
    async fn bounded<T>(
        &self,
        operation: impl Future<Output = TaskServiceResult<T>>,
    ) -> TaskServiceResult<T> {
        tokio::time::timeout(self.timeout, operation)
            .await
            .unwrap_or_else(|_| {
                warn!(timeout = ?self.timeout, "task board operation timed out");
                Err(TaskServiceError::Timeout(self.timeout))
            })
            .inspect_err(log_store_failure)
    }

    async fn load_owned(&self, task_id: TaskId, caller: UserId) -> TaskServiceResult<Task> {
        let task = self
            .repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        if !task.is_owned_by(caller) {
            warn!(task_id = %task_id, caller = %caller, "rejected change by non-owner");
            return Err(TaskServiceError::NotOwner { task_id, caller });
        }
        Ok(task)
    }

    /// Locks the task's bucket, and the bucket for `destination` when given,
    /// then returns a fresh copy of the task read under those locks.
    async fn lock_task(
        &self,
        task_id: TaskId,
        caller: UserId,
        destination: Option<TaskStatus>,
    ) -> TaskServiceResult<(Task, BucketGuard)> {
        loop {
            let seen = self.load_owned(task_id, caller).await?;
            let source = seen.bucket();
            let target = destination.map_or(source, |status| BucketKey::new(seen.owner(), status));
            let guard = self.locks.lock_pair(source, target).await;

            let current = self.load_owned(task_id, caller).await?;
            if current.bucket() == source {
                return Ok((current, guard));
            }
            debug!(task_id = %task_id, "task changed column while waiting for lock; retrying");
        }
    }

    /// Plans a move and returns it with every task of the buckets involved.
    async fn plan_move(
        &self,
        task: &Task,
        to_status: TaskStatus,
        to_index: usize,
    ) -> TaskServiceResult<(MovePlan, Vec<Task>)> {
        let source = self.repository.find_bucket(task.bucket()).await?;
        if to_status == task.status() {
            let plan = plan_move_within(&source, task.id(), to_index);
            return Ok((plan, source));
        }
        let destination = self
            .repository
            .find_bucket(BucketKey::new(task.owner(), to_status))
            .await?;
        let plan = plan_move_across(&source, &destination, task, to_index);
        let mut affected = source;
        affected.extend(destination);
        Ok((plan, affected))
    }
}

/// Awaits a store write to completion while the caller holds its guard.
async fn commit<T>(
    write: impl Future<Output = Result<T, TaskRepositoryError>>,
) -> TaskServiceResult<T> {
    write
        .await
        .map_err(TaskServiceError::from)
        .inspect_err(log_store_failure)
}

fn log_store_failure(err: &TaskServiceError) {
    if let TaskServiceError::Repository(store @ TaskRepositoryError::Persistence(_)) = err {
        error!(error = %store, "task store operation failed");
    }
}

/// Applies a committed move to the pre-write snapshot of the affected buckets.
fn settle(
    mut affected: Vec<Task>,
    moved: Option<&Task>,
    placements: &[Placement],
    at: DateTime<Utc>,
) -> Vec<Task> {
    for task in &mut affected {
        if let Some(updated) = moved.filter(|updated| updated.id() == task.id()) {
            *task = updated.clone();
        } else if let Some(placement) = placements.iter().find(|p| p.task_id() == task.id()) {
            task.shift_to(placement.order(), at);
        }
    }
    sort_for_display(&mut affected);
    affected
}
