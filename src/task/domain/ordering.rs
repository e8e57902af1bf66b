//! Position maintenance for tasks within their board columns.
//!
//! Every `(owner, status)` pair forms a *bucket* whose `order` values must be
//! exactly `0..N-1`. The functions here are pure planners: given snapshots of
//! the affected buckets they return the moved task's new position and the
//! minimal list of [`Placement`]s for its neighbours. Persisting the plan
//! atomically, and serializing planners over the same bucket, is the job of
//! the service and repository layers.

use super::{Task, TaskId, TaskStatus, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based position of a task within its bucket.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskOrder(u32);

impl TaskOrder {
    /// The head of a bucket.
    pub const FIRST: Self = Self(0);

    /// Creates an order value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Converts a bucket index into an order value, saturating at
    /// `u32::MAX`.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    const fn shifted_down(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    const fn shifted_up(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl fmt::Display for TaskOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the ordering bucket a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    owner: UserId,
    status: TaskStatus,
}

impl BucketKey {
    /// Creates a bucket key.
    #[must_use]
    pub const fn new(owner: UserId, status: TaskStatus) -> Self {
        Self { owner, status }
    }

    /// Returns the bucket owner.
    #[must_use]
    pub const fn owner(self) -> UserId {
        self.owner
    }

    /// Returns the bucket status.
    #[must_use]
    pub const fn status(self) -> TaskStatus {
        self.status
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.status)
    }
}

/// A new order value for a task whose status does not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    task_id: TaskId,
    order: TaskOrder,
}

impl Placement {
    /// Creates a placement.
    #[must_use]
    pub const fn new(task_id: TaskId, order: TaskOrder) -> Self {
        Self { task_id, order }
    }

    /// Returns the task being repositioned.
    #[must_use]
    pub const fn task_id(self) -> TaskId {
        self.task_id
    }

    /// Returns the task's new order.
    #[must_use]
    pub const fn order(self) -> TaskOrder {
        self.order
    }
}

/// Result of planning a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    /// Final order of the moved task after clamping.
    pub order: TaskOrder,
    /// Order changes for the other tasks of the affected bucket(s).
    pub placements: Vec<Placement>,
}

/// Returns the order a task appended to a bucket of `bucket_len` tasks gets.
#[must_use]
pub fn append_order(bucket_len: usize) -> TaskOrder {
    TaskOrder::from_index(bucket_len)
}

/// Plans moving `task_id` to `to_index` inside its own bucket.
///
/// `bucket` is a snapshot of the whole bucket, including the moved task.
/// The target is clamped to the last slot. The remaining tasks are laid out
/// in their current relative order around the target, which also repairs
/// any gaps or duplicates present in the snapshot.
#[must_use]
pub fn plan_move_within(bucket: &[Task], task_id: TaskId, to_index: usize) -> MovePlan {
    let others = sorted_by_position(bucket.iter().filter(|task| task.id() != task_id));
    let target = to_index.min(others.len());

    let placements = others
        .iter()
        .enumerate()
        .filter_map(|(index, task)| {
            let slot = if index >= target { index + 1 } else { index };
            placement_if_changed(task, TaskOrder::from_index(slot))
        })
        .collect();

    MovePlan {
        order: TaskOrder::from_index(target),
        placements,
    }
}

/// Plans moving `task` out of its bucket into `destination` at `to_index`.
///
/// `source` and `destination` are snapshots of the two buckets as they were
/// before the move. The target is clamped to `[0, destination size]`. Tasks
/// behind the vacated slot move up by one; tasks at or behind the insertion
/// point move down by one.
#[must_use]
pub fn plan_move_across(
    source: &[Task],
    destination: &[Task],
    task: &Task,
    to_index: usize,
) -> MovePlan {
    let receiving: Vec<&Task> = destination
        .iter()
        .filter(|other| other.id() != task.id())
        .collect();
    let target = TaskOrder::from_index(to_index.min(receiving.len()));

    let closing = source
        .iter()
        .filter(|other| other.id() != task.id() && other.order() > task.order())
        .map(|other| Placement::new(other.id(), other.order().shifted_up()));
    let opening = receiving
        .into_iter()
        .filter(|other| other.order() >= target)
        .map(|other| Placement::new(other.id(), other.order().shifted_down()));

    MovePlan {
        order: target,
        placements: closing.chain(opening).collect(),
    }
}

/// Plans closing the gap left by deleting `removed` from `bucket`.
#[must_use]
pub fn plan_removal(bucket: &[Task], removed: &Task) -> Vec<Placement> {
    bucket
        .iter()
        .filter(|task| task.id() != removed.id() && task.order() > removed.order())
        .map(|task| Placement::new(task.id(), task.order().shifted_up()))
        .collect()
}

/// Plans renumbering a bucket to `0..N-1`, keeping its relative order.
///
/// Ties between equal orders are broken by creation time, then identifier.
#[must_use]
pub fn plan_compaction(bucket: &[Task]) -> Vec<Placement> {
    sorted_by_position(bucket.iter())
        .into_iter()
        .enumerate()
        .filter_map(|(index, task)| placement_if_changed(task, TaskOrder::from_index(index)))
        .collect()
}

/// Returns whether the bucket's orders are exactly `0..N-1`.
#[must_use]
pub fn is_contiguous(bucket: &[Task]) -> bool {
    let mut orders: Vec<TaskOrder> = bucket.iter().map(Task::order).collect();
    orders.sort_unstable();
    orders
        .into_iter()
        .enumerate()
        .all(|(index, order)| order == TaskOrder::from_index(index))
}

fn sorted_by_position<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<&'a Task> {
    let mut sorted: Vec<&Task> = tasks.collect();
    sorted.sort_by_key(|task| (task.order(), task.created_at(), task.id()));
    sorted
}

fn placement_if_changed(task: &Task, order: TaskOrder) -> Option<Placement> {
    (task.order() != order).then(|| Placement::new(task.id(), order))
}
