//! Task aggregate root.

use super::{
    BucketKey, ChecklistItem, Percent, TaskDescription, TaskId, TaskOrder, TaskPriority,
    TaskStatus, TaskTitle, UserId, derive_percent,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// Task aggregate root.
///
/// `percent` is kept consistent with `items`: whenever the checklist is
/// non-empty it is the rounded share of ticked entries, otherwise it is the
/// last explicitly set value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    owner: UserId,
    title: TaskTitle,
    description: Option<TaskDescription>,
    status: TaskStatus,
    order: TaskOrder,
    priority: TaskPriority,
    start_at: Option<DateTime<Utc>>,
    due_at: Option<DateTime<Utc>>,
    items: Vec<ChecklistItem>,
    percent: Percent,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated attributes for a task about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Owning user.
    pub owner: UserId,
    /// Task title.
    pub title: TaskTitle,
    /// Optional description.
    pub description: Option<TaskDescription>,
    /// Initial column.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Optional planned start.
    pub start_at: Option<DateTime<Utc>>,
    /// Optional deadline.
    pub due_at: Option<DateTime<Utc>>,
    /// Initial checklist.
    pub items: Vec<ChecklistItem>,
    /// Explicit progress, used only while the checklist is empty.
    pub percent: Percent,
}

/// Validated content changes for an existing task.
///
/// Status and order are deliberately absent: they only change through the
/// ordering planners.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPatch {
    /// Replacement title.
    pub title: Option<TaskTitle>,
    /// Replacement description.
    pub description: Option<TaskDescription>,
    /// Replacement priority.
    pub priority: Option<TaskPriority>,
    /// Replacement planned start.
    pub start_at: Option<DateTime<Utc>>,
    /// Replacement deadline.
    pub due_at: Option<DateTime<Utc>>,
    /// Replacement checklist.
    pub items: Option<Vec<ChecklistItem>>,
    /// Explicit progress, honoured only when the resulting checklist is
    /// empty.
    pub percent: Option<Percent>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner.
    pub owner: UserId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Option<TaskDescription>,
    /// Persisted column.
    pub status: TaskStatus,
    /// Persisted position within the column.
    pub order: TaskOrder,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted planned start.
    pub start_at: Option<DateTime<Utc>>,
    /// Persisted deadline.
    pub due_at: Option<DateTime<Utc>>,
    /// Persisted checklist.
    pub items: Vec<ChecklistItem>,
    /// Persisted progress.
    pub percent: Percent,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task at the given position of its bucket.
    #[must_use]
    pub fn create(new_task: NewTask, order: TaskOrder, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let percent = derive_percent(&new_task.items, new_task.percent);

        Self {
            id: TaskId::new(),
            owner: new_task.owner,
            title: new_task.title,
            description: new_task.description,
            status: new_task.status,
            order,
            priority: new_task.priority,
            start_at: new_task.start_at,
            due_at: new_task.due_at,
            items: new_task.items,
            percent,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            status: data.status,
            order: data.order,
            priority: data.priority,
            start_at: data.start_at,
            due_at: data.due_at,
            items: data.items,
            percent: data.percent,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns whether `user` owns this task.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns the column.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the position within the column.
    #[must_use]
    pub const fn order(&self) -> TaskOrder {
        self.order
    }

    /// Returns the bucket this task currently belongs to.
    #[must_use]
    pub const fn bucket(&self) -> BucketKey {
        BucketKey::new(self.owner, self.status)
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the planned start, if any.
    #[must_use]
    pub const fn start_at(&self) -> Option<DateTime<Utc>> {
        self.start_at
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_at
    }

    /// Returns the checklist.
    #[must_use]
    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    /// Returns the completion percentage.
    #[must_use]
    pub const fn percent(&self) -> Percent {
        self.percent
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies content changes and re-derives progress.
    pub fn apply_patch(&mut self, patch: TaskPatch, clock: &impl Clock) {
        let TaskPatch {
            title,
            description,
            priority,
            start_at,
            due_at,
            items,
            percent,
        } = patch;

        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(new_description) = description {
            self.description = Some(new_description);
        }
        if let Some(new_priority) = priority {
            self.priority = new_priority;
        }
        if let Some(new_start) = start_at {
            self.start_at = Some(new_start);
        }
        if let Some(new_due) = due_at {
            self.due_at = Some(new_due);
        }
        if let Some(new_items) = items {
            self.items = new_items;
        }
        let fallback = percent.unwrap_or(self.percent);
        self.percent = derive_percent(&self.items, fallback);
        self.touch(clock);
    }

    /// Moves the task to `order` within `status`.
    ///
    /// Neighbour shifts are the caller's responsibility; see
    /// [`super::ordering`].
    pub fn place(&mut self, status: TaskStatus, order: TaskOrder, clock: &impl Clock) {
        self.status = status;
        self.order = order;
        self.touch(clock);
    }

    /// Sets the order of a task shifted by a neighbour's move.
    pub(crate) fn shift_to(&mut self, order: TaskOrder, at: DateTime<Utc>) {
        self.order = order;
        self.updated_at = at;
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
