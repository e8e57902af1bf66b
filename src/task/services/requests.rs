//! Request payloads accepted by the task board service.

use crate::task::domain::{
    ChecklistItemDraft, NewTask, Percent, TaskDescription, TaskDomainError, TaskId, TaskPatch,
    TaskPriority, TaskStatus, TaskTitle, UserId, build_checklist,
};
use chrono::{DateTime, Utc};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    start_at: Option<DateTime<Utc>>,
    due_at: Option<DateTime<Utc>>,
    items: Vec<ChecklistItemDraft>,
    percent: Option<i64>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            title: title.into(),
            description: None,
            status,
            priority: TaskPriority::default(),
            start_at: None,
            due_at: None,
            items: Vec::new(),
            percent: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the planned start.
    #[must_use]
    pub const fn with_start_at(mut self, start_at: DateTime<Utc>) -> Self {
        self.start_at = Some(start_at);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Sets the checklist.
    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = ChecklistItemDraft>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    /// Sets an explicit progress value, kept only while the checklist is
    /// empty.
    #[must_use]
    pub const fn with_percent(mut self, percent: i64) -> Self {
        self.percent = Some(percent);
        self
    }

    /// Returns the requested column.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Validates the request into domain attributes owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when any field fails validation.
    pub fn into_new_task(self, owner: UserId) -> Result<NewTask, TaskDomainError> {
        let Self {
            title,
            description,
            status,
            priority,
            start_at,
            due_at,
            items,
            percent,
        } = self;

        Ok(NewTask {
            owner,
            title: TaskTitle::new(title)?,
            description: description.map(TaskDescription::new).transpose()?,
            status,
            priority,
            start_at,
            due_at,
            items: build_checklist(items)?,
            percent: percent.map(Percent::new).transpose()?.unwrap_or_default(),
        })
    }
}

/// Request payload for a partial task update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
    order: Option<i64>,
    priority: Option<TaskPriority>,
    start_at: Option<DateTime<Utc>>,
    due_at: Option<DateTime<Utc>>,
    items: Option<Vec<ChecklistItemDraft>>,
    percent: Option<i64>,
}

/// Validated form of an [`UpdateTaskRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    /// Content changes.
    pub patch: TaskPatch,
    /// Requested column, if any.
    pub status: Option<TaskStatus>,
    /// Requested position, if any.
    pub order: Option<usize>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Moves the task to another column.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Moves the task to a position within its (new) column.
    #[must_use]
    pub const fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the planned start.
    #[must_use]
    pub const fn with_start_at(mut self, start_at: DateTime<Utc>) -> Self {
        self.start_at = Some(start_at);
        self
    }

    /// Replaces the deadline.
    #[must_use]
    pub const fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Replaces the checklist.
    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = ChecklistItemDraft>) -> Self {
        self.items = Some(items.into_iter().collect());
        self
    }

    /// Sets an explicit progress value.
    #[must_use]
    pub const fn with_percent(mut self, percent: i64) -> Self {
        self.percent = Some(percent);
        self
    }

    /// Returns the requested column, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when any supplied field fails validation.
    pub fn into_changes(self) -> Result<TaskChanges, TaskDomainError> {
        let Self {
            title,
            description,
            status,
            order,
            priority,
            start_at,
            due_at,
            items,
            percent,
        } = self;

        let patch = TaskPatch {
            title: title.map(TaskTitle::new).transpose()?,
            description: description.map(TaskDescription::new).transpose()?,
            priority,
            start_at,
            due_at,
            items: items.map(build_checklist).transpose()?,
            percent: percent.map(Percent::new).transpose()?,
        };

        Ok(TaskChanges {
            patch,
            status,
            order: order.map(target_index).transpose()?,
        })
    }
}

/// Request payload for moving a task on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderTaskRequest {
    task_id: TaskId,
    from_status: TaskStatus,
    to_status: TaskStatus,
    to_index: i64,
}

impl ReorderTaskRequest {
    /// Creates a reorder request.
    #[must_use]
    pub const fn new(
        task_id: TaskId,
        from_status: TaskStatus,
        to_status: TaskStatus,
        to_index: i64,
    ) -> Self {
        Self {
            task_id,
            from_status,
            to_status,
            to_index,
        }
    }

    /// Returns the task to move.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the column the caller believes the task is in.
    #[must_use]
    pub const fn from_status(&self) -> TaskStatus {
        self.from_status
    }

    /// Returns the destination column.
    #[must_use]
    pub const fn to_status(&self) -> TaskStatus {
        self.to_status
    }

    /// Returns the validated destination index.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidOrder`] for negative indexes.
    pub fn to_index(&self) -> Result<usize, TaskDomainError> {
        target_index(self.to_index)
    }
}

fn target_index(value: i64) -> Result<usize, TaskDomainError> {
    usize::try_from(value).map_err(|_| TaskDomainError::InvalidOrder(value))
}
