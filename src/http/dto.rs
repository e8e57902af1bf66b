//! JSON request and response bodies.

use super::error::ApiError;
use crate::task::{
    domain::{
        ChecklistItem, ChecklistItemDraft, ChecklistItemId, Task, TaskFilter, TaskId,
        TaskPriority, TaskScope, TaskStatus, UserId,
    },
    services::{CreateTaskRequest, ReorderTaskRequest, UpdateTaskRequest},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Checklist entry as sent by clients.
#[derive(Debug, Clone, Deserialize)]
pub struct ChecklistItemBody {
    /// Identifier of an existing entry to preserve.
    #[serde(default)]
    pub id: Option<ChecklistItemId>,
    /// Entry label.
    pub label: String,
    /// Whether the entry is ticked.
    #[serde(default)]
    pub checked: bool,
}

impl From<ChecklistItemBody> for ChecklistItemDraft {
    fn from(body: ChecklistItemBody) -> Self {
        Self {
            id: body.id,
            label: body.label,
            checked: body.checked,
        }
    }
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    /// Task title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Initial column.
    pub status: TaskStatus,
    /// Priority, `med` when absent.
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    /// Planned start.
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    /// Deadline.
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    /// Checklist.
    #[serde(default)]
    pub items: Vec<ChecklistItemBody>,
    /// Explicit progress.
    #[serde(default)]
    pub percent: Option<i64>,
}

impl From<CreateTaskBody> for CreateTaskRequest {
    fn from(body: CreateTaskBody) -> Self {
        let mut request = Self::new(body.title, body.status)
            .with_priority(body.priority.unwrap_or_default())
            .with_items(body.items.into_iter().map(ChecklistItemDraft::from));
        if let Some(description) = body.description {
            request = request.with_description(description);
        }
        if let Some(start_at) = body.start_at {
            request = request.with_start_at(start_at);
        }
        if let Some(due_at) = body.due_at {
            request = request.with_due_at(due_at);
        }
        if let Some(percent) = body.percent {
            request = request.with_percent(percent);
        }
        request
    }
}

/// Body of `PATCH /tasks/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskBody {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New column.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// New position within the (new) column.
    #[serde(default)]
    pub order: Option<i64>,
    /// New priority.
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    /// New planned start.
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    /// New deadline.
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    /// Replacement checklist.
    #[serde(default)]
    pub items: Option<Vec<ChecklistItemBody>>,
    /// Explicit progress, ignored while the checklist is non-empty.
    #[serde(default)]
    pub percent: Option<i64>,
}

impl From<UpdateTaskBody> for UpdateTaskRequest {
    fn from(body: UpdateTaskBody) -> Self {
        let UpdateTaskBody {
            title,
            description,
            status,
            order,
            priority,
            start_at,
            due_at,
            items,
            percent,
        } = body;

        let mut request = Self::new();
        if let Some(value) = title {
            request = request.with_title(value);
        }
        if let Some(value) = description {
            request = request.with_description(value);
        }
        if let Some(value) = status {
            request = request.with_status(value);
        }
        if let Some(value) = order {
            request = request.with_order(value);
        }
        if let Some(value) = priority {
            request = request.with_priority(value);
        }
        if let Some(value) = start_at {
            request = request.with_start_at(value);
        }
        if let Some(value) = due_at {
            request = request.with_due_at(value);
        }
        if let Some(value) = items {
            request = request.with_items(value.into_iter().map(ChecklistItemDraft::from));
        }
        if let Some(value) = percent {
            request = request.with_percent(value);
        }
        request
    }
}

/// Body of `POST /tasks/reorder`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBody {
    /// Task to move.
    pub task_id: TaskId,
    /// Column the client saw the task in.
    pub from_status: TaskStatus,
    /// Destination column.
    pub to_status: TaskStatus,
    /// Destination index, clamped to the column length.
    pub to_index: i64,
}

impl From<ReorderBody> for ReorderTaskRequest {
    fn from(body: ReorderBody) -> Self {
        Self::new(body.task_id, body.from_status, body.to_status, body.to_index)
    }
}

/// Body of `POST /tasks/compact`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CompactBody {
    /// Column of the caller's board to renumber.
    pub status: TaskStatus,
}

/// Query string of `GET /tasks` and `GET /tasks/summary`.
///
/// Empty values are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Column filter.
    pub status: Option<String>,
    /// Priority filter.
    pub priority: Option<String>,
    /// Text searched in title and description.
    pub q: Option<String>,
    /// Lower date bound, RFC 3339.
    pub from: Option<String>,
    /// Upper date bound, RFC 3339.
    pub to: Option<String>,
    /// `all`, `my`, or `global`.
    pub scope: Option<String>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

fn parse_param<'a, T, E>(
    value: Option<&'a str>,
    parse: impl FnOnce(&'a str) -> Result<T, E>,
) -> Result<Option<T>, ApiError>
where
    E: std::fmt::Display,
{
    present(value)
        .map(parse)
        .transpose()
        .map_err(|err| ApiError::Validation(err.to_string()))
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|instant| instant.with_timezone(&Utc))
}

impl TryFrom<ListParams> for TaskFilter {
    type Error = ApiError;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        Ok(Self {
            status: parse_param(params.status.as_deref(), TaskStatus::try_from)?,
            priority: parse_param(params.priority.as_deref(), TaskPriority::try_from)?,
            text: present(params.q.as_deref()).map(ToOwned::to_owned),
            from: parse_param(params.from.as_deref(), parse_instant)?,
            to: parse_param(params.to.as_deref(), parse_instant)?,
            scope: parse_param(params.scope.as_deref(), TaskScope::try_from)?.unwrap_or_default(),
        })
    }
}

/// Checklist entry as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItemView {
    /// Entry identifier.
    pub id: ChecklistItemId,
    /// Entry label.
    pub label: String,
    /// Whether the entry is ticked.
    pub checked: bool,
}

impl From<&ChecklistItem> for ChecklistItemView {
    fn from(item: &ChecklistItem) -> Self {
        Self {
            id: item.id(),
            label: item.label().to_owned(),
            checked: item.is_checked(),
        }
    }
}

/// Task as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Owning user.
    pub owner_id: UserId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Column.
    pub status: TaskStatus,
    /// Position within the owner's column.
    pub order: u32,
    /// Priority.
    pub priority: TaskPriority,
    /// Planned start.
    pub start_at: Option<DateTime<Utc>>,
    /// Deadline.
    pub due_at: Option<DateTime<Utc>>,
    /// Checklist.
    pub items: Vec<ChecklistItemView>,
    /// Completion percentage.
    pub percent: u8,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            owner_id: task.owner(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(|text| text.as_str().to_owned()),
            status: task.status(),
            order: task.order().value(),
            priority: task.priority(),
            start_at: task.start_at(),
            due_at: task.due_at(),
            items: task.items().iter().map(ChecklistItemView::from).collect(),
            percent: task.percent().value(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Body wrapping a list of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksBody {
    /// Tasks, ordered by status then position.
    pub tasks: Vec<TaskView>,
}

impl TasksBody {
    /// Builds the body from domain tasks.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            tasks: tasks.iter().map(TaskView::from).collect(),
        }
    }
}

/// Body returned by `DELETE /tasks/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedBody {
    /// Identifier of the deleted task.
    pub id: TaskId,
}
