//! List filters for board, list, and timeline reads.

use super::{ParseTaskScopeError, Task, TaskPriority, TaskStatus, UserId};
use chrono::{DateTime, Utc};

/// Whose tasks a listing covers, relative to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskScope {
    /// Every user's tasks.
    #[default]
    All,
    /// Only the caller's tasks.
    Mine,
    /// Every task not owned by the caller.
    Global,
}

impl TaskScope {
    /// Resolves the scope against the calling user.
    #[must_use]
    pub const fn resolve(self, caller: UserId) -> OwnerFilter {
        match self {
            Self::All => OwnerFilter::Any,
            Self::Mine => OwnerFilter::Only(caller),
            Self::Global => OwnerFilter::Except(caller),
        }
    }
}

impl TryFrom<&str> for TaskScope {
    type Error = ParseTaskScopeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "my" => Ok(Self::Mine),
            "global" => Ok(Self::Global),
            _ => Err(ParseTaskScopeError(value.to_owned())),
        }
    }
}

/// Ownership restriction of a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OwnerFilter {
    /// No restriction.
    #[default]
    Any,
    /// Tasks owned by the user.
    Only(UserId),
    /// Tasks not owned by the user.
    Except(UserId),
}

impl OwnerFilter {
    /// Returns whether `owner` passes the filter.
    #[must_use]
    pub fn admits(self, owner: UserId) -> bool {
        match self {
            Self::Any => true,
            Self::Only(user) => owner == user,
            Self::Except(user) => owner != user,
        }
    }
}

/// Caller-facing list filter, before the scope is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFilter {
    /// Restrict to one column.
    pub status: Option<TaskStatus>,
    /// Restrict to one priority.
    pub priority: Option<TaskPriority>,
    /// Case-insensitive text searched in title and description.
    pub text: Option<String>,
    /// Keep tasks starting or due at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Keep tasks starting or due at or before this instant.
    pub to: Option<DateTime<Utc>>,
    /// Ownership scope.
    pub scope: TaskScope,
}

impl TaskFilter {
    /// Resolves the filter into a repository query for `caller`.
    #[must_use]
    pub fn into_query(self, caller: UserId) -> TaskQuery {
        TaskQuery {
            owner: self.scope.resolve(caller),
            status: self.status,
            priority: self.priority,
            text: self
                .text
                .map(|text| text.trim().to_lowercase())
                .filter(|text| !text.is_empty()),
            from: self.from,
            to: self.to,
        }
    }
}

/// Repository-level task query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskQuery {
    /// Ownership restriction.
    pub owner: OwnerFilter,
    /// Column restriction.
    pub status: Option<TaskStatus>,
    /// Priority restriction.
    pub priority: Option<TaskPriority>,
    /// Lower-cased search text.
    pub text: Option<String>,
    /// Lower bound on start or due date.
    pub from: Option<DateTime<Utc>>,
    /// Upper bound on start or due date.
    pub to: Option<DateTime<Utc>>,
}

impl TaskQuery {
    /// Query for every task of one owner.
    #[must_use]
    pub fn owned_by(owner: UserId) -> Self {
        Self {
            owner: OwnerFilter::Only(owner),
            ..Self::default()
        }
    }

    /// Returns whether `task` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.owner.admits(task.owner())
            && self.status.is_none_or(|status| task.status() == status)
            && self.priority.is_none_or(|priority| task.priority() == priority)
            && self.matches_text(task)
            && self.matches_window(task)
    }

    fn matches_text(&self, task: &Task) -> bool {
        let Some(needle) = self.text.as_deref() else {
            return true;
        };
        let in_title = task.title().as_str().to_lowercase().contains(needle);
        let in_description = task
            .description()
            .is_some_and(|description| description.as_str().to_lowercase().contains(needle));
        in_title || in_description
    }

    fn matches_window(&self, task: &Task) -> bool {
        let dates = [task.start_at(), task.due_at()];
        let after_from = self.from.is_none_or(|from| {
            dates.iter().flatten().any(|date| *date >= from)
        });
        let before_to = self
            .to
            .is_none_or(|to| dates.iter().flatten().any(|date| *date <= to));
        after_from && before_to
    }
}

/// Sorts tasks for board display: by column, then order, then age.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| (task.status(), task.order(), task.created_at(), task.id()));
}
