//! Error types for task domain validation and parsing.

use super::TaskStatus;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The title is shorter than the minimum after trimming.
    #[error("title must be at least {min} characters, got {actual}")]
    TitleTooShort {
        /// Minimum accepted length.
        min: usize,
        /// Length of the rejected title.
        actual: usize,
    },

    /// The title exceeds the maximum length.
    #[error("title must be at most {max} characters, got {actual}")]
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
        /// Length of the rejected title.
        actual: usize,
    },

    /// The description exceeds the maximum length.
    #[error("description must be at most {max} characters, got {actual}")]
    DescriptionTooLong {
        /// Maximum accepted length.
        max: usize,
        /// Length of the rejected description.
        actual: usize,
    },

    /// A checklist item label is empty after trimming.
    #[error("checklist item {position} must have a non-empty label")]
    EmptyChecklistLabel {
        /// Zero-based position of the offending item.
        position: usize,
    },

    /// Two checklist items share an identifier.
    #[error("duplicate checklist item identifier: {0}")]
    DuplicateChecklistItem(uuid::Uuid),

    /// The completion percentage is outside `0..=100`.
    #[error("percent must be between 0 and 100, got {0}")]
    InvalidPercent(i64),

    /// The requested target position is negative.
    #[error("order must be a non-negative integer, got {0}")]
    InvalidOrder(i64),

    /// A reorder request named a source column the task is no longer in.
    #[error("task is in {actual}, not {expected}")]
    StatusMismatch {
        /// Status supplied by the caller.
        expected: TaskStatus,
        /// Status currently persisted for the task.
        actual: TaskStatus,
    },
}

/// Error returned while parsing task statuses from requests or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from requests or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

/// Error returned while parsing a list scope from a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task scope: {0}")]
pub struct ParseTaskScopeError(pub String);
