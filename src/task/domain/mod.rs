//! Domain model for the task board.
//!
//! The domain covers task content validation, checklist-derived progress,
//! and the position planners that keep every `(owner, status)` bucket
//! numbered `0..N-1`. Infrastructure concerns stay outside this boundary.

mod checklist;
mod content;
mod error;
mod ids;
pub mod ordering;
mod progress;
mod query;
mod status;
mod task;

pub use checklist::{ChecklistItem, ChecklistItemDraft, build_checklist};
pub use content::{
    MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH, MIN_TITLE_LENGTH, TaskDescription, TaskTitle,
};
pub use error::{
    ParseTaskPriorityError, ParseTaskScopeError, ParseTaskStatusError, TaskDomainError,
};
pub use ids::{ChecklistItemId, TaskId, UserId};
pub use ordering::{BucketKey, MovePlan, Placement, TaskOrder};
pub use progress::{Percent, average_percent, derive_percent};
pub use query::{OwnerFilter, TaskFilter, TaskQuery, TaskScope, sort_for_display};
pub use status::{TaskPriority, TaskStatus};
pub use task::{NewTask, PersistedTaskData, Task, TaskPatch};
