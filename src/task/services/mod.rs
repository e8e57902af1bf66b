//! Application services for task board orchestration.

mod board;
mod locks;
mod requests;

pub use board::{
    ColumnSummary, DEFAULT_OPERATION_TIMEOUT, TaskBoardService, TaskServiceError,
    TaskServiceResult,
};
pub use requests::{CreateTaskRequest, ReorderTaskRequest, TaskChanges, UpdateTaskRequest};
