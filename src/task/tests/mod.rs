//! Unit tests for the task board module.

mod progress_tests;

use crate::task::domain::{
    Percent, PersistedTaskData, Task, TaskId, TaskOrder, TaskPriority, TaskStatus, TaskTitle,
    UserId,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Builds a stored task at `order`; `created_offset` seconds after a fixed
/// epoch sets its creation time.
pub(super) fn stored_task(
    owner: UserId,
    status: TaskStatus,
    order: u32,
    title: &str,
    created_offset: i64,
) -> Task {
    let created_at = epoch() + Duration::seconds(created_offset);
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        owner,
        title: TaskTitle::new(title).expect("valid title"),
        description: None,
        status,
        order: TaskOrder::new(order),
        priority: TaskPriority::Med,
        start_at: None,
        due_at: None,
        items: Vec::new(),
        percent: Percent::ZERO,
        created_at,
        updated_at: created_at,
    })
}

/// Returns the titles of `tasks` in slice order.
pub(super) fn titles(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| task.title().as_str().to_owned())
        .collect()
}

/// Returns `(title, order)` pairs in slice order.
pub(super) fn layout(tasks: &[Task]) -> Vec<(String, u32)> {
    tasks
        .iter()
        .map(|task| (task.title().as_str().to_owned(), task.order().value()))
        .collect()
}
