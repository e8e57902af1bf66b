//! Shared test helpers for in-memory board integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{BucketKey, Task, TaskStatus, UserId},
    ports::TaskRepository,
    services::{CreateTaskRequest, TaskBoardService},
};

/// Service type used by the integration tests.
pub type TestService = TaskBoardService<InMemoryTaskRepository, DefaultClock>;

/// A service plus direct access to the store behind it.
pub struct Board {
    pub repository: Arc<InMemoryTaskRepository>,
    pub service: TestService,
}

/// Provides a fresh board for each test.
#[fixture]
pub fn board() -> Board {
    let repository = Arc::new(InMemoryTaskRepository::new());
    Board {
        service: TaskBoardService::new(Arc::clone(&repository), Arc::new(DefaultClock)),
        repository,
    }
}

impl Board {
    /// Creates tasks named `titles` at the tail of `owner`'s column.
    ///
    /// # Errors
    ///
    /// Returns an error if any creation fails.
    pub async fn seed(
        &self,
        owner: UserId,
        status: TaskStatus,
        titles: &[&str],
    ) -> Result<Vec<Task>, eyre::Report> {
        let mut created = Vec::with_capacity(titles.len());
        for title in titles {
            let task = self
                .service
                .create(owner, CreateTaskRequest::new(*title, status))
                .await?;
            created.push(task);
        }
        Ok(created)
    }

    /// Returns `owner`'s column as `(title, order)` pairs in position order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails.
    pub async fn column(
        &self,
        owner: UserId,
        status: TaskStatus,
    ) -> Result<Vec<(String, u32)>, eyre::Report> {
        let tasks = self
            .repository
            .find_bucket(BucketKey::new(owner, status))
            .await?;
        Ok(tasks
            .iter()
            .map(|task| (task.title().as_str().to_owned(), task.order().value()))
            .collect())
    }
}

/// Asserts that `column` is numbered exactly `0..N-1`.
///
/// # Errors
///
/// Returns an error describing the first out-of-place entry.
pub fn ensure_contiguous(column: &[(String, u32)]) -> Result<(), eyre::Report> {
    let mut orders: Vec<u32> = column.iter().map(|(_, order)| *order).collect();
    orders.sort_unstable();
    for (expected, actual) in (0_u32..).zip(orders) {
        eyre::ensure!(
            expected == actual,
            "expected order {expected}, found {actual} in {column:?}"
        );
    }
    Ok(())
}

/// Builds the expected `(title, order)` layout.
#[must_use]
pub fn layout(pairs: &[(&str, u32)]) -> Vec<(String, u32)> {
    pairs
        .iter()
        .map(|(title, order)| ((*title).to_owned(), *order))
        .collect()
}
