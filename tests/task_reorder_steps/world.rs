//! Shared world state for task reordering BDD scenarios.

use std::{collections::HashMap, sync::Arc};

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{TaskId, TaskStatus, UserId},
    services::{TaskBoardService, TaskServiceError},
};

/// Service type used by the BDD world.
pub type TestBoardService = TaskBoardService<InMemoryTaskRepository, DefaultClock>;

/// Scenario world for board reordering behaviour tests.
pub struct BoardWorld {
    pub repository: Arc<InMemoryTaskRepository>,
    pub service: TestBoardService,
    pub users: HashMap<String, UserId>,
    pub tasks: HashMap<String, TaskId>,
    pub last_outcome: Option<Result<(), TaskServiceError>>,
}

impl BoardWorld {
    /// Creates a world with an empty board.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryTaskRepository::new());
        let service = TaskBoardService::new(Arc::clone(&repository), Arc::new(DefaultClock));

        Self {
            repository,
            service,
            users: HashMap::new(),
            tasks: HashMap::new(),
            last_outcome: None,
        }
    }

    /// Returns the identifier for a named user, registering it on first use.
    pub fn user(&mut self, name: &str) -> UserId {
        *self.users.entry(name.to_owned()).or_insert_with(UserId::new)
    }

    /// Looks up a user already named in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when the user has not appeared yet.
    pub fn known_user(&self, name: &str) -> Result<UserId, eyre::Report> {
        self.users
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("no user named {name:?} in scenario world"))
    }

    /// Looks up a task created earlier in the scenario by its title.
    ///
    /// # Errors
    ///
    /// Returns an error when no task with that title was created.
    pub fn task(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task titled {title:?} in scenario world"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Parses a status name used in feature files.
///
/// # Errors
///
/// Returns an error for unknown status names.
pub fn parse_status(raw: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(raw).map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))
}

/// Splits a comma-separated title list.
#[must_use]
pub fn parse_titles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
