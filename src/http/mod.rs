//! JSON API over the task board service.
//!
//! Every route requires the `x-user-id` header set by the upstream
//! authenticator. Errors are returned as `{"error": kind, "message": text}`.

pub mod auth;
pub mod dto;
pub mod error;
mod handlers;

use crate::task::{ports::TaskRepository, services::TaskBoardService};
use axum::{
    Router,
    routing::{get, post},
};
use mockable::Clock;
use std::sync::Arc;

pub use auth::{Caller, USER_ID_HEADER};
pub use error::ApiError;

/// Shared state handed to every handler.
pub struct AppState<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    service: Arc<TaskBoardService<R, C>>,
}

impl<R, C> AppState<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Wraps a board service for use by the router.
    #[must_use]
    pub const fn new(service: Arc<TaskBoardService<R, C>>) -> Self {
        Self { service }
    }
}

impl<R, C> Clone for AppState<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Builds the task API router.
#[must_use]
pub fn router<R, C>(state: AppState<R, C>) -> Router
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/tasks",
            post(handlers::create_task::<R, C>).get(handlers::list_tasks::<R, C>),
        )
        .route("/tasks/summary", get(handlers::board_summary::<R, C>))
        .route("/tasks/reorder", post(handlers::reorder_task::<R, C>))
        .route("/tasks/compact", post(handlers::compact_bucket::<R, C>))
        .route(
            "/tasks/{id}",
            get(handlers::get_task::<R, C>)
                .patch(handlers::update_task::<R, C>)
                .delete(handlers::delete_task::<R, C>),
        )
        .with_state(state)
}
