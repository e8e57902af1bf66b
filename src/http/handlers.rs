//! Request handlers for the task endpoints.

use super::{
    AppState,
    auth::Caller,
    dto::{
        CompactBody, CreateTaskBody, DeletedBody, ListParams, ReorderBody, TaskView, TasksBody,
        UpdateTaskBody,
    },
    error::ApiError,
};
use crate::task::{
    domain::{TaskFilter, TaskId},
    ports::TaskRepository,
    services::ColumnSummary,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use mockable::Clock;

type ApiResult<T> = Result<T, ApiError>;

pub(super) async fn create_task<R, C>(
    State(state): State<AppState<R, C>>,
    Caller(caller): Caller,
    payload: Result<Json<CreateTaskBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskView>)>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(body) = payload?;
    let task = state.service.create(caller, body.into()).await?;
    Ok((StatusCode::CREATED, Json(TaskView::from(&task))))
}

pub(super) async fn list_tasks<R, C>(
    State(state): State<AppState<R, C>>,
    Caller(caller): Caller,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<TaskView>>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Query(raw) = params?;
    let filter = TaskFilter::try_from(raw)?;
    let tasks = state.service.list(caller, filter).await?;
    Ok(Json(tasks.iter().map(TaskView::from).collect()))
}

pub(super) async fn board_summary<R, C>(
    State(state): State<AppState<R, C>>,
    Caller(caller): Caller,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<ColumnSummary>>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Query(raw) = params?;
    let filter = TaskFilter::try_from(raw)?;
    Ok(Json(state.service.board_summary(caller, filter).await?))
}

pub(super) async fn get_task<R, C>(
    State(state): State<AppState<R, C>>,
    Caller(_caller): Caller,
    id: Result<Path<TaskId>, PathRejection>,
) -> ApiResult<Json<TaskView>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Path(task_id) = id?;
    let task = state.service.get(task_id).await?;
    Ok(Json(TaskView::from(&task)))
}

pub(super) async fn update_task<R, C>(
    State(state): State<AppState<R, C>>,
    Caller(caller): Caller,
    id: Result<Path<TaskId>, PathRejection>,
    payload: Result<Json<UpdateTaskBody>, JsonRejection>,
) -> ApiResult<Json<TaskView>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Path(task_id) = id?;
    let Json(body) = payload?;
    let task = state.service.update(task_id, caller, body.into()).await?;
    Ok(Json(TaskView::from(&task)))
}

pub(super) async fn delete_task<R, C>(
    State(state): State<AppState<R, C>>,
    Caller(caller): Caller,
    id: Result<Path<TaskId>, PathRejection>,
) -> ApiResult<Json<DeletedBody>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Path(task_id) = id?;
    let deleted = state.service.delete(task_id, caller).await?;
    Ok(Json(DeletedBody { id: deleted }))
}

pub(super) async fn reorder_task<R, C>(
    State(state): State<AppState<R, C>>,
    Caller(caller): Caller,
    payload: Result<Json<ReorderBody>, JsonRejection>,
) -> ApiResult<Json<TasksBody>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(body) = payload?;
    let tasks = state.service.reorder(caller, body.into()).await?;
    Ok(Json(TasksBody::from_tasks(&tasks)))
}

pub(super) async fn compact_bucket<R, C>(
    State(state): State<AppState<R, C>>,
    Caller(caller): Caller,
    payload: Result<Json<CompactBody>, JsonRejection>,
) -> ApiResult<Json<TasksBody>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(body) = payload?;
    let tasks = state.service.compact(caller, body.status).await?;
    Ok(Json(TasksBody::from_tasks(&tasks)))
}
