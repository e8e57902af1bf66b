//! `PostgreSQL` repository implementation for task board storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        BucketKey, ChecklistItem, OwnerFilter, Percent, PersistedTaskData, Placement, Task,
        TaskDescription, TaskId, TaskOrder, TaskPriority, TaskQuery, TaskStatus, TaskTitle,
        UserId, sort_for_display,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Record writes and their neighbour shifts run inside one transaction.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let lookup = query.clone();
        self.run_blocking(move |connection| {
            let mut statement = tasks::table.select(TaskRow::as_select()).into_boxed();
            match lookup.owner {
                OwnerFilter::Any => {}
                OwnerFilter::Only(owner) => {
                    statement = statement.filter(tasks::owner_id.eq(owner.into_inner()));
                }
                OwnerFilter::Except(owner) => {
                    statement = statement.filter(tasks::owner_id.ne(owner.into_inner()));
                }
            }
            if let Some(status) = lookup.status {
                statement = statement.filter(tasks::status.eq(status.as_str()));
            }
            if let Some(priority) = lookup.priority {
                statement = statement.filter(tasks::priority.eq(priority.as_str()));
            }

            let rows = statement
                .order_by((tasks::status.asc(), tasks::position.asc()))
                .load::<TaskRow>(connection)?;

            // Text and date-window criteria use the domain predicate so both
            // adapters agree on matching rules.
            let mut found = Vec::with_capacity(rows.len());
            for row in rows {
                let task = row_to_task(row)?;
                if lookup.matches(&task) {
                    found.push(task);
                }
            }
            sort_for_display(&mut found);
            Ok(found)
        })
        .await
    }

    async fn find_bucket(&self, bucket: BucketKey) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner_id.eq(bucket.owner().into_inner()))
                .filter(tasks::status.eq(bucket.status().as_str()))
                .order_by((tasks::position.asc(), tasks::created_at.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn save_with_placements(
        &self,
        task: &Task,
        placements: &[Placement],
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task)?;
        let shifts = placements.to_vec();

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                    .set(&row)
                    .execute(tx)?;
                if updated == 0 {
                    return Err(TaskRepositoryError::NotFound(task_id));
                }
                apply_shifts(tx, &shifts, at)
            })
        })
        .await
    }

    async fn apply_placements(
        &self,
        placements: &[Placement],
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()> {
        let shifts = placements.to_vec();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| apply_shifts(tx, &shifts, at))
        })
        .await
    }

    async fn delete_with_placements(
        &self,
        id: TaskId,
        placements: &[Placement],
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()> {
        let shifts = placements.to_vec();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let deleted = diesel::delete(tasks::table.find(id.into_inner())).execute(tx)?;
                if deleted == 0 {
                    return Err(TaskRepositoryError::NotFound(id));
                }
                apply_shifts(tx, &shifts, at)
            })
        })
        .await
    }
}

fn apply_shifts(
    connection: &mut PgConnection,
    placements: &[Placement],
    at: DateTime<Utc>,
) -> TaskRepositoryResult<()> {
    for placement in placements {
        let position = order_to_column(placement.order())?;
        let updated = diesel::update(tasks::table.find(placement.task_id().into_inner()))
            .set((tasks::position.eq(position), tasks::updated_at.eq(at)))
            .execute(connection)?;
        if updated == 0 {
            return Err(TaskRepositoryError::NotFound(placement.task_id()));
        }
    }
    Ok(())
}

fn order_to_column(order: TaskOrder) -> TaskRepositoryResult<i32> {
    i32::try_from(order.value()).map_err(TaskRepositoryError::persistence)
}

fn to_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let items = serde_json::to_value(task.items()).map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        owner_id: task.owner().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(|text| text.as_str().to_owned()),
        status: task.status().as_str().to_owned(),
        position: order_to_column(task.order())?,
        priority: task.priority().as_str().to_owned(),
        start_at: task.start_at(),
        due_at: task.due_at(),
        items,
        percent: i16::from(task.percent().value()),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        owner_id,
        title: persisted_title,
        description: persisted_description,
        status: persisted_status,
        position,
        priority: persisted_priority,
        start_at,
        due_at,
        items: persisted_items,
        percent: persisted_percent,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let description = persisted_description
        .map(TaskDescription::new)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let order = u32::try_from(position)
        .map(TaskOrder::new)
        .map_err(TaskRepositoryError::persistence)?;
    let items = serde_json::from_value::<Vec<ChecklistItem>>(persisted_items)
        .map_err(TaskRepositoryError::persistence)?;
    let percent =
        Percent::new(i64::from(persisted_percent)).map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner: UserId::from_uuid(owner_id),
        title,
        description,
        status,
        order,
        priority,
        start_at,
        due_at,
        items,
        percent,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
