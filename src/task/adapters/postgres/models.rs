//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Board column.
    pub status: String,
    /// Position within the owner's column.
    pub position: i32,
    /// Priority.
    pub priority: String,
    /// Optional planned start.
    pub start_at: Option<DateTime<Utc>>,
    /// Optional deadline.
    pub due_at: Option<DateTime<Utc>>,
    /// Checklist JSON payload.
    pub items: Value,
    /// Completion percentage.
    pub percent: i16,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and full-update model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Board column.
    pub status: String,
    /// Position within the owner's column.
    pub position: i32,
    /// Priority.
    pub priority: String,
    /// Optional planned start.
    pub start_at: Option<DateTime<Utc>>,
    /// Optional deadline.
    pub due_at: Option<DateTime<Utc>>,
    /// Checklist JSON payload.
    pub items: Value,
    /// Completion percentage.
    pub percent: i16,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
