use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::validator::Validator;

/// A todo record. Every todo belongs to exactly one user; all reads and
/// writes are scoped by `user_id` at the query layer.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Todo {
    pub id: i64,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub is_completed: bool,
    #[serde(skip_serializing)]
    pub user_id: i64,
}

pub fn validate_todo(v: &mut Validator, todo: &Todo) {
    v.check(!todo.title.is_empty(), "title", "must be provided");
    v.check(
        todo.title.chars().count() <= 500,
        "title",
        "must not be more than 500 characters long",
    );
}
