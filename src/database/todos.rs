use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::manager::{with_deadline, DatabaseError};
use crate::database::models::Todo;
use crate::filter::{Filters, Metadata};

/// Rows match when the search text hits the title or description tsvector,
/// or when the search text is empty (documented pass-through, matches all).
/// Every predicate is additionally scoped by owner: this is the
/// tenant-isolation invariant, enforced at the query layer so no listing
/// path can bypass it.
const SEARCH_PREDICATE: &str = "\
    user_id = $2 \
    AND ( \
        to_tsvector('simple', title) @@ plainto_tsquery('simple', $1) OR \
        to_tsvector('simple', description) @@ plainto_tsquery('simple', $1) OR \
        $1 = '' \
    )";

fn count_query() -> String {
    format!("SELECT count(*) FROM todos WHERE {SEARCH_PREDICATE}")
}

/// The only dynamic fragments are the sort column and direction, both
/// guaranteed safe by construction: `Filters::sort_column` panics on any
/// value that did not pass allow-list validation. Everything user-supplied
/// is a bound parameter. The `id ASC` tie-break keeps pagination stable
/// when the sort key has duplicate values.
fn page_query(sort_column: &str, sort_direction: &str) -> String {
    format!(
        "SELECT id, created_at, title, description, due_date, is_completed, user_id \
         FROM todos \
         WHERE {SEARCH_PREDICATE} \
         ORDER BY {sort_column} {sort_direction}, id ASC \
         LIMIT $3 OFFSET $4"
    )
}

pub struct TodoStore {
    pool: PgPool,
}

impl TodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, user_id: i64, todo: &mut Todo) -> Result<(), DatabaseError> {
        let query = "\
            INSERT INTO todos (user_id, title, description, due_date, is_completed) \
            VALUES ($1, $2, $3, $4, $5) \
            RETURNING id, created_at";

        let (id, created_at): (i64, DateTime<Utc>) = with_deadline(
            sqlx::query_as(query)
                .bind(user_id)
                .bind(&todo.title)
                .bind(&todo.description)
                .bind(todo.due_date)
                .bind(todo.is_completed)
                .fetch_one(&self.pool),
        )
        .await?;

        todo.id = id;
        todo.created_at = created_at;
        todo.user_id = user_id;
        Ok(())
    }

    pub async fn get(&self, id: i64, user_id: i64) -> Result<Todo, DatabaseError> {
        if id < 1 {
            return Err(DatabaseError::NotFound);
        }

        let query = "\
            SELECT id, created_at, title, description, due_date, is_completed, user_id \
            FROM todos \
            WHERE id = $1 AND user_id = $2";

        let result = with_deadline(
            sqlx::query_as::<_, Todo>(query)
                .bind(id)
                .bind(user_id)
                .fetch_one(&self.pool),
        )
        .await;

        match result {
            Ok(todo) => Ok(todo),
            Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound)) => Err(DatabaseError::NotFound),
            Err(other) => Err(other),
        }
    }

    /// Two-phase listing: a count over the owner's matching rows, then the
    /// page itself with identical predicate, ordered by the validated sort
    /// column/direction.
    pub async fn get_all(
        &self,
        user_id: i64,
        search: &str,
        filters: &Filters,
    ) -> Result<(Vec<Todo>, Metadata), DatabaseError> {
        let total_records: i64 = with_deadline(
            sqlx::query_scalar::<_, i64>(&count_query())
                .bind(search)
                .bind(user_id)
                .fetch_one(&self.pool),
        )
        .await?;

        let query = page_query(filters.sort_column(), filters.sort_direction());

        let todos = with_deadline(
            sqlx::query_as::<_, Todo>(&query)
                .bind(search)
                .bind(user_id)
                .bind(filters.limit())
                .bind(filters.offset())
                .fetch_all(&self.pool),
        )
        .await?;

        let metadata = Metadata::calculate(total_records, filters.page, filters.page_size);
        Ok((todos, metadata))
    }

    /// Conditional on `id AND user_id`: zero rows affected means the row was
    /// deleted, never existed, or belongs to a different owner. That is an
    /// edit conflict, distinct from the read-before-update NotFound, so a
    /// client that lost an update race gets a retryable signal.
    pub async fn update(&self, todo: &Todo) -> Result<(), DatabaseError> {
        let query = "\
            UPDATE todos \
            SET title = $1, description = $2, due_date = $3, is_completed = $4 \
            WHERE id = $5 AND user_id = $6 \
            RETURNING id";

        let result = with_deadline(
            sqlx::query_scalar::<_, i64>(query)
                .bind(&todo.title)
                .bind(&todo.description)
                .bind(todo.due_date)
                .bind(todo.is_completed)
                .bind(todo.id)
                .bind(todo.user_id)
                .fetch_one(&self.pool),
        )
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound)) => Err(DatabaseError::EditConflict),
            Err(other) => Err(other),
        }
    }

    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), DatabaseError> {
        if id < 1 {
            return Err(DatabaseError::NotFound);
        }

        let query = "DELETE FROM todos WHERE id = $1 AND user_id = $2";

        let result = with_deadline(
            sqlx::query(query)
                .bind(id)
                .bind(user_id)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validator;

    fn filters(sort: &str, order: &str) -> Filters {
        Filters {
            page: 1,
            page_size: 10,
            sort: sort.to_string(),
            order: order.to_string(),
            sort_safe_list: vec!["is_completed", "due_date", "created_at"],
            order_safe_list: vec!["asc", "desc"],
        }
    }

    #[test]
    fn every_query_is_owner_scoped() {
        assert!(count_query().contains("user_id = $2"));
        assert!(page_query("created_at", "DESC").contains("user_id = $2"));
    }

    #[test]
    fn empty_search_is_a_pass_through() {
        assert!(count_query().contains("$1 = ''"));
    }

    #[test]
    fn page_query_orders_with_id_tie_break() {
        let f = filters("due_date", "asc");
        let mut v = Validator::new();
        f.validate(&mut v);
        assert!(v.is_valid());

        let query = page_query(f.sort_column(), f.sort_direction());
        assert!(query.contains("ORDER BY due_date ASC, id ASC"));
        assert!(query.contains("LIMIT $3 OFFSET $4"));
    }

    #[test]
    #[should_panic(expected = "unsafe sort parameter")]
    fn unvalidated_sort_never_reaches_sql() {
        let f = filters("1; DROP TABLE todos", "asc");
        // Building the page query from an unvalidated filter is fatal
        page_query(f.sort_column(), f.sort_direction());
    }
}
