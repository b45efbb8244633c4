use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::manager::{with_deadline, DatabaseError};
use crate::database::models::User;

pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, user: &mut User) -> Result<(), DatabaseError> {
        let query = "\
            INSERT INTO users (name, email, password_hash) \
            VALUES ($1, $2, $3) \
            RETURNING id, created_at";

        let result = with_deadline(
            sqlx::query_as::<_, (i64, DateTime<Utc>)>(query)
                .bind(&user.name)
                .bind(&user.email)
                .bind(&user.password_hash)
                .fetch_one(&self.pool),
        )
        .await;

        match result {
            Ok((id, created_at)) => {
                user.id = id;
                user.created_at = created_at;
                Ok(())
            }
            Err(DatabaseError::Sqlx(sqlx::Error::Database(db_err)))
                if db_err.is_unique_violation() =>
            {
                Err(DatabaseError::DuplicateEmail)
            }
            Err(other) => Err(other),
        }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, DatabaseError> {
        let query = "\
            SELECT id, created_at, name, email, password_hash \
            FROM users \
            WHERE email = $1";

        let result = with_deadline(
            sqlx::query_as::<_, User>(query)
                .bind(email)
                .fetch_one(&self.pool),
        )
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound)) => Err(DatabaseError::NotFound),
            Err(other) => Err(other),
        }
    }
}
