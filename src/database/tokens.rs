use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::auth::token::{hash_plaintext, Token};
use crate::database::manager::{with_deadline, DatabaseError};
use crate::database::models::User;

/// Lookup by digest with the expiry bound inline: a single indexed equality
/// check resolves the token, and "never issued" and "expired" are
/// indistinguishable to the caller by design.
const GET_FOR_TOKEN_QUERY: &str = "\
    SELECT users.id, users.created_at, users.name, users.email, users.password_hash \
    FROM users \
    INNER JOIN tokens ON users.id = tokens.user_id \
    WHERE tokens.hash = $1 \
    AND tokens.expiry > $2";

pub struct TokenStore {
    pool: PgPool,
}

impl TokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Issue a token for a user: generate the secret, persist only the hash.
    pub async fn create(
        &self,
        user_id: i64,
        ttl: Duration,
        scope: &str,
    ) -> Result<Token, DatabaseError> {
        let token = Token::generate(user_id, ttl, scope)
            .map_err(|e| DatabaseError::TokenGeneration(e.to_string()))?;

        self.insert(&token).await?;
        Ok(token)
    }

    pub async fn insert(&self, token: &Token) -> Result<(), DatabaseError> {
        let query = "\
            INSERT INTO tokens (hash, user_id, expiry, scope) \
            VALUES ($1, $2, $3, $4)";

        with_deadline(
            sqlx::query(query)
                .bind(&token.hash)
                .bind(token.user_id)
                .bind(token.expiry)
                .bind(&token.scope)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    /// Resolve a presented plaintext back to its user, enforcing expiry.
    pub async fn get_for_token(&self, plaintext: &str) -> Result<User, DatabaseError> {
        let hash = hash_plaintext(plaintext);

        let result = with_deadline(
            sqlx::query_as::<_, User>(GET_FOR_TOKEN_QUERY)
                .bind(&hash)
                .bind(Utc::now())
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
