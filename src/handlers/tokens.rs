use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Duration;
use serde::Deserialize;
use serde_json::json;

use crate::auth::password::{validate_password_plaintext, verify_password};
use crate::auth::SCOPE_AUTHENTICATION;
use crate::config;
use crate::database::manager::{self, DatabaseError};
use crate::database::models::user::validate_email;
use crate::database::tokens::TokenStore;
use crate::database::users::UserStore;
use crate::error::ApiError;
use crate::validator::Validator;

#[derive(Debug, Deserialize)]
pub struct SignInInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /v1/auth/sign-in - verify credentials and issue an opaque bearer
/// token. Unknown email and wrong password produce the same 401.
pub async fn sign_in(
    payload: Result<Json<SignInInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;

    let mut v = Validator::new();
    validate_email(&mut v, &input.email);
    validate_password_plaintext(&mut v, &input.password);
    if !v.is_valid() {
        return Err(ApiError::failed_validation(v.errors));
    }

    let pool = manager::pool()?;

    let user = match UserStore::new(pool.clone()).get_by_email(&input.email).await {
        Ok(user) => user,
        Err(DatabaseError::NotFound) => return Err(ApiError::InvalidCredentials),
        Err(other) => return Err(other.into()),
    };

    let matched = verify_password(&input.password, &user.password_hash).map_err(|e| {
        tracing::error!(error = %e, "password verification failed");
        ApiError::Internal
    })?;

    if !matched {
        return Err(ApiError::InvalidCredentials);
    }

    let ttl = Duration::hours(config::config().auth.token_ttl_hours as i64);
    let token = TokenStore::new(pool)
        .create(user.id, ttl, SCOPE_AUTHENTICATION)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "authentication_token": token })),
    ))
}
