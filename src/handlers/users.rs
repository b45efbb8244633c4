use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::auth::password::{hash_password, validate_password_plaintext};
use crate::database::manager;
use crate::database::models::user::{validate_user, User};
use crate::database::users::UserStore;
use crate::error::ApiError;
use crate::validator::Validator;

#[derive(Debug, Deserialize)]
pub struct RegisterUserInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /v1/users - register a new account.
///
/// The password is hashed before validation runs so that every field error
/// (name, email, password rules) is accumulated and reported in one
/// response; the plaintext itself is never stored.
pub async fn register_user(
    payload: Result<Json<RegisterUserInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;

    let password_hash = hash_password(&input.password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        ApiError::Internal
    })?;

    let mut user = User {
        id: 0,
        created_at: Utc::now(),
        name: input.name,
        email: input.email,
        password_hash,
    };

    let mut v = Validator::new();
    validate_password_plaintext(&mut v, &input.password);
    validate_user(&mut v, &user);
    if !v.is_valid() {
        return Err(ApiError::failed_validation(v.errors));
    }

    let store = UserStore::new(manager::pool()?);
    store.insert(&mut user).await?;

    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}
