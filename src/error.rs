// HTTP API Error Types
use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::manager::DatabaseError;

/// HTTP API error with appropriate status codes and client-safe messages.
///
/// Authentication failures and backend errors are deliberately
/// low-information: the client is never told whether a token was expired,
/// never issued, or malformed, and storage errors never reach the response
/// body verbatim.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    InvalidAuthenticationToken,
    InvalidCredentials,

    // 404 Not Found (absent or not owned by the caller - same response)
    NotFound,

    // 409 Conflict (lost an update race)
    EditConflict,

    // 422 Unprocessable Entity (accumulated field errors)
    Validation(HashMap<String, String>),

    // 500 Internal Server Error (already logged when constructed)
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidAuthenticationToken => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::EditConflict => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body shape is always `{"error": <string | field-map>}`.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::BadRequest(msg) => json!({ "error": msg }),
            ApiError::InvalidAuthenticationToken => {
                json!({ "error": "invalid or missing authentication token" })
            }
            ApiError::InvalidCredentials => {
                json!({ "error": "invalid authentication credentials" })
            }
            ApiError::NotFound => {
                json!({ "error": "the requested resource could not be found" })
            }
            ApiError::EditConflict => {
                json!({ "error": "unable to update the record due to an edit conflict, please try again" })
            }
            ApiError::Validation(field_errors) => json!({ "error": field_errors }),
            ApiError::Internal => {
                json!({ "error": "the server encountered a problem and could not process your request" })
            }
        }
    }

    pub fn failed_validation(errors: HashMap<String, String>) -> Self {
        ApiError::Validation(errors)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }
}

// Body decode failures (bad syntax, wrong types, missing content-type) all
// surface as a 400 with the parser's message in the standard envelope.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound => ApiError::NotFound,
            DatabaseError::EditConflict => ApiError::EditConflict,
            DatabaseError::DuplicateEmail => {
                let mut errors = HashMap::new();
                errors.insert(
                    "email".to_string(),
                    "a user with this email address already exists".to_string(),
                );
                ApiError::Validation(errors)
            }
            other => {
                // Log the real error but return a generic message
                tracing::error!(error = %other, "database error");
                ApiError::Internal
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let mut response = (status, Json(self.to_json())).into_response();

        // Tell clients which scheme we expect on 401s
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}
