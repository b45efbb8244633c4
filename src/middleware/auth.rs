use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::token::validate_token_plaintext;
use crate::database::manager::{self, DatabaseError};
use crate::database::models::User;
use crate::database::tokens::TokenStore;
use crate::error::ApiError;
use crate::validator::Validator;

/// Authenticated user resolved from the bearer token, injected into the
/// request extensions for downstream handlers.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Bearer-token gate for protected routes.
///
/// Exactly one storage lookup per request; syntactically broken headers
/// short-circuit before it. Missing header, wrong scheme, and unknown or
/// expired token all produce the same 401 so the response leaks nothing
/// about which case applied. Every response through this gate carries
/// `Vary: Authorization` so caches never conflate authenticated and
/// unauthenticated bodies for the same URL.
pub async fn require_auth(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let auth_result = authenticate(&parts).await;
    let mut request = Request::from_parts(parts, body);

    let mut response = match auth_result {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(err) => err.into_response(),
    };

    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Authorization"));

    response
}

async fn authenticate(request: &axum::http::request::Parts) -> Result<User, ApiError> {
    let header_value = request
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::InvalidAuthenticationToken)?
        .to_str()
        .map_err(|_| ApiError::InvalidAuthenticationToken)?;

    // Exactly two space-separated parts, the first the literal scheme
    let parts: Vec<&str> = header_value.split(' ').collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(ApiError::InvalidAuthenticationToken);
    }

    let plaintext = parts[1];

    let mut v = Validator::new();
    validate_token_plaintext(&mut v, plaintext);
    if !v.is_valid() {
        return Err(ApiError::InvalidAuthenticationToken);
    }

    let pool = manager::pool().map_err(|e| {
        tracing::error!(
            method = %request.method,
            uri = %request.uri,
            error = %e,
            "auth middleware could not reach storage"
        );
        ApiError::Internal
    })?;

    match TokenStore::new(pool).get_for_token(plaintext).await {
        Ok(user) => Ok(user),
        Err(DatabaseError::NotFound) => Err(ApiError::InvalidAuthenticationToken),
        Err(e) => {
            tracing::error!(
                method = %request.method,
                uri = %request.uri,
                error = %e,
                "token lookup failed"
            );
            Err(ApiError::Internal)
        }
    }
}
