// Router-level tests driven through tower's oneshot, covering everything
// that resolves before a storage round-trip: the healthcheck, the auth
// middleware's syntactic short-circuits, and handler-side validation.

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_api::routes;

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn healthcheck_is_available_without_auth() -> Result<()> {
    let response = routes::app()
        .oneshot(Request::builder().uri("/v1/healthcheck").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    let payload = body_json(response).await?;
    assert_eq!(payload["status"], "available");
    assert!(payload["system_info"]["version"].is_string());
    Ok(())
}

#[tokio::test]
async fn missing_authorization_header_is_rejected() -> Result<()> {
    let response = routes::app()
        .oneshot(Request::builder().uri("/v1/todos").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::VARY).map(|v| v.as_bytes()),
        Some(&b"Authorization"[..])
    );
    assert_eq!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .map(|v| v.as_bytes()),
        Some(&b"Bearer"[..])
    );

    let payload = body_json(response).await?;
    assert_eq!(payload["error"], "invalid or missing authentication token");
    Ok(())
}

#[tokio::test]
async fn malformed_authorization_headers_are_rejected_identically() -> Result<()> {
    // Wrong scheme, missing token, empty token, extra parts: all must
    // produce the same generic 401 with no hint of which case applied.
    for value in ["Token abc123", "Bearer", "Bearer ", "Bearer abc 123", "bearer abc123"] {
        let response = routes::app()
            .oneshot(
                Request::builder()
                    .uri("/v1/todos")
                    .header(header::AUTHORIZATION, value)
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "header {value:?} should be rejected"
        );

        let payload = body_json(response).await?;
        assert_eq!(payload["error"], "invalid or missing authentication token");
    }
    Ok(())
}

#[tokio::test]
async fn rejections_carry_vary_authorization() -> Result<()> {
    for (method, uri) in [
        ("GET", "/v1/todos"),
        ("POST", "/v1/todos"),
        ("PUT", "/v1/todos/1"),
        ("DELETE", "/v1/todos/1"),
    ] {
        let response = routes::app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(
            response.headers().get(header::VARY).map(|v| v.as_bytes()),
            Some(&b"Authorization"[..]),
            "{method} {uri} missing Vary header"
        );
    }
    Ok(())
}

#[tokio::test]
async fn register_reports_every_field_error_at_once() -> Result<()> {
    let body = json!({
        "name": "",
        "email": "not-an-email",
        "password": "short"
    });

    let response = routes::app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let payload = body_json(response).await?;
    assert_eq!(payload["error"]["name"], "must be provided");
    assert_eq!(payload["error"]["email"], "must be a valid email address");
    assert_eq!(
        payload["error"]["password"],
        "must be at least 8 characters long"
    );
    Ok(())
}

#[tokio::test]
async fn malformed_json_bodies_get_the_error_envelope() -> Result<()> {
    let response = routes::app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Same envelope shape as every other error, message from the parser
    let payload = body_json(response).await?;
    assert!(payload["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn missing_json_content_type_is_a_bad_request() -> Result<()> {
    let response = routes::app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/users")
                .body(Body::from(r#"{"name":"Alice"}"#))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let payload = body_json(response).await?;
    assert!(payload["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn sign_in_validates_input_before_any_lookup() -> Result<()> {
    let body = json!({ "email": "", "password": "" });

    let response = routes::app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/auth/sign-in")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
        )
        .await?;

    // 422 with accumulated errors, not 401: the credentials were never
    // syntactically plausible enough to check.
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let payload = body_json(response).await?;
    assert_eq!(payload["error"]["email"], "must be provided");
    assert_eq!(payload["error"]["password"], "must be provided");
    Ok(())
}

#[tokio::test]
async fn unknown_routes_are_not_found() -> Result<()> {
    let response = routes::app()
        .oneshot(Request::builder().uri("/v1/nothing-here").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}
