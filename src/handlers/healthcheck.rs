use axum::response::Json;
use serde_json::{json, Value};

use crate::config;

/// GET /v1/healthcheck - liveness probe, no auth, no storage round-trip
pub async fn healthcheck() -> Json<Value> {
    Json(json!({
        "status": "available",
        "system_info": {
            "environment": config::config().environment.to_string(),
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}
