use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::middleware::require_auth;

pub fn app() -> Router {
    Router::new()
        .merge(public_routes())
        .merge(todo_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router {
    Router::new()
        .route("/v1/healthcheck", get(handlers::healthcheck::healthcheck))
        .route("/v1/users", post(handlers::users::register_user))
        .route("/v1/auth/sign-in", post(handlers::tokens::sign_in))
}

fn todo_routes() -> Router {
    use handlers::todos;

    Router::new()
        .route("/v1/todos", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/v1/todos/:id",
            put(todos::update_todo).delete(todos::delete_todo),
        )
        .route_layer(from_fn(require_auth))
}
