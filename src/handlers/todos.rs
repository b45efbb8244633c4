use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::database::manager;
use crate::database::models::todo::{validate_todo, Todo};
use crate::database::todos::TodoStore;
use crate::error::ApiError;
use crate::filter::Filters;
use crate::middleware::CurrentUser;
use crate::validator::Validator;

/// Columns the list endpoint may sort by. Passed into validation as an
/// explicit allow-list so the query builder only ever sees checked values.
const SORT_SAFE_LIST: [&str; 3] = ["is_completed", "due_date", "created_at"];
const ORDER_SAFE_LIST: [&str; 2] = ["asc", "desc"];

#[derive(Debug, Deserialize)]
pub struct CreateTodoInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub is_completed: bool,
}

/// POST /v1/todos - create a todo owned by the authenticated user
pub async fn create_todo(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<CreateTodoInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;

    let mut todo = Todo {
        id: 0,
        created_at: Utc::now(),
        title: input.title,
        description: input.description,
        due_date: input.due_date,
        is_completed: input.is_completed,
        user_id: user.id,
    };

    let mut v = Validator::new();
    validate_todo(&mut v, &todo);
    if !v.is_valid() {
        return Err(ApiError::failed_validation(v.errors));
    }

    let store = TodoStore::new(manager::pool()?);
    store.insert(user.id, &mut todo).await?;

    let location = format!("/v1/todos/{}", todo.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(json!({ "todo": todo })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListTodosParams {
    pub search: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// GET /v1/todos - filtered, paginated, owner-scoped listing
pub async fn list_todos(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<ListTodosParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut v = Validator::new();

    let search = params.search.unwrap_or_default();
    let filters = Filters {
        page: read_int(&mut v, "page", params.page.as_deref(), 1),
        page_size: read_int(&mut v, "page_size", params.page_size.as_deref(), 10),
        sort: params.sort.unwrap_or_else(|| "created_at".to_string()),
        order: params.order.unwrap_or_else(|| "desc".to_string()),
        sort_safe_list: SORT_SAFE_LIST.to_vec(),
        order_safe_list: ORDER_SAFE_LIST.to_vec(),
    };

    filters.validate(&mut v);
    if !v.is_valid() {
        return Err(ApiError::failed_validation(v.errors));
    }

    let store = TodoStore::new(manager::pool()?);
    let (todos, metadata) = store.get_all(user.id, &search, &filters).await?;

    Ok(Json(json!({ "todos": todos, "metadata": metadata })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
}

/// PUT /v1/todos/:id - partial update; absent fields are left unchanged.
///
/// Read-before-update: a todo that is missing (or owned by someone else)
/// is a 404 here, while losing the subsequent conditional write is a 409.
pub async fn update_todo(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateTodoInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;

    let store = TodoStore::new(manager::pool()?);
    let mut todo = store.get(id, user.id).await?;

    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(description) = input.description {
        todo.description = description;
    }
    if let Some(due_date) = input.due_date {
        todo.due_date = due_date;
    }
    if let Some(is_completed) = input.is_completed {
        todo.is_completed = is_completed;
    }

    let mut v = Validator::new();
    validate_todo(&mut v, &todo);
    if !v.is_valid() {
        return Err(ApiError::failed_validation(v.errors));
    }

    store.update(&todo).await?;

    Ok(Json(json!({ "todo": todo })))
}

/// DELETE /v1/todos/:id
pub async fn delete_todo(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let store = TodoStore::new(manager::pool()?);
    store.delete(id, user.id).await?;

    Ok(Json(json!({ "message": "todo deleted successfully" })))
}

/// Parse an optional integer query parameter, accumulating a field error on
/// garbage input instead of failing the request outright.
fn read_int(v: &mut Validator, name: &str, value: Option<&str>, default: i64) -> i64 {
    match value {
        None => default,
        Some("") => default,
        Some(raw) => match raw.parse() {
            Ok(n) => n,
            Err(_) => {
                v.add_error(name, "must be an integer value");
                default
            }
        },
    }
}
