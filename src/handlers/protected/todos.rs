// handlers/protected/todos.rs - /api/todos
use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::Value;

use crate::database::models::Todo;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidatedJson};
use crate::services::{CreateTodo, UpdateTodo};
use crate::state::AppState;

/// GET /api/todos
pub async fn todos_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<Todo>> {
    Ok(ApiResponse::success(state.todos.list(auth.id).await?))
}

/// POST /api/todos
pub async fn todos_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<CreateTodo>,
) -> ApiResult<Todo> {
    Ok(ApiResponse::created(state.todos.create(auth.id, input).await?))
}

/// GET /api/todos/:id
pub async fn todo_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Todo> {
    Ok(ApiResponse::success(state.todos.get_one(auth.id, &id).await?))
}

/// PUT /api/todos/:id
pub async fn todo_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateTodo>,
) -> ApiResult<Todo> {
    Ok(ApiResponse::success(state.todos.update(auth.id, &id, input).await?))
}

/// DELETE /api/todos/:id
pub async fn todo_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    state.todos.delete(auth.id, &id).await?;
    Ok(ApiResponse::message("ToDo deleted successfully"))
}
