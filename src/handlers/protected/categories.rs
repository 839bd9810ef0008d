// handlers/protected/categories.rs - /api/categories
use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::Value;

use crate::database::models::Category;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidatedJson};
use crate::services::{CreateCategory, UpdateCategory};
use crate::state::AppState;

/// GET /api/categories
pub async fn categories_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<Category>> {
    Ok(ApiResponse::success(state.categories.list(auth.id).await?))
}

/// POST /api/categories
pub async fn categories_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> ApiResult<Category> {
    Ok(ApiResponse::created(state.categories.create(auth.id, input).await?))
}

/// GET /api/categories/:id
pub async fn category_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Category> {
    Ok(ApiResponse::success(state.categories.get_one(auth.id, &id).await?))
}

/// PUT /api/categories/:id
pub async fn category_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> ApiResult<Category> {
    Ok(ApiResponse::success(state.categories.update(auth.id, &id, input).await?))
}

/// DELETE /api/categories/:id
///
/// The category's todos go with it.
pub async fn category_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    state.categories.delete(auth.id, &id).await?;
    Ok(ApiResponse::message("Category deleted"))
}
