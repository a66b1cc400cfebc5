use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::dto::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::validate_category_name;
use crate::types::Category;

pub async fn list_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let categories = state
        .store
        .list_categories()
        .api_err("Failed to list categories")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(categories)))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    validate_category_name(&req.name)?;

    if store
        .get_category_by_name(&req.name)
        .api_err("Failed to check existing category")?
        .is_some()
    {
        return Err(ApiError::conflict("Category already exists"));
    }

    let category = store
        .create_category(&req.name)
        .api_err("Failed to create category")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(category))))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let category = state
        .store
        .get_category(id)
        .api_err("Failed to get category")?
        .or_not_found("Category not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(category)))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    validate_category_name(&req.name)?;

    if let Some(existing) = store
        .get_category_by_name(&req.name)
        .api_err("Failed to check category name")?
    {
        if existing.id != id {
            return Err(ApiError::conflict("Category name already exists"));
        }
    }

    let category = Category { id, name: req.name };
    let replaced = store
        .update_category(&category)
        .api_err("Failed to update category")?;
    if !replaced {
        return Err(ApiError::not_found("Category not found"));
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(category)))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    store
        .get_category(id)
        .api_err("Failed to get category")?
        .or_not_found("Category not found")?;

    // Referenced categories cannot be removed; the reference is
    // optional on apps but never left dangling by a delete.
    let app_count = store
        .count_category_apps(id)
        .api_err("Failed to check category apps")?;
    if app_count > 0 {
        return Err(ApiError::conflict(
            "Cannot delete category with existing apps",
        ));
    }

    store
        .delete_category(id)
        .api_err("Failed to delete category")?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
