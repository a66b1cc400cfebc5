use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::dto::{CreateDeveloperRequest, UpdateDeveloperRequest};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::{validate_developer_email, validate_developer_name};
use crate::types::Developer;

pub async fn list_developers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let developers = state
        .store
        .list_developers()
        .api_err("Failed to list developers")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(developers)))
}

pub async fn create_developer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDeveloperRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    validate_developer_name(&req.name)?;
    validate_developer_email(&req.email)?;

    if store
        .get_developer_by_email(&req.email)
        .api_err("Failed to check existing developer")?
        .is_some()
    {
        return Err(ApiError::conflict("Developer email already exists"));
    }

    let developer = store
        .create_developer(&req.name, &req.email)
        .api_err("Failed to create developer")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(developer))))
}

pub async fn get_developer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let developer = state
        .store
        .get_developer(id)
        .api_err("Failed to get developer")?
        .or_not_found("Developer not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(developer)))
}

pub async fn update_developer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDeveloperRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    validate_developer_name(&req.name)?;
    validate_developer_email(&req.email)?;

    if let Some(existing) = store
        .get_developer_by_email(&req.email)
        .api_err("Failed to check developer email")?
    {
        if existing.id != id {
            return Err(ApiError::conflict("Developer email already exists"));
        }
    }

    let developer = Developer {
        id,
        name: req.name,
        email: req.email,
    };
    let replaced = store
        .update_developer(&developer)
        .api_err("Failed to update developer")?;
    if !replaced {
        return Err(ApiError::not_found("Developer not found"));
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(developer)))
}

pub async fn delete_developer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    store
        .get_developer(id)
        .api_err("Failed to get developer")?
        .or_not_found("Developer not found")?;

    let app_count = store
        .count_developer_apps(id)
        .api_err("Failed to check developer apps")?;
    if app_count > 0 {
        return Err(ApiError::conflict(
            "Cannot delete developer with existing apps",
        ));
    }

    store
        .delete_developer(id)
        .api_err("Failed to delete developer")?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
