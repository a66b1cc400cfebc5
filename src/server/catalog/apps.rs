use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::dto::{AppPage, AppQuery, AppRequest};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::{validate_app_name, validate_pagination, validate_rating};
use crate::store::Store;

pub async fn list_apps(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AppQuery>,
) -> impl IntoResponse {
    let (page, per_page) = validate_pagination(params.page, params.per_page)?;
    let store = state.store.as_ref();
    let filter = params.filter();

    let total_apps = store.count_apps(&filter).api_err("Failed to count apps")?;
    let total_pages = (total_apps as u64).div_ceil(i64::from(per_page) as u64) as i64;

    // A page past the end is an empty page, not an error
    let offset = i64::from(page - 1) * i64::from(per_page);
    let apps = store
        .list_apps(&filter, i64::from(per_page), offset)
        .api_err("Failed to list apps")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(AppPage {
        apps,
        total_apps,
        total_pages,
        current_page: page,
    })))
}

/// Reject payloads whose optional category/developer references don't
/// resolve, before the insert trips the foreign-key constraint.
fn check_references(store: &dyn Store, req: &AppRequest) -> Result<(), ApiError> {
    if let Some(category_id) = req.category_id {
        store
            .get_category(category_id)
            .api_err("Failed to check category")?
            .ok_or_else(|| ApiError::bad_request("Referenced category does not exist"))?;
    }
    if let Some(developer_id) = req.developer_id {
        store
            .get_developer(developer_id)
            .api_err("Failed to check developer")?
            .ok_or_else(|| ApiError::bad_request("Referenced developer does not exist"))?;
    }
    Ok(())
}

pub async fn create_app(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AppRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    validate_app_name(&req.app_name)?;
    validate_rating(req.rating)?;
    if req.app_id.trim().is_empty() {
        return Err(ApiError::bad_request("app_id cannot be empty"));
    }
    check_references(store, &req)?;

    if store
        .get_app_by_app_id(&req.app_id)
        .api_err("Failed to check app id")?
        .is_some()
    {
        return Err(ApiError::conflict("App already exists"));
    }

    let app = store
        .create_app(&req.into_app(0))
        .api_err("Failed to create app")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(app))))
}

pub async fn get_app(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let app = state
        .store
        .get_app(id)
        .api_err("Failed to get app")?
        .or_not_found("App not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(app)))
}

pub async fn update_app(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<AppRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    validate_app_name(&req.app_name)?;
    validate_rating(req.rating)?;
    if req.app_id.trim().is_empty() {
        return Err(ApiError::bad_request("app_id cannot be empty"));
    }
    check_references(store, &req)?;

    if let Some(existing) = store
        .get_app_by_app_id(&req.app_id)
        .api_err("Failed to check app id")?
    {
        if existing.id != id {
            return Err(ApiError::conflict("App id already in use"));
        }
    }

    let app = req.into_app(id);
    let replaced = store.update_app(&app).api_err("Failed to update app")?;
    if !replaced {
        return Err(ApiError::not_found("App not found"));
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(app)))
}

pub async fn delete_app(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_app(id)
        .api_err("Failed to delete app")?;
    if !deleted {
        return Err(ApiError::not_found("App not found"));
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
