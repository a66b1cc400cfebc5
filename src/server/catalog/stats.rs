use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::dto::{AppQuery, AverageRating, CategoryScope};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::store::{AppFilter, DateField, NumericField};

pub async fn rating_distribution(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AppQuery>,
) -> impl IntoResponse {
    let histogram = state
        .store
        .rating_histogram(&params.filter())
        .api_err("Failed to compute rating distribution")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(histogram)))
}

pub async fn release_trend(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CategoryScope>,
) -> impl IntoResponse {
    let trend = state
        .store
        .year_trend(&AppFilter::for_category(params.category), DateField::Released)
        .api_err("Failed to compute release trend")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(trend)))
}

pub async fn update_trend(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CategoryScope>,
) -> impl IntoResponse {
    let trend = state
        .store
        .year_trend(
            &AppFilter::for_category(params.category),
            DateField::LastUpdated,
        )
        .api_err("Failed to compute update trend")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(trend)))
}

/// Mean rating for one category (or the whole catalog). Unlike the
/// listing endpoints, this is a category detail lookup, so an unknown
/// name is a distinct miss rather than an empty result.
pub async fn average_rating(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CategoryScope>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    if let Some(ref name) = params.category {
        store
            .get_category_by_name(name)
            .api_err("Failed to check category")?
            .ok_or_else(|| ApiError::not_found("Category not found"))?;
    }

    let average_rating = store
        .average(
            &AppFilter::for_category(params.category.clone()),
            NumericField::Rating,
        )
        .api_err("Failed to compute average rating")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(AverageRating {
        category: params.category.unwrap_or_else(|| "All".to_string()),
        average_rating,
    })))
}
