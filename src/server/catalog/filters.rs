use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::server::AppState;
use crate::server::dto::FilterBounds;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::store::{NumericField, StringField};

/// One snapshot of everything a filter UI needs: the category and
/// content-rating vocabularies plus numeric bounds for range controls.
pub async fn get_filters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.as_ref();

    let categories = store
        .list_categories()
        .api_err("Failed to list categories")?
        .into_iter()
        .map(|c| c.name)
        .collect();

    let content_ratings = store
        .distinct_strings(StringField::ContentRating)
        .api_err("Failed to list content ratings")?;

    let (min_rating, max_rating) = store
        .extremes(NumericField::Rating)
        .api_err("Failed to compute rating bounds")?;
    let (min_price, max_price) = store
        .extremes(NumericField::Price)
        .api_err("Failed to compute price bounds")?;
    let (min_installs, max_installs) = store
        .extremes(NumericField::Installs)
        .api_err("Failed to compute install bounds")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(FilterBounds {
        categories,
        content_ratings,
        min_rating,
        max_rating,
        min_price,
        max_price,
        min_installs: min_installs as i64,
        max_installs: max_installs as i64,
    })))
}
