mod apps;
mod categories;
mod developers;
mod filters;
mod stats;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::server::AppState;

pub fn catalog_router() -> Router<Arc<AppState>> {
    Router::new()
        // Filter bounds snapshot for range controls
        .route("/filters", get(filters::get_filters))
        // Filtered, paged listing and aggregations
        .route("/apps", get(apps::list_apps))
        .route("/apps/rating_distribution", get(stats::rating_distribution))
        .route("/apps/release_trend", get(stats::release_trend))
        .route("/apps/update_trend", get(stats::update_trend))
        .route("/apps/average_rating", get(stats::average_rating))
        // App CRUD
        .route("/apps", post(apps::create_app))
        .route("/apps/{id}", get(apps::get_app))
        .route("/apps/{id}", put(apps::update_app))
        .route("/apps/{id}", delete(apps::delete_app))
        // Categories
        .route("/categories", get(categories::list_categories))
        .route("/categories", post(categories::create_category))
        .route("/categories/{id}", get(categories::get_category))
        .route("/categories/{id}", put(categories::update_category))
        .route("/categories/{id}", delete(categories::delete_category))
        // Developers
        .route("/developers", get(developers::list_developers))
        .route("/developers", post(developers::create_developer))
        .route("/developers/{id}", get(developers::get_developer))
        .route("/developers/{id}", put(developers::update_developer))
        .route("/developers/{id}", delete(developers::delete_developer))
}
