// Route definitions

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::session::Session;

mod admin;
mod api;

// Router state. Writers take the lock for the whole mutation, so readers only see completed changes
pub type SharedSession = Arc<RwLock<Session>>;

pub fn create_router(session: SharedSession) -> Router {
    let api_router = Router::new()
        .route("/catalog/facets", get(api::get_facets))
        .route("/catalog/featured", get(api::get_featured))
        .route("/vehicles/:id", get(api::get_vehicle))
        .route("/inventory", get(api::get_inventory))
        .route("/inventory/filters", post(api::set_filter))
        .route("/inventory/filters/reset", post(api::reset_filters))
        .route("/inventory/sort", put(api::set_sort_mode))
        .route("/inventory/location", put(api::set_location))
        .route(
            "/compare",
            get(api::get_compare).post(api::add_to_compare).delete(api::clear_compare),
        )
        .route("/compare/:id", delete(api::remove_from_compare))
        // Read-only admin views; add/edit/delete are not offered
        .route("/admin/dashboard", get(admin::get_dashboard))
        .route("/admin/inventory", get(admin::search_inventory));

    Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
        .with_state(session)
}
