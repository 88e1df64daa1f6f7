//! Route definitions for the Bar Reorder Planner

use axum::{
    routing::{delete, get, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/items", get(handlers::list_items))
        .nest("/settings", settings_routes())
        .route(
            "/suppliers",
            get(handlers::get_suppliers).put(handlers::update_suppliers),
        )
        .route("/sales", get(handlers::get_sales_report))
        .route("/purchase-orders", get(handlers::list_purchase_orders))
        .nest("/wastage", wastage_routes())
        .nest("/notes", notes_routes())
}

/// Item settings routes
fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_settings).put(handlers::update_setting))
        .route("/target-weeks", put(handlers::update_target_weeks))
}

/// Wastage log routes
fn wastage_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_wastage).post(handlers::record_wastage))
        .route("/:id", delete(handlers::delete_wastage))
}

/// Bar notes routes
fn notes_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_notes).post(handlers::add_note))
        .route("/:id", delete(handlers::delete_note))
}
