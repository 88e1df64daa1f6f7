//! HTTP handlers for the order sheet

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::AppResult;
use crate::handlers::settings_service;
use crate::services::items::{ItemsQuery, ItemsResponse};
use crate::services::ItemsService;
use crate::AppState;

/// Get every bar item with its reorder recommendation
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemsQuery>,
) -> AppResult<Json<ItemsResponse>> {
    let service = ItemsService::new(
        state.square.clone(),
        settings_service(&state),
        state.config.square.default_days_back,
    );
    let items = service.list_items(query).await?;
    Ok(Json(items))
}
