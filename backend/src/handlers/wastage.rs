//! HTTP handlers for the wastage log

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::handlers::Ack;
use crate::services::wastage::{RecordWastageInput, RecordedWastage, WastageLog};
use crate::services::WastageService;
use crate::AppState;

/// List wastage entries, newest first
pub async fn list_wastage(State(state): State<AppState>) -> AppResult<Json<WastageLog>> {
    let service = WastageService::new(state.db);
    let log = service.list().await?;
    Ok(Json(log))
}

/// Record stock written off
pub async fn record_wastage(
    State(state): State<AppState>,
    Json(input): Json<RecordWastageInput>,
) -> AppResult<Json<RecordedWastage>> {
    let service = WastageService::new(state.db);
    let recorded = service.record(input).await?;
    Ok(Json(recorded))
}

/// Delete a wastage entry
pub async fn delete_wastage(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Ack>> {
    let service = WastageService::new(state.db);
    service.delete(&id).await?;
    Ok(Json(Ack { ok: true }))
}
