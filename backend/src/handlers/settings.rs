//! HTTP handlers for item settings, target weeks and suppliers

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::SupplierDefaults;

use crate::error::AppResult;
use crate::handlers::settings_service;
use crate::services::settings::{
    SettingsSnapshot, SuppliersResponse, UpdateSettingInput, UpdateSettingResponse,
    UpdateTargetWeeksInput,
};
use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetWeeksResponse {
    pub ok: bool,
    pub target_weeks: Decimal,
}

/// Get all item settings and the target weeks
pub async fn get_settings(State(state): State<AppState>) -> AppResult<Json<SettingsSnapshot>> {
    let snapshot = settings_service(&state).get_all().await?;
    Ok(Json(snapshot))
}

/// Update one field of one item's settings
pub async fn update_setting(
    State(state): State<AppState>,
    Json(input): Json<UpdateSettingInput>,
) -> AppResult<Json<UpdateSettingResponse>> {
    let updated = settings_service(&state).update_field(input).await?;
    Ok(Json(updated))
}

/// Set the weeks of cover to order for
pub async fn update_target_weeks(
    State(state): State<AppState>,
    Json(input): Json<UpdateTargetWeeksInput>,
) -> AppResult<Json<TargetWeeksResponse>> {
    let target_weeks = settings_service(&state)
        .set_target_weeks(input.target_weeks)
        .await?;
    Ok(Json(TargetWeeksResponse {
        ok: true,
        target_weeks,
    }))
}

/// Get the supplier defaults
pub async fn get_suppliers(State(state): State<AppState>) -> AppResult<Json<SuppliersResponse>> {
    let suppliers = settings_service(&state).get_suppliers().await?;
    Ok(Json(suppliers))
}

/// Replace the supplier defaults
pub async fn update_suppliers(
    State(state): State<AppState>,
    Json(input): Json<SupplierDefaults>,
) -> AppResult<Json<SuppliersResponse>> {
    let suppliers = settings_service(&state).set_suppliers(input).await?;
    Ok(Json(suppliers))
}
