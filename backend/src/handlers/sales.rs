//! HTTP handlers for sales reports

use axum::{
    extract::{Query, State},
    Json,
};
use shared::SalesReport;

use crate::error::AppResult;
use crate::handlers::settings_service;
use crate::services::sales::SalesQuery;
use crate::services::SalesService;
use crate::AppState;

/// Get units and revenue for a period, optionally against a comparison period
pub async fn get_sales_report(
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> AppResult<Json<SalesReport>> {
    let service = SalesService::new(
        state.square.clone(),
        settings_service(&state),
        state.config.venue.offset(),
    );
    let report = service.report(query).await?;
    Ok(Json(report))
}
