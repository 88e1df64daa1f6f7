//! HTTP handlers for supplier purchase orders

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::external::PurchaseOrders;
use crate::AppState;

/// List recent purchase orders raised in Square for the bar
pub async fn list_purchase_orders(State(state): State<AppState>) -> AppResult<Json<PurchaseOrders>> {
    let orders = state.square.search_purchase_orders().await?;
    Ok(Json(orders))
}
