//! Items service building the order sheet from POS stock and settings

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{build_item_rows, validate_days_back, ItemRow};

use crate::error::{AppError, AppResult};
use crate::external::SquareClient;
use crate::services::SettingsService;

/// Items service for the reorder sheet
#[derive(Clone)]
pub struct ItemsService {
    square: SquareClient,
    settings: SettingsService,
    default_days_back: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemsQuery {
    pub days: Option<u32>,
}

/// The order sheet
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsResponse {
    pub items: Vec<ItemRow>,
    pub target_weeks: Decimal,
    pub suppliers: Vec<String>,
    pub days_back: u32,
    pub last_updated: DateTime<Utc>,
}

impl ItemsService {
    /// Create a new ItemsService
    pub fn new(square: SquareClient, settings: SettingsService, default_days_back: u32) -> Self {
        Self {
            square,
            settings,
            default_days_back,
        }
    }

    /// Fetch POS items and calculate what to order for each
    pub async fn list_items(&self, query: ItemsQuery) -> AppResult<ItemsResponse> {
        let days_back = query.days.unwrap_or(self.default_days_back);
        validate_days_back(days_back).map_err(|msg| AppError::Validation {
            field: "days".to_string(),
            message: msg.to_string(),
        })?;

        let raws = self.square.fetch_items(days_back).await?;
        let settings = self.settings.item_settings_or_default().await;
        let ctx = self.settings.reorder_context().await;

        let items = build_item_rows(&raws, &settings, &ctx);
        let to_order = items.iter().filter(|i| i.calculated.needs_order()).count();
        tracing::info!(
            "Calculated {} items over {} days, {} to order",
            items.len(),
            days_back,
            to_order
        );

        Ok(ItemsResponse {
            items,
            target_weeks: ctx.target_weeks,
            suppliers: ctx.suppliers.names(),
            days_back,
            last_updated: Utc::now(),
        })
    }
}
