//! Reorder calculation
//!
//! Turns one item's sales and stock figures into a target stock, an order
//! quantity and a priority. Spirit-class items are counted and sold in nips:
//! their target and shortfall stay in nips and are converted to whole
//! bottles only at the end. Everything else works in units and is rounded up
//! to whole cases.
//!
//! All "needed" and "to order" quantities round up. `nips_per_bottle` is
//! rounded to one decimal before it is reused, which keeps the figures
//! identical to previously printed order sheets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::inference::{infer_category, infer_pack, infer_supplier};
use crate::models::{CalculatedItem, ItemSettings, Priority, RawItem, SupplierDefaults};
use crate::types::{div_or_one, round_dp};

/// Weeks of cover aimed for when the operator has not set one
pub const DEFAULT_TARGET_WEEKS: u32 = 6;

/// Standard spirit bottle size (mL)
pub const DEFAULT_BOTTLE_ML: u32 = 700;

/// Standard nip size (mL)
pub const DEFAULT_NIP_ML: u32 = 30;

/// Items with this many weeks of cover or fewer are critical
pub const CRITICAL_WEEKS_LEFT: u32 = 2;

/// Run-wide inputs shared by every item in one calculation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderContext {
    /// Desired weeks of cover, always positive
    pub target_weeks: Decimal,
    pub suppliers: SupplierDefaults,
}

impl ReorderContext {
    /// Non-positive target weeks fall back to the default
    pub fn new(target_weeks: Decimal, suppliers: SupplierDefaults) -> Self {
        let target_weeks = if target_weeks > Decimal::ZERO {
            target_weeks
        } else {
            Decimal::from(DEFAULT_TARGET_WEEKS)
        };
        Self {
            target_weeks,
            suppliers,
        }
    }
}

impl Default for ReorderContext {
    fn default() -> Self {
        Self::new(Decimal::from(DEFAULT_TARGET_WEEKS), SupplierDefaults::default())
    }
}

/// Calculate the reorder recommendation for one item.
///
/// `item.on_hand` must already carry any stock override, and `weekly_avg`
/// must be in nips for spirit-class items.
pub fn calculate_item(item: &RawItem, settings: &ItemSettings, ctx: &ReorderContext) -> CalculatedItem {
    let category = settings
        .category
        .unwrap_or_else(|| infer_category(&item.name));
    let supplier = settings
        .supplier
        .clone()
        .unwrap_or_else(|| infer_supplier(category, &ctx.suppliers));
    let pack = settings
        .pack
        .filter(|p| *p > 0)
        .unwrap_or_else(|| infer_pack(category));

    let is_spirit = category.is_spirit_class();

    let bottle_ml = settings
        .bottle_ml
        .or_else(|| is_spirit.then(|| Decimal::from(DEFAULT_BOTTLE_ML)));
    let nip_ml = settings
        .nip_ml
        .or_else(|| is_spirit.then(|| Decimal::from(DEFAULT_NIP_ML)));

    let weekly_avg = item.weekly_avg;

    let nips_per_bottle = match (is_spirit, bottle_ml, nip_ml) {
        (true, Some(bottle), Some(nip)) => bottle
            .checked_div(nip)
            .map(|n| round_dp(n, 1))
            .filter(|n| !n.is_zero()),
        _ => None,
    };

    let weekly_avg_ordering = match nips_per_bottle {
        Some(nips) => weekly_avg
            .checked_div(nips)
            .map(|w| round_dp(w, 2))
            .unwrap_or(weekly_avg),
        None => weekly_avg,
    };

    let target_stock = if is_spirit {
        (weekly_avg * ctx.target_weeks).ceil()
    } else {
        (weekly_avg_ordering * ctx.target_weeks).ceil()
    };
    let current_stock = item.on_hand;

    // Nips for spirit-class items, units otherwise
    let shortfall = (target_stock - current_stock).max(Decimal::ZERO);

    let nips_to_order = (is_spirit && shortfall > Decimal::ZERO).then_some(shortfall);
    let bottles_to_order = match (nips_to_order, nips_per_bottle) {
        (Some(nips), Some(per_bottle)) => nips.checked_div(per_bottle).map(|b| b.ceil()),
        _ => None,
    };

    let order_qty = if is_spirit {
        nips_to_order.unwrap_or(Decimal::ZERO)
    } else if shortfall.is_zero() {
        Decimal::ZERO
    } else {
        let pack = Decimal::from(pack);
        (shortfall / pack).ceil() * pack
    };

    let priority = if order_qty > Decimal::ZERO {
        let sales_rate = if is_spirit { weekly_avg } else { weekly_avg_ordering };
        let weeks_left = div_or_one(current_stock, sales_rate);
        if weeks_left <= Decimal::from(CRITICAL_WEEKS_LEFT) {
            Priority::Critical
        } else {
            Priority::Low
        }
    } else {
        Priority::Ok
    };

    CalculatedItem {
        item: item.clone(),
        category,
        supplier,
        pack,
        bottle_ml,
        nip_ml,
        nips_per_bottle,
        weekly_avg_ordering: round_dp(weekly_avg_ordering, 2),
        target_stock,
        current_stock: round_dp(current_stock, 1),
        units_needed: shortfall,
        order_qty,
        nips_to_order,
        bottles_to_order,
        priority,
    }
}
