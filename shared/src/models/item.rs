//! Item records flowing through a reorder calculation pass

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Category;

/// A product as reported by the point-of-sale system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    /// Catalog item name, unique within one snapshot
    pub name: String,
    /// Current stock in the item's natural unit (nips for spirit-class items)
    #[serde(default)]
    pub on_hand: Decimal,
    /// Average sold per week over the trailing window, in the sales unit
    #[serde(default)]
    pub weekly_avg: Decimal,
    /// Total sold over the trailing window
    #[serde(default)]
    pub sold_last_n: Decimal,
    #[serde(default)]
    pub last_sold: Option<NaiveDate>,
    /// Catalog sell price in dollars
    #[serde(default)]
    pub square_sell_price: Option<Decimal>,
}

impl RawItem {
    pub fn new(name: impl Into<String>, on_hand: Decimal, weekly_avg: Decimal) -> Self {
        Self {
            name: name.into(),
            on_hand,
            weekly_avg,
            sold_last_n: Decimal::ZERO,
            last_sold: None,
            square_sell_price: None,
        }
    }
}

/// Reorder urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Ok,
    Low,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Ok => write!(f, "OK"),
            Priority::Low => write!(f, "LOW"),
            Priority::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Result of the reorder calculation for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedItem {
    #[serde(flatten)]
    pub item: RawItem,
    pub category: Category,
    pub supplier: String,
    pub pack: u32,
    #[serde(rename = "bottleML")]
    pub bottle_ml: Option<Decimal>,
    #[serde(rename = "nipML")]
    pub nip_ml: Option<Decimal>,
    pub nips_per_bottle: Option<Decimal>,
    /// Weekly average in ordering units (bottles for spirit-class items)
    pub weekly_avg_ordering: Decimal,
    /// Desired stock in the sales unit (nips for spirit-class items)
    pub target_stock: Decimal,
    pub current_stock: Decimal,
    pub units_needed: Decimal,
    pub order_qty: Decimal,
    pub nips_to_order: Option<Decimal>,
    pub bottles_to_order: Option<Decimal>,
    pub priority: Priority,
}

impl CalculatedItem {
    pub fn is_spirit_class(&self) -> bool {
        self.category.is_spirit_class()
    }

    /// Whether the row asks for anything to be ordered
    pub fn needs_order(&self) -> bool {
        self.order_qty > Decimal::ZERO
    }
}

/// A calculated item merged with the operator's free-form settings, as shown
/// on the order sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRow {
    #[serde(flatten)]
    pub calculated: CalculatedItem,
    pub stock_override: Option<Decimal>,
    pub notes: String,
    pub buy_price: Option<Decimal>,
    pub sell_price: Option<Decimal>,
}

impl ItemRow {
    pub fn name(&self) -> &str {
        &self.calculated.item.name
    }

    pub fn category(&self) -> Category {
        self.calculated.category
    }
}
