//! Sales report models

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Category;

/// Units and gross revenue sold for one item over a period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoldTotals {
    pub units: Decimal,
    /// Gross sales in dollars, when the POS reported any
    pub revenue: Option<Decimal>,
}

/// One item in a sales report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesLine {
    pub name: String,
    pub category: Category,
    pub units_sold: Decimal,
    pub prev_sold: Decimal,
    /// Percent change against the comparison period
    pub change: Option<Decimal>,
    pub revenue: Option<Decimal>,
    pub prev_rev: Option<Decimal>,
    pub sell_price: Option<Decimal>,
}

/// Summed figures for a category or the whole report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotals {
    pub units_sold: Decimal,
    pub prev_sold: Decimal,
    pub revenue: Decimal,
    pub prev_rev: Decimal,
}

impl SalesTotals {
    pub fn add(&mut self, line: &SalesLine) {
        self.units_sold += line.units_sold;
        self.prev_sold += line.prev_sold;
        self.revenue += line.revenue.unwrap_or_default();
        self.prev_rev += line.prev_rev.unwrap_or_default();
    }
}

/// Sales for a period, optionally compared against an earlier one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub items: Vec<SalesLine>,
    pub categories: BTreeMap<Category, SalesTotals>,
    pub totals: SalesTotals,
    pub has_compare: bool,
}
