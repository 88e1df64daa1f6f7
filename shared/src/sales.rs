//! Sales report aggregation

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;

use crate::inference::infer_category;
use crate::models::{ItemSettings, SalesLine, SalesReport, SalesTotals, SoldTotals};
use crate::types::round_dp;

/// Aggregate per-item sales for a period, with an optional comparison period.
///
/// Revenue is the operator's sell price times units when one is set,
/// otherwise the gross revenue reported by the POS.
pub fn build_sales_report(
    main: &HashMap<String, SoldTotals>,
    compare: Option<&HashMap<String, SoldTotals>>,
    settings: &HashMap<String, ItemSettings>,
) -> SalesReport {
    let empty = HashMap::new();
    let previous = compare.unwrap_or(&empty);

    let names: BTreeSet<&String> = main.keys().chain(previous.keys()).collect();

    let mut items: Vec<SalesLine> = names
        .into_iter()
        .filter_map(|name| {
            let item_settings = settings.get(name);
            let current = main.get(name);
            let prior = previous.get(name);

            let units_sold = round_dp(current.map(|s| s.units).unwrap_or_default(), 0);
            let prev_sold = round_dp(prior.map(|s| s.units).unwrap_or_default(), 0);
            if units_sold.is_zero() && prev_sold.is_zero() {
                return None;
            }

            let category = item_settings
                .and_then(|s| s.category)
                .unwrap_or_else(|| infer_category(name));
            let sell_price = item_settings.and_then(|s| s.sell_price);

            let change = (prev_sold > Decimal::ZERO)
                .then(|| {
                    (units_sold - prev_sold)
                        .checked_div(prev_sold)
                        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                })
                .flatten()
                .map(|pct| round_dp(pct, 1));

            Some(SalesLine {
                name: name.clone(),
                category,
                units_sold,
                prev_sold,
                change,
                revenue: line_revenue(units_sold, sell_price, current),
                prev_rev: line_revenue(prev_sold, sell_price, prior),
                sell_price,
            })
        })
        .collect();

    items.sort_by(|a, b| {
        b.units_sold
            .cmp(&a.units_sold)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut categories: BTreeMap<_, SalesTotals> = BTreeMap::new();
    let mut totals = SalesTotals::default();
    for line in &items {
        categories.entry(line.category).or_default().add(line);
        totals.add(line);
    }
    totals.revenue = round_dp(totals.revenue, 2);
    totals.prev_rev = round_dp(totals.prev_rev, 2);

    SalesReport {
        items,
        categories,
        totals,
        has_compare: compare.is_some(),
    }
}

fn line_revenue(units: Decimal, sell_price: Option<Decimal>, sold: Option<&SoldTotals>) -> Option<Decimal> {
    if units.is_zero() {
        return None;
    }
    match sell_price {
        Some(price) => Some(round_dp(units * price, 2)),
        None => sold.and_then(|s| s.revenue).map(|r| round_dp(r, 2)),
    }
}
