//! Order sheet and sales report tests
//!
//! Tests for assembling what the operator sees including:
//! - Category inference order
//! - Stock and price overrides
//! - Sheet ordering by category then name
//! - Sales report change and totals

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    build_item_rows, build_sales_report, infer_category, Category, ItemSettings, RawItem,
    ReorderContext, SoldTotals,
};
use std::collections::HashMap;
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn sold(units: &str, revenue: Option<&str>) -> SoldTotals {
    SoldTotals {
        units: dec(units),
        revenue: revenue.map(dec),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Earlier table entries win over later ones
    #[test]
    fn test_inference_order() {
        assert_eq!(infer_category("Gordon's Gin & Soda"), Category::Spirits);
        assert_eq!(infer_category("Rosemount Shiraz"), Category::RedWine);
        assert_eq!(infer_category("Canadian Club & Dry"), Category::PreMix);
        assert_eq!(infer_category("Somersby Apple Cider"), Category::Cider);
        assert_eq!(infer_category("XXXX Gold"), Category::Beer);
    }

    /// A counted stock figure replaces the POS on-hand figure
    #[test]
    fn test_stock_override_drives_calculation() {
        let raws = vec![RawItem::new("Corona", dec("100"), dec("10"))];
        let mut settings = HashMap::new();
        settings.insert(
            "Corona".to_string(),
            ItemSettings {
                stock_override: Some(dec("12")),
                ..Default::default()
            },
        );

        let rows = build_item_rows(&raws, &settings, &ReorderContext::default());
        let row = &rows[0];

        assert_eq!(row.stock_override, Some(dec("12")));
        assert_eq!(row.calculated.current_stock, dec("12"));
        // target 60, short 48, two cases
        assert_eq!(row.calculated.order_qty, dec("48"));
    }

    /// Operator sell price beats the catalog price
    #[test]
    fn test_sell_price_override() {
        let mut corona = RawItem::new("Corona", dec("10"), dec("1"));
        corona.square_sell_price = Some(dec("9.50"));
        let mut peroni = RawItem::new("Peroni", dec("10"), dec("1"));
        peroni.square_sell_price = Some(dec("10.00"));

        let mut settings = HashMap::new();
        settings.insert(
            "Corona".to_string(),
            ItemSettings {
                sell_price: Some(dec("11")),
                buy_price: Some(dec("2.10")),
                ..Default::default()
            },
        );

        let rows = build_item_rows(&[corona, peroni], &settings, &ReorderContext::default());

        assert_eq!(rows[0].sell_price, Some(dec("11")));
        assert_eq!(rows[0].buy_price, Some(dec("2.10")));
        assert_eq!(rows[1].sell_price, Some(dec("10.00")));
        assert_eq!(rows[1].buy_price, None);
    }

    /// Rows sort by category order, then name
    #[test]
    fn test_sheet_order() {
        let raws = vec![
            RawItem::new("Smiths Chips", dec("1"), dec("1")),
            RawItem::new("Vodka Cruiser", dec("1"), dec("1")),
            RawItem::new("Peroni", dec("1"), dec("1")),
            RawItem::new("Coke", dec("1"), dec("1")),
            RawItem::new("Corona", dec("1"), dec("1")),
        ];

        let rows = build_item_rows(&raws, &HashMap::new(), &ReorderContext::default());
        let names: Vec<&str> = rows.iter().map(|r| r.name()).collect();

        assert_eq!(
            names,
            vec!["Corona", "Peroni", "Vodka Cruiser", "Coke", "Smiths Chips"]
        );
    }

    /// Change is the percentage against the comparison period
    #[test]
    fn test_sales_change_and_totals() {
        let mut main = HashMap::new();
        main.insert("Corona".to_string(), sold("30", Some("285.00")));
        main.insert("Peroni".to_string(), sold("10", Some("100.00")));

        let mut compare = HashMap::new();
        compare.insert("Corona".to_string(), sold("20", Some("190.00")));
        compare.insert("Hahn".to_string(), sold("5", None));

        let report = build_sales_report(&main, Some(&compare), &HashMap::new());

        assert!(report.has_compare);
        assert_eq!(report.items.len(), 3);
        assert_eq!(report.items[0].name, "Corona");
        assert_eq!(report.items[0].change, Some(dec("50.0")));
        // Nothing to compare against
        let peroni = report.items.iter().find(|i| i.name == "Peroni").unwrap();
        assert_eq!(peroni.change, None);

        assert_eq!(report.totals.units_sold, dec("40"));
        assert_eq!(report.totals.prev_sold, dec("25"));
        assert_eq!(report.totals.revenue, dec("385.00"));
    }

    /// Sell price overrides revenue
    #[test]
    fn test_sales_revenue_uses_sell_price() {
        let mut main = HashMap::new();
        main.insert("Corona".to_string(), sold("4", Some("38.00")));

        let mut settings = HashMap::new();
        settings.insert(
            "Corona".to_string(),
            ItemSettings {
                sell_price: Some(dec("10")),
                ..Default::default()
            },
        );

        let report = build_sales_report(&main, None, &settings);

        assert!(!report.has_compare);
        assert_eq!(report.items[0].revenue, Some(dec("40")));
        assert_eq!(report.items[0].sell_price, Some(dec("10")));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn units_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..500).prop_map(Decimal::from)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Category totals add up to the report totals
        #[test]
        fn prop_category_totals_sum_to_report_totals(
            units in prop::collection::vec(units_strategy(), 1..20)
        ) {
            let names = ["Corona", "Coke", "Smiths Chips", "Jim Beam Nip", "Yellowglen Brut"];
            let mut main: HashMap<String, SoldTotals> = HashMap::new();
            for (i, u) in units.iter().enumerate() {
                let name = format!("{} {}", names[i % names.len()], i);
                main.insert(name, SoldTotals { units: *u, revenue: None });
            }

            let report = build_sales_report(&main, None, &HashMap::new());
            let by_category: Decimal = report.categories.values().map(|t| t.units_sold).sum();

            prop_assert_eq!(by_category, report.totals.units_sold);
            prop_assert!(report.items.iter().all(|i| i.units_sold > Decimal::ZERO));
        }

        /// Every POS item yields exactly one row
        #[test]
        fn prop_one_row_per_item(count in 0usize..30) {
            let raws: Vec<RawItem> = (0..count)
                .map(|i| RawItem::new(format!("Item {}", i), Decimal::from(i), Decimal::ONE))
                .collect();

            let rows = build_item_rows(&raws, &HashMap::new(), &ReorderContext::default());
            prop_assert_eq!(rows.len(), count);
        }
    }
}
