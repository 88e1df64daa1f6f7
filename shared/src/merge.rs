//! Merging POS items with operator settings into order-sheet rows

use std::collections::HashMap;

use crate::models::{ItemRow, ItemSettings, RawItem};
use crate::reorder::{calculate_item, ReorderContext};

/// Build one order-sheet row: apply the stock override, run the reorder
/// calculation, then attach notes and prices. A sell price set by the
/// operator wins over the catalog price.
pub fn build_item_row(raw: &RawItem, settings: &ItemSettings, ctx: &ReorderContext) -> ItemRow {
    let calculated = match settings.stock_override {
        Some(stock) => {
            let counted = RawItem {
                on_hand: stock,
                ..raw.clone()
            };
            calculate_item(&counted, settings, ctx)
        }
        None => calculate_item(raw, settings, ctx),
    };

    ItemRow {
        calculated,
        stock_override: settings.stock_override,
        notes: settings.notes.clone().unwrap_or_default(),
        buy_price: settings.buy_price,
        sell_price: settings.sell_price.or(raw.square_sell_price),
    }
}

/// Build rows for a whole catalog snapshot, sorted for display
pub fn build_item_rows(
    raws: &[RawItem],
    settings: &HashMap<String, ItemSettings>,
    ctx: &ReorderContext,
) -> Vec<ItemRow> {
    let defaults = ItemSettings::default();
    let mut rows: Vec<ItemRow> = raws
        .iter()
        .map(|raw| {
            let item_settings = settings.get(&raw.name).unwrap_or(&defaults);
            build_item_row(raw, item_settings, ctx)
        })
        .collect();

    sort_by_category(&mut rows);
    rows
}

/// Sort rows by canonical category order, then by name
pub fn sort_by_category(rows: &mut [ItemRow]) {
    rows.sort_by(|a, b| {
        a.category()
            .rank()
            .cmp(&b.category().rank())
            .then_with(|| a.name().cmp(b.name()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Priority};
    use rust_decimal::Decimal;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_stock_override_replaces_on_hand() {
        let raw = RawItem::new("Great Northern", dec("100"), dec("10"));
        let settings = ItemSettings {
            stock_override: Some(dec("20")),
            ..Default::default()
        };

        let row = build_item_row(&raw, &settings, &ReorderContext::default());

        assert_eq!(row.calculated.current_stock, dec("20"));
        assert_eq!(row.calculated.item.on_hand, dec("20"));
        assert_eq!(row.calculated.order_qty, dec("48"));
        assert_eq!(row.stock_override, Some(dec("20")));
    }

    #[test]
    fn test_zero_stock_override_still_applies() {
        let raw = RawItem::new("Great Northern", dec("100"), dec("10"));
        let settings = ItemSettings {
            stock_override: Some(Decimal::ZERO),
            ..Default::default()
        };

        let row = build_item_row(&raw, &settings, &ReorderContext::default());

        assert_eq!(row.calculated.current_stock, Decimal::ZERO);
        assert_eq!(row.calculated.priority, Priority::Critical);
    }

    #[test]
    fn test_sell_price_override_wins() {
        let mut raw = RawItem::new("Corona", dec("24"), dec("4"));
        raw.square_sell_price = Some(dec("9.50"));

        let row = build_item_row(&raw, &ItemSettings::default(), &ReorderContext::default());
        assert_eq!(row.sell_price, Some(dec("9.50")));
        assert_eq!(row.buy_price, None);
        assert_eq!(row.notes, "");

        let settings = ItemSettings {
            sell_price: Some(dec("10")),
            buy_price: Some(dec("2.15")),
            notes: Some("summer only".to_string()),
            ..Default::default()
        };
        let row = build_item_row(&raw, &settings, &ReorderContext::default());
        assert_eq!(row.sell_price, Some(dec("10")));
        assert_eq!(row.buy_price, Some(dec("2.15")));
        assert_eq!(row.notes, "summer only");
    }

    #[test]
    fn test_rows_sorted_by_category_then_name() {
        let raws = vec![
            RawItem::new("Smiths Chips", dec("1"), dec("1")),
            RawItem::new("Jim Beam Bourbon", dec("1"), dec("1")),
            RawItem::new("XXXX Gold", dec("1"), dec("1")),
            RawItem::new("Carlton Draught", dec("1"), dec("1")),
            RawItem::new("Coke", dec("1"), dec("1")),
        ];
        let mut settings = HashMap::new();
        settings.insert(
            "Carlton Draught".to_string(),
            ItemSettings {
                category: Some(Category::Cider),
                ..Default::default()
            },
        );

        let rows = build_item_rows(&raws, &settings, &ReorderContext::default());
        let names: Vec<&str> = rows.iter().map(|r| r.name()).collect();

        assert_eq!(
            names,
            vec!["XXXX Gold", "Carlton Draught", "Jim Beam Bourbon", "Coke", "Smiths Chips"]
        );
    }
}
