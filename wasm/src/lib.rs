//! WebAssembly module for the Bar Reorder Planner
//!
//! Lets the order sheet recalculate in the browser while the operator edits
//! settings, without a round trip to the server:
//! - Reorder calculation for one item or a whole sheet
//! - Category inference and default pack sizes
//! - Category display order

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{build_item_rows, calculate_item, infer_category, infer_pack, ReorderContext};

fn parse_json<T: DeserializeOwned + Default>(json: &str, what: &str) -> Result<T, JsValue> {
    if json.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn context(target_weeks: f64) -> ReorderContext {
    let weeks = Decimal::try_from(target_weeks).unwrap_or(Decimal::ZERO);
    ReorderContext::new(weeks, SupplierDefaults::default())
}

/// Calculate the reorder recommendation for one item.
///
/// `settings_json` may be empty. Target weeks that are not positive fall
/// back to the default of 6.
#[wasm_bindgen]
pub fn calculate_item_json(item_json: &str, settings_json: &str, target_weeks: f64) -> Result<String, JsValue> {
    let item: RawItem = serde_json::from_str(item_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid item JSON: {}", e)))?;
    let settings: ItemSettings = parse_json(settings_json, "settings")?;

    let calculated = calculate_item(&item, &settings, &context(target_weeks));
    serde_json::to_string(&calculated).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Build the sorted order sheet from POS items and the settings map
#[wasm_bindgen]
pub fn build_order_sheet_json(items_json: &str, settings_json: &str, target_weeks: f64) -> Result<String, JsValue> {
    let items: Vec<RawItem> = parse_json(items_json, "items")?;
    let settings: HashMap<String, ItemSettings> = parse_json(settings_json, "settings")?;

    let rows = build_item_rows(&items, &settings, &context(target_weeks));
    serde_json::to_string(&rows).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Category label inferred from an item name
#[wasm_bindgen]
pub fn infer_category_label(name: &str) -> String {
    infer_category(name).label().to_string()
}

/// Default pack size for a category label; unknown labels get 1
#[wasm_bindgen]
pub fn default_pack(category_label: &str) -> u32 {
    Category::from_label(category_label).map(infer_pack).unwrap_or(1)
}

/// Display position of a category label; unknown labels sort last
#[wasm_bindgen]
pub fn category_sort_rank(label: &str) -> usize {
    category_rank(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_category_label() {
        assert_eq!(infer_category_label("Jim Beam Nip"), "Spirits");
        assert_eq!(infer_category_label("Rosemount Shiraz"), "Red Wine");
        assert_eq!(infer_category_label("Great Northern"), "Beer");
    }

    #[test]
    fn test_default_pack() {
        assert_eq!(default_pack("Beer"), 24);
        assert_eq!(default_pack("Soft Drinks"), 24);
        assert_eq!(default_pack("Red Wine"), 6);
        assert_eq!(default_pack("Snacks"), 18);
        assert_eq!(default_pack("Spirits"), 1);
        assert_eq!(default_pack("Mead"), 1);
    }

    #[test]
    fn test_category_sort_rank() {
        assert_eq!(category_sort_rank("Beer"), 0);
        assert!(category_sort_rank("Snacks") > category_sort_rank("Spirits"));
        assert_eq!(category_sort_rank("Mead"), UNKNOWN_CATEGORY_RANK);
    }

    #[test]
    fn test_calculate_item_json() {
        let item = r#"{"name":"Great Northern","onHand":"10","weeklyAvg":"12"}"#;
        let out = calculate_item_json(item, "", 6.0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        // target 72, short 62, three cases of 24
        assert_eq!(value["orderQty"], "72");
        assert_eq!(value["priority"], "CRITICAL");
        assert_eq!(value["category"], "Beer");
    }

    #[test]
    fn test_build_order_sheet_json_sorts_by_category() {
        let items = r#"[
            {"name":"Smiths Chips","onHand":"5","weeklyAvg":"2"},
            {"name":"Corona","onHand":"48","weeklyAvg":"4"}
        ]"#;
        let out = build_order_sheet_json(items, "{}", 6.0).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(rows[0]["name"], "Corona");
        assert_eq!(rows[1]["name"], "Smiths Chips");
        assert_eq!(rows[1]["category"], "Snacks");
    }
}
