//! Operator-editable item settings and supplier defaults

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::Category;

/// Smallest bottle or nip size accepted (mL)
pub const MIN_SIZE_ML: u32 = 1;

/// Per-item overrides kept in the settings store. Every field is optional;
/// an absent field means "use the inferred default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSettings {
    #[serde(default, deserialize_with = "lenient::category", skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    /// Case size
    #[serde(default, deserialize_with = "lenient::pack", skip_serializing_if = "Option::is_none")]
    pub pack: Option<u32>,
    #[serde(
        rename = "bottleML",
        default,
        deserialize_with = "lenient::size_ml",
        skip_serializing_if = "Option::is_none"
    )]
    pub bottle_ml: Option<Decimal>,
    #[serde(
        rename = "nipML",
        default,
        deserialize_with = "lenient::size_ml",
        skip_serializing_if = "Option::is_none"
    )]
    pub nip_ml: Option<Decimal>,
    /// Counted stock that replaces the POS on-hand figure
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub stock_override: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub buy_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub sell_price: Option<Decimal>,
}

/// Editable fields of [`ItemSettings`], keyed by their wire names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Category,
    Supplier,
    Pack,
    BottleMl,
    NipMl,
    StockOverride,
    Notes,
    BuyPrice,
    SellPrice,
}

impl FromStr for SettingsField {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(SettingsField::Category),
            "supplier" => Ok(SettingsField::Supplier),
            "pack" => Ok(SettingsField::Pack),
            "bottleML" => Ok(SettingsField::BottleMl),
            "nipML" => Ok(SettingsField::NipMl),
            "stockOverride" => Ok(SettingsField::StockOverride),
            "notes" => Ok(SettingsField::Notes),
            "buyPrice" => Ok(SettingsField::BuyPrice),
            "sellPrice" => Ok(SettingsField::SellPrice),
            other => Err(SettingsError::UnknownField(other.to_string())),
        }
    }
}

impl SettingsField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsField::Category => "category",
            SettingsField::Supplier => "supplier",
            SettingsField::Pack => "pack",
            SettingsField::BottleMl => "bottleML",
            SettingsField::NipMl => "nipML",
            SettingsField::StockOverride => "stockOverride",
            SettingsField::Notes => "notes",
            SettingsField::BuyPrice => "buyPrice",
            SettingsField::SellPrice => "sellPrice",
        }
    }
}

/// Errors raised while applying a settings edit
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("unknown settings field: {0}")]
    UnknownField(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ItemSettings {
    /// Apply a single-field edit. A null or blank value clears the field.
    pub fn apply_field(&mut self, field: SettingsField, value: &Value) -> Result<(), SettingsError> {
        let invalid = |reason: &str| SettingsError::InvalidValue {
            field: field.as_str(),
            reason: reason.to_string(),
        };

        match field {
            SettingsField::Category => {
                self.category = match value_text(value) {
                    None => None,
                    Some(label) => Some(
                        Category::from_label(&label).ok_or_else(|| invalid("not a known category"))?,
                    ),
                }
            }
            SettingsField::Supplier => self.supplier = value_text(value),
            SettingsField::Notes => self.notes = value_text(value),
            SettingsField::Pack => {
                self.pack = match value_decimal(value).map_err(|e| invalid(&e))? {
                    None => None,
                    Some(d) => Some(decimal_to_pack(d).ok_or_else(|| invalid("must be a positive whole number"))?),
                }
            }
            SettingsField::BottleMl | SettingsField::NipMl => {
                let size = match value_decimal(value).map_err(|e| invalid(&e))? {
                    Some(d) if d < Decimal::from(MIN_SIZE_ML) => return Err(invalid("must be at least 1 mL")),
                    other => other,
                };
                if field == SettingsField::BottleMl {
                    self.bottle_ml = size;
                } else {
                    self.nip_ml = size;
                }
            }
            SettingsField::StockOverride => {
                self.stock_override = match value_decimal(value).map_err(|e| invalid(&e))? {
                    Some(d) if d < Decimal::ZERO => return Err(invalid("cannot be negative")),
                    other => other,
                }
            }
            SettingsField::BuyPrice => self.buy_price = value_decimal(value).map_err(|e| invalid(&e))?,
            SettingsField::SellPrice => self.sell_price = value_decimal(value).map_err(|e| invalid(&e))?,
        }

        Ok(())
    }

    /// True when no field carries a value
    pub fn is_empty(&self) -> bool {
        *self == ItemSettings::default()
    }
}

/// Supplier names used when an item has no supplier set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SupplierDefaults {
    pub snacks: String,
    pub soft_drinks: String,
    /// Everything that is not snacks or soft drinks
    pub general: String,
}

impl Default for SupplierDefaults {
    fn default() -> Self {
        Self {
            snacks: "ACW".to_string(),
            soft_drinks: "Coles Woolies".to_string(),
            general: "Dan Murphys".to_string(),
        }
    }
}

impl SupplierDefaults {
    /// Known supplier list offered when the store holds none
    pub fn names(&self) -> Vec<String> {
        vec![
            self.general.clone(),
            self.soft_drinks.clone(),
            self.snacks.clone(),
        ]
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

fn value_decimal(value: &Value) -> Result<Option<Decimal>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Decimal::from_str(s.trim())
            .map(Some)
            .map_err(|_| format!("'{}' is not a number", s)),
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map(Some)
            .map_err(|_| format!("'{}' is not a number", n)),
        other => Err(format!("expected a number, got {}", other)),
    }
}

fn decimal_to_pack(value: Decimal) -> Option<u32> {
    if value <= Decimal::ZERO || !value.fract().is_zero() {
        return None;
    }
    value.to_u32()
}

/// Deserializers that tolerate what the settings UI has historically stored:
/// numbers as strings, blank strings for "unset", and zero or tiny sizes.
mod lenient {
    use super::*;

    pub fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value_decimal(&value).ok().flatten())
    }

    pub fn size_ml<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(decimal(deserializer)?.filter(|d| *d >= Decimal::from(MIN_SIZE_ML)))
    }

    pub fn pack<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(decimal(deserializer)?.and_then(decimal_to_pack))
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value_text(&value))
    }

    pub fn category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(text(deserializer)?.and_then(|label| Category::from_label(&label)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_stored_settings() {
        let settings: ItemSettings = serde_json::from_value(json!({
            "category": "Spirits",
            "supplier": "Dan Murphys",
            "pack": 6,
            "bottleML": 1000,
            "nipML": 30,
            "stockOverride": 12.5,
            "notes": "top shelf",
            "buyPrice": "42.50",
            "sellPrice": ""
        }))
        .unwrap();

        assert_eq!(settings.category, Some(Category::Spirits));
        assert_eq!(settings.pack, Some(6));
        assert_eq!(settings.bottle_ml, Some(Decimal::from(1000)));
        assert_eq!(settings.stock_override, Some(Decimal::new(125, 1)));
        assert_eq!(settings.buy_price, Some(Decimal::new(4250, 2)));
        assert_eq!(settings.sell_price, None);
    }

    #[test]
    fn test_zero_and_blank_values_are_unset() {
        let settings: ItemSettings = serde_json::from_value(json!({
            "supplier": "",
            "pack": 0,
            "bottleML": 0,
            "nipML": null
        }))
        .unwrap();

        assert!(settings.is_empty());
    }

    #[test]
    fn test_unknown_stored_category_is_unset() {
        let settings: ItemSettings =
            serde_json::from_value(json!({ "category": "Kombucha" })).unwrap();
        assert_eq!(settings.category, None);
    }

    #[test]
    fn test_fractional_pack_is_unset() {
        let settings: ItemSettings = serde_json::from_value(json!({ "pack": 2.5 })).unwrap();
        assert_eq!(settings.pack, None);

        let settings: ItemSettings = serde_json::from_value(json!({ "pack": "24" })).unwrap();
        assert_eq!(settings.pack, Some(24));
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let settings = ItemSettings {
            bottle_ml: Some(Decimal::from(700)),
            nip_ml: Some(Decimal::from(30)),
            ..Default::default()
        };
        let value = serde_json::to_value(&settings).unwrap();
        assert!(value.get("bottleML").is_some());
        assert!(value.get("nipML").is_some());
        assert!(value.get("pack").is_none());
    }

    #[test]
    fn test_apply_field_updates() {
        let mut settings = ItemSettings::default();

        settings.apply_field(SettingsField::Pack, &json!("24")).unwrap();
        settings.apply_field(SettingsField::Category, &json!("Red Wine")).unwrap();
        settings.apply_field(SettingsField::NipMl, &json!(60)).unwrap();
        settings.apply_field(SettingsField::Notes, &json!("  ask rep  ")).unwrap();

        assert_eq!(settings.pack, Some(24));
        assert_eq!(settings.category, Some(Category::RedWine));
        assert_eq!(settings.nip_ml, Some(Decimal::from(60)));
        assert_eq!(settings.notes.as_deref(), Some("ask rep"));

        settings.apply_field(SettingsField::Pack, &Value::Null).unwrap();
        assert_eq!(settings.pack, None);
    }

    #[test]
    fn test_apply_field_rejects_bad_values() {
        let mut settings = ItemSettings::default();

        assert!(settings.apply_field(SettingsField::Pack, &json!(0)).is_err());
        assert!(settings.apply_field(SettingsField::Pack, &json!("six")).is_err());
        assert!(settings.apply_field(SettingsField::Category, &json!("Mead")).is_err());
        assert!(settings.apply_field(SettingsField::BottleMl, &json!(-700)).is_err());
        assert!(settings.apply_field(SettingsField::StockOverride, &json!(-1)).is_err());
    }

    #[test]
    fn test_sizes_below_one_ml_rejected() {
        let mut settings = ItemSettings::default();
        let tiny = json!("0.000000000000000000000000001");
        assert!(settings.apply_field(SettingsField::NipMl, &tiny).is_err());
        assert!(settings.apply_field(SettingsField::BottleMl, &json!(0.5)).is_err());
        assert_eq!(settings.nip_ml, None);

        settings.apply_field(SettingsField::NipMl, &json!(1)).unwrap();
        assert_eq!(settings.nip_ml, Some(Decimal::ONE));

        let stored: ItemSettings = serde_json::from_value(json!({
            "nipML": "0.000000000000000000000000001",
            "bottleML": 0.2
        }))
        .unwrap();
        assert_eq!(stored.nip_ml, None);
        assert_eq!(stored.bottle_ml, None);
        assert!(settings.is_empty());
    }

    #[test]
    fn test_field_names() {
        assert_eq!("bottleML".parse::<SettingsField>(), Ok(SettingsField::BottleMl));
        assert_eq!("stockOverride".parse::<SettingsField>(), Ok(SettingsField::StockOverride));
        assert!("targetWeeks".parse::<SettingsField>().is_err());
    }

    #[test]
    fn test_default_supplier_names() {
        let defaults = SupplierDefaults::default();
        assert_eq!(
            defaults.names(),
            vec!["Dan Murphys".to_string(), "Coles Woolies".to_string(), "ACW".to_string()]
        );
    }
}
