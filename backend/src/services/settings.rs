//! Settings service for per-item overrides, target weeks and suppliers

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{
    is_conventional_bottle_size, is_conventional_nip_size, validate_supplier_name,
    validate_target_weeks, ItemSettings, ReorderContext, SettingsField, SupplierDefaults,
};
use sqlx::PgPool;
use validator::Validate;

use crate::config::ReorderConfig;
use crate::error::{AppError, AppResult};
use crate::services::store::{KvStore, ITEM_SETTINGS_KEY, SUPPLIERS_KEY, TARGET_WEEKS_KEY};

/// Settings service for reading and editing operator settings
#[derive(Clone)]
pub struct SettingsService {
    store: KvStore,
    defaults: ReorderConfig,
}

/// All stored settings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSnapshot {
    pub settings: HashMap<String, ItemSettings>,
    pub target_weeks: Decimal,
}

/// Input for changing one field of one item
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingInput {
    #[validate(length(min = 1, max = 200))]
    pub item_name: String,
    #[validate(length(min = 1))]
    pub field: String,
    #[serde(default)]
    pub value: Value,
}

/// Result of a single-field update
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingResponse {
    pub ok: bool,
    pub item_name: String,
    pub settings: ItemSettings,
    /// Set when the value is accepted but unusual, e.g. a 500 mL bottle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTargetWeeksInput {
    pub target_weeks: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppliersResponse {
    pub suppliers: SupplierDefaults,
    pub names: Vec<String>,
}

impl SettingsService {
    /// Create a new SettingsService
    pub fn new(db: PgPool, defaults: ReorderConfig) -> Self {
        Self {
            store: KvStore::new(db),
            defaults,
        }
    }

    /// Get all item settings and the target weeks
    pub async fn get_all(&self) -> AppResult<SettingsSnapshot> {
        let settings = self
            .store
            .get::<HashMap<String, ItemSettings>>(ITEM_SETTINGS_KEY)
            .await?
            .unwrap_or_default();
        let target_weeks = self
            .store
            .get::<Decimal>(TARGET_WEEKS_KEY)
            .await?
            .unwrap_or(self.defaults.default_target_weeks);

        Ok(SettingsSnapshot {
            settings,
            target_weeks,
        })
    }

    /// Item settings for the calculator; read failures give empty settings
    pub async fn item_settings_or_default(&self) -> HashMap<String, ItemSettings> {
        self.store.get_or_default(ITEM_SETTINGS_KEY).await
    }

    /// Target weeks and supplier defaults for one calculation pass; read
    /// failures fall back to configured defaults
    pub async fn reorder_context(&self) -> ReorderContext {
        let target_weeks = match self.store.get::<Decimal>(TARGET_WEEKS_KEY).await {
            Ok(Some(weeks)) => weeks,
            Ok(None) => self.defaults.default_target_weeks,
            Err(e) => {
                tracing::warn!("{}; defaults used", e);
                self.defaults.default_target_weeks
            }
        };

        ReorderContext::new(target_weeks, self.suppliers_or_default().await)
    }

    /// Change a single field of one item's settings.
    ///
    /// A blank or null value clears the field. Settings left with no fields
    /// are removed entirely.
    pub async fn update_field(&self, input: UpdateSettingInput) -> AppResult<UpdateSettingResponse> {
        input.validate()?;

        // targetWeeks travels through the same endpoint in older clients
        if input.field == "targetWeeks" {
            let weeks = parse_target_weeks(&input.value)?;
            self.set_target_weeks(weeks).await?;
            return Ok(UpdateSettingResponse {
                ok: true,
                item_name: input.item_name,
                settings: ItemSettings::default(),
                warning: None,
            });
        }

        let field: SettingsField = input.field.parse()?;

        let item = self
            .store
            .update(ITEM_SETTINGS_KEY, |all: &mut HashMap<String, ItemSettings>| {
                let mut item = all.remove(&input.item_name).unwrap_or_default();
                item.apply_field(field, &input.value)?;
                if !item.is_empty() {
                    all.insert(input.item_name.clone(), item.clone());
                }
                Ok(item)
            })
            .await?;

        let warning = size_warning(field, &item);
        if let Some(w) = &warning {
            tracing::warn!("{}: {}", input.item_name, w);
        }

        tracing::info!("Updated {} for {}", field.as_str(), input.item_name);

        Ok(UpdateSettingResponse {
            ok: true,
            item_name: input.item_name,
            settings: item,
            warning,
        })
    }

    /// Set the weeks of cover to order for
    pub async fn set_target_weeks(&self, weeks: Decimal) -> AppResult<Decimal> {
        validate_target_weeks(weeks).map_err(|msg| AppError::Validation {
            field: "targetWeeks".to_string(),
            message: msg.to_string(),
        })?;

        let weeks = weeks.normalize();
        self.store.set(TARGET_WEEKS_KEY, &weeks).await?;
        tracing::info!("Target weeks set to {}", weeks);
        Ok(weeks)
    }

    /// Get the supplier defaults
    pub async fn get_suppliers(&self) -> AppResult<SuppliersResponse> {
        let suppliers = self
            .store
            .get::<SupplierDefaults>(SUPPLIERS_KEY)
            .await?
            .unwrap_or_else(|| self.defaults.suppliers.clone());

        Ok(SuppliersResponse {
            names: suppliers.names(),
            suppliers,
        })
    }

    /// Replace the supplier defaults
    pub async fn set_suppliers(&self, suppliers: SupplierDefaults) -> AppResult<SuppliersResponse> {
        for (field, name) in [
            ("general", &suppliers.general),
            ("soft_drinks", &suppliers.soft_drinks),
            ("snacks", &suppliers.snacks),
        ] {
            validate_supplier_name(name).map_err(|msg| AppError::Validation {
                field: field.to_string(),
                message: msg.to_string(),
            })?;
        }

        let suppliers = SupplierDefaults {
            snacks: suppliers.snacks.trim().to_string(),
            soft_drinks: suppliers.soft_drinks.trim().to_string(),
            general: suppliers.general.trim().to_string(),
        };
        self.store.set(SUPPLIERS_KEY, &suppliers).await?;

        Ok(SuppliersResponse {
            names: suppliers.names(),
            suppliers,
        })
    }

    async fn suppliers_or_default(&self) -> SupplierDefaults {
        match self.store.get::<SupplierDefaults>(SUPPLIERS_KEY).await {
            Ok(Some(suppliers)) => suppliers,
            Ok(None) => self.defaults.suppliers.clone(),
            Err(e) => {
                tracing::warn!("{}; defaults used", e);
                self.defaults.suppliers.clone()
            }
        }
    }
}

fn parse_target_weeks(value: &Value) -> AppResult<Decimal> {
    let parsed = match value {
        Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| AppError::Validation {
        field: "targetWeeks".to_string(),
        message: "Target weeks must be a number".to_string(),
    })
}

fn size_warning(field: SettingsField, settings: &ItemSettings) -> Option<String> {
    match field {
        SettingsField::BottleMl => settings
            .bottle_ml
            .filter(|ml| !is_conventional_bottle_size(*ml))
            .map(|ml| format!("unusual bottle size {} mL", ml)),
        SettingsField::NipMl => settings
            .nip_ml
            .filter(|ml| !is_conventional_nip_size(*ml))
            .map(|ml| format!("unusual nip size {} mL", ml)),
        _ => None,
    }
}
