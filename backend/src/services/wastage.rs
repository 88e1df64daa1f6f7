//! Wastage service for recording stock written off

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{entry_id, remove_entry, sort_newest_first, WastageEntry, WastageReason};
use sqlx::PgPool;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::services::store::{KvStore, WASTAGE_LOG_KEY};

/// Wastage service for the write-off log
#[derive(Clone)]
pub struct WastageService {
    store: KvStore,
}

/// Input for recording wastage
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordWastageInput {
    #[validate(length(min = 1, max = 200))]
    pub item_name: String,
    pub category: Option<String>,
    #[validate(custom = "validate_positive_qty")]
    pub qty: Decimal,
    #[validate(length(max = 20))]
    pub unit: Option<String>,
    pub reason: WastageReason,
    #[validate(length(max = 1000))]
    pub note: Option<String>,
    #[validate(length(max = 100))]
    pub recorded_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WastageLog {
    pub entries: Vec<WastageEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordedWastage {
    pub entry: WastageEntry,
}

fn validate_positive_qty(qty: &Decimal) -> Result<(), ValidationError> {
    if *qty <= Decimal::ZERO {
        return Err(ValidationError::new("qty_must_be_positive"));
    }
    Ok(())
}

impl WastageService {
    /// Create a new WastageService
    pub fn new(db: PgPool) -> Self {
        Self {
            store: KvStore::new(db),
        }
    }

    /// List entries, newest first
    pub async fn list(&self) -> AppResult<WastageLog> {
        let mut entries: Vec<WastageEntry> = self.store.get(WASTAGE_LOG_KEY).await?.unwrap_or_default();
        sort_newest_first(&mut entries);
        Ok(WastageLog { entries })
    }

    /// Record a write-off
    pub async fn record(&self, input: RecordWastageInput) -> AppResult<RecordedWastage> {
        input.validate()?;

        let now = Utc::now();
        let mut entry = WastageEntry {
            id: String::new(),
            item_name: input.item_name.trim().to_string(),
            category: input.category.unwrap_or_default(),
            qty: input.qty,
            unit: input
                .unit
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| "units".to_string()),
            reason: input.reason,
            note: input.note.unwrap_or_default(),
            recorded_by: input.recorded_by.unwrap_or_default(),
            date: now,
        };

        let entry = self
            .store
            .update(WASTAGE_LOG_KEY, |entries: &mut Vec<WastageEntry>| {
                entry.id = entry_id(now, entries.as_slice());
                entries.push(entry.clone());
                Ok(entry)
            })
            .await?;

        tracing::info!(
            "Recorded wastage {}: {} {} of {} ({:?})",
            entry.id,
            entry.qty,
            entry.unit,
            entry.item_name,
            entry.reason
        );

        Ok(RecordedWastage { entry })
    }

    /// Delete an entry by id
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store
            .update(WASTAGE_LOG_KEY, |entries: &mut Vec<WastageEntry>| {
                if remove_entry(entries, id) {
                    Ok(())
                } else {
                    Err(AppError::NotFound(format!("Wastage entry {}", id)))
                }
            })
            .await?;
        tracing::info!("Deleted wastage entry {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_input_validation() {
        let input: RecordWastageInput = serde_json::from_value(json!({
            "itemName": "Corona",
            "qty": 2,
            "reason": "Breakage"
        }))
        .unwrap();
        assert!(input.validate().is_ok());

        let input: RecordWastageInput = serde_json::from_value(json!({
            "itemName": "Corona",
            "qty": 0,
            "reason": "Breakage"
        }))
        .unwrap();
        assert!(input.validate().is_err());

        let input: RecordWastageInput = serde_json::from_value(json!({
            "itemName": "",
            "qty": 1,
            "reason": "Other"
        }))
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_unknown_reason_rejected() {
        let input = serde_json::from_value::<RecordWastageInput>(json!({
            "itemName": "Corona",
            "qty": 1,
            "reason": "Drank it"
        }));
        assert!(input.is_err());
    }
}
