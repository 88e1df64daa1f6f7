//! Wastage log and bar notes

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why stock was written off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WastageReason {
    Breakage,
    Spoilage,
    Expired,
    Other,
}

/// A recorded write-off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WastageEntry {
    pub id: String,
    pub item_name: String,
    #[serde(default)]
    pub category: String,
    pub qty: Decimal,
    pub unit: String,
    pub reason: WastageReason,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub recorded_by: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
}

/// A free-form note left by staff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarNote {
    pub id: String,
    #[serde(default)]
    pub item_name: String,
    pub comment: String,
    #[serde(default)]
    pub author: String,
    /// Venue-local day the note refers to
    pub note_date: NaiveDate,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
}

/// Entries kept in an append-only log in the settings store
pub trait LogEntry {
    /// Prefix of generated ids, e.g. `W` for `W-1718000000000`
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;
    fn recorded_at(&self) -> DateTime<Utc>;
}

impl LogEntry for WastageEntry {
    const ID_PREFIX: &'static str = "W";

    fn id(&self) -> &str {
        &self.id
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.date
    }
}

impl LogEntry for BarNote {
    const ID_PREFIX: &'static str = "N";

    fn id(&self) -> &str {
        &self.id
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.date
    }
}

/// Id for an entry recorded at `at`, unique among `existing`. Entries
/// recorded in the same millisecond get a `-2`, `-3`, ... suffix.
pub fn entry_id<T: LogEntry>(at: DateTime<Utc>, existing: &[T]) -> String {
    let base = format!("{}-{}", T::ID_PREFIX, at.timestamp_millis());
    let taken = |id: &str| existing.iter().any(|e| e.id() == id);
    if !taken(&base) {
        return base;
    }

    let mut suffix = 2u32;
    loop {
        let id = format!("{}-{}", base, suffix);
        if !taken(&id) {
            return id;
        }
        suffix += 1;
    }
}

pub fn sort_newest_first<T: LogEntry>(entries: &mut [T]) {
    entries.sort_by(|a, b| b.recorded_at().cmp(&a.recorded_at()));
}

/// Remove the first entry with `id`; returns whether anything was removed
pub fn remove_entry<T: LogEntry>(entries: &mut Vec<T>, id: &str) -> bool {
    match entries.iter().position(|e| e.id() == id) {
        Some(index) => {
            entries.remove(index);
            true
        }
        None => false,
    }
}
