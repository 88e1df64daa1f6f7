//! Bar notes service

use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{entry_id, remove_entry, sort_newest_first, BarNote};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::store::{KvStore, BAR_NOTES_KEY};

/// Notes service for staff comments
#[derive(Clone)]
pub struct NotesService {
    store: KvStore,
    venue_offset: FixedOffset,
}

/// Input for adding a note
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddNoteInput {
    #[validate(length(max = 200))]
    pub item_name: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
    #[validate(length(max = 100))]
    pub author: Option<String>,
    /// Defaults to today at the venue
    pub note_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotesList {
    pub notes: Vec<BarNote>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddedNote {
    pub entry: BarNote,
}

impl NotesService {
    /// Create a new NotesService
    pub fn new(db: PgPool, venue_offset: FixedOffset) -> Self {
        Self {
            store: KvStore::new(db),
            venue_offset,
        }
    }

    /// List notes, newest first
    pub async fn list(&self) -> AppResult<NotesList> {
        let mut notes: Vec<BarNote> = self.store.get(BAR_NOTES_KEY).await?.unwrap_or_default();
        sort_newest_first(&mut notes);
        Ok(NotesList { notes })
    }

    /// Add a note
    pub async fn add(&self, input: AddNoteInput) -> AppResult<AddedNote> {
        input.validate()?;
        if input.comment.trim().is_empty() {
            return Err(AppError::Validation {
                field: "comment".to_string(),
                message: "comment required".to_string(),
            });
        }

        let now = Utc::now();
        let mut entry = BarNote {
            id: String::new(),
            item_name: input.item_name.unwrap_or_default(),
            comment: input.comment,
            author: input.author.unwrap_or_default(),
            note_date: input
                .note_date
                .unwrap_or_else(|| now.with_timezone(&self.venue_offset).date_naive()),
            date: now,
        };

        let entry = self
            .store
            .update(BAR_NOTES_KEY, |notes: &mut Vec<BarNote>| {
                entry.id = entry_id(now, notes.as_slice());
                notes.push(entry.clone());
                Ok(entry)
            })
            .await?;

        tracing::info!("Added note {} for {}", entry.id, entry.note_date);
        Ok(AddedNote { entry })
    }

    /// Delete a note by id
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store
            .update(BAR_NOTES_KEY, |notes: &mut Vec<BarNote>| {
                if remove_entry(notes, id) {
                    Ok(())
                } else {
                    Err(AppError::NotFound(format!("Note {}", id)))
                }
            })
            .await?;
        tracing::info!("Deleted note {}", id);
        Ok(())
    }
}
