//! HTTP handlers for bar notes

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::handlers::Ack;
use crate::services::notes::{AddNoteInput, AddedNote, NotesList};
use crate::services::NotesService;
use crate::AppState;

/// List notes, newest first
pub async fn list_notes(State(state): State<AppState>) -> AppResult<Json<NotesList>> {
    let service = NotesService::new(state.db, state.config.venue.offset());
    let notes = service.list().await?;
    Ok(Json(notes))
}

/// Add a note
pub async fn add_note(
    State(state): State<AppState>,
    Json(input): Json<AddNoteInput>,
) -> AppResult<Json<AddedNote>> {
    let service = NotesService::new(state.db, state.config.venue.offset());
    let added = service.add(input).await?;
    Ok(Json(added))
}

/// Delete a note
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Ack>> {
    let service = NotesService::new(state.db, state.config.venue.offset());
    service.delete(&id).await?;
    Ok(Json(Ack { ok: true }))
}
