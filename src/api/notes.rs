// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Note CRUD endpoints. Every operation is scoped to the authenticated
//! owner; a note owned by someone else answers 404.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{NoteCreateRequest, NoteResponse, NoteUpdateRequest},
    state::AppState,
    storage::{BulletPointRepository, NoteRepository, NotesDb, StorageResult, StoredNote},
};

/// Assemble a response with the note's bullet points embedded.
pub(crate) fn note_response(db: &NotesDb, note: StoredNote) -> StorageResult<NoteResponse> {
    let bullet_points = BulletPointRepository::new(db)
        .list(note.id)?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(NoteResponse {
        id: note.id,
        title: note.title,
        created_at: note.created_at,
        updated_at: note.updated_at,
        bullet_points,
    })
}

/// Create a note.
#[utoipa::path(
    post,
    path = "/notes/",
    request_body = NoteCreateRequest,
    tag = "Notes",
    responses((status = 201, description = "Note created", body = NoteResponse))
)]
pub async fn create_note(
    State(state): State<AppState>,
    Auth(user): Auth,
    Json(request): Json<NoteCreateRequest>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    let note = NoteRepository::new(&state.db).create(user.id, &request.title)?;
    let response = note_response(&state.db, note)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// List the caller's notes in creation order.
#[utoipa::path(
    get,
    path = "/notes/",
    tag = "Notes",
    responses((status = 200, description = "All notes owned by the caller", body = [NoteResponse]))
)]
pub async fn list_notes(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let notes = NoteRepository::new(&state.db).list(user.id)?;
    let mut responses = Vec::with_capacity(notes.len());
    for note in notes {
        responses.push(note_response(&state.db, note)?);
    }
    Ok(Json(responses))
}

/// Fetch one note with its bullet points.
#[utoipa::path(
    get,
    path = "/notes/{note_id}",
    params(("note_id" = u64, Path, description = "Note id")),
    tag = "Notes",
    responses(
        (status = 200, description = "The note", body = NoteResponse),
        (status = 404, description = "Missing or not owned"),
    )
)]
pub async fn get_note(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(note_id): Path<u64>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = NoteRepository::new(&state.db)
        .get(user.id, note_id)?
        .ok_or_else(|| ApiError::not_found("Note not found"))?;
    Ok(Json(note_response(&state.db, note)?))
}

/// Update a note; only provided fields are applied.
#[utoipa::path(
    put,
    path = "/notes/{note_id}",
    params(("note_id" = u64, Path, description = "Note id")),
    request_body = NoteUpdateRequest,
    tag = "Notes",
    responses(
        (status = 200, description = "Updated note", body = NoteResponse),
        (status = 404, description = "Missing or not owned"),
    )
)]
pub async fn update_note(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(note_id): Path<u64>,
    Json(request): Json<NoteUpdateRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = NoteRepository::new(&state.db).update(user.id, note_id, request.title)?;
    Ok(Json(note_response(&state.db, note)?))
}

/// Delete a note and its bullet points.
#[utoipa::path(
    delete,
    path = "/notes/{note_id}",
    params(("note_id" = u64, Path, description = "Note id")),
    tag = "Notes",
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Missing or not owned"),
    )
)]
pub async fn delete_note(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(note_id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    NoteRepository::new(&state.db).delete(user.id, note_id)?;
    Ok(StatusCode::NO_CONTENT)
}
