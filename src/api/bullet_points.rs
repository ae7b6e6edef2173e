// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bullet-point endpoints. The parent note must resolve under the
//! caller's ownership first; only then do the bullet-point operations
//! run, scoped to that note.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{BulletPointCreateRequest, BulletPointResponse, BulletPointUpdateRequest},
    state::AppState,
    storage::{BulletPointRepository, NoteRepository, StoredBulletPoint, StoredNote},
};

impl From<StoredBulletPoint> for BulletPointResponse {
    fn from(bullet: StoredBulletPoint) -> Self {
        Self {
            id: bullet.id,
            content: bullet.content,
            completed: bullet.completed,
            created_at: bullet.created_at,
            updated_at: bullet.updated_at,
        }
    }
}

/// Resolve the parent note under the ownership rule. A missing or
/// foreign note is the same 404.
fn resolve_note(state: &AppState, user_id: u64, note_id: u64) -> Result<StoredNote, ApiError> {
    NoteRepository::new(&state.db)
        .get(user_id, note_id)?
        .ok_or_else(|| ApiError::not_found("Note not found"))
}

/// Create a bullet point, optionally enhancing its content first.
#[utoipa::path(
    post,
    path = "/notes/{note_id}/bullet-points",
    params(("note_id" = u64, Path, description = "Parent note id")),
    request_body = BulletPointCreateRequest,
    tag = "BulletPoints",
    responses(
        (status = 201, description = "Bullet point created", body = BulletPointResponse),
        (status = 404, description = "Note missing or not owned"),
    )
)]
pub async fn create_bullet_point(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(note_id): Path<u64>,
    Json(request): Json<BulletPointCreateRequest>,
) -> Result<(StatusCode, Json<BulletPointResponse>), ApiError> {
    let note = resolve_note(&state, user.id, note_id)?;

    let mut content = request.content;
    if request.enhance {
        // Best-effort: an unconfigured or failing enhancer leaves the
        // content untouched.
        if let Some(enhancer) = &state.enhancer {
            content = enhancer.enhance(&content, request.enhancement_type).await;
        }
    }

    let bullet =
        BulletPointRepository::new(&state.db).create(note.id, &content, request.completed)?;
    Ok((StatusCode::CREATED, Json(bullet.into())))
}

/// List the note's bullet points in creation order.
#[utoipa::path(
    get,
    path = "/notes/{note_id}/bullet-points",
    params(("note_id" = u64, Path, description = "Parent note id")),
    tag = "BulletPoints",
    responses(
        (status = 200, description = "Bullet points of the note", body = [BulletPointResponse]),
        (status = 404, description = "Note missing or not owned"),
    )
)]
pub async fn list_bullet_points(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(note_id): Path<u64>,
) -> Result<Json<Vec<BulletPointResponse>>, ApiError> {
    let note = resolve_note(&state, user.id, note_id)?;

    let bullet_points = BulletPointRepository::new(&state.db)
        .list(note.id)?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(bullet_points))
}

/// Replace a bullet point's content and completed flag.
#[utoipa::path(
    put,
    path = "/notes/{note_id}/bullet-points/{bullet_id}",
    params(
        ("note_id" = u64, Path, description = "Parent note id"),
        ("bullet_id" = u64, Path, description = "Bullet point id"),
    ),
    request_body = BulletPointUpdateRequest,
    tag = "BulletPoints",
    responses(
        (status = 200, description = "Updated bullet point", body = BulletPointResponse),
        (status = 404, description = "Note or bullet point missing"),
    )
)]
pub async fn update_bullet_point(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((note_id, bullet_id)): Path<(u64, u64)>,
    Json(request): Json<BulletPointUpdateRequest>,
) -> Result<Json<BulletPointResponse>, ApiError> {
    let note = resolve_note(&state, user.id, note_id)?;

    let bullet = BulletPointRepository::new(&state.db).update(
        note.id,
        bullet_id,
        &request.content,
        request.completed,
    )?;
    Ok(Json(bullet.into()))
}

/// Delete a single bullet point.
#[utoipa::path(
    delete,
    path = "/notes/{note_id}/bullet-points/{bullet_id}",
    params(
        ("note_id" = u64, Path, description = "Parent note id"),
        ("bullet_id" = u64, Path, description = "Bullet point id"),
    ),
    tag = "BulletPoints",
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Note or bullet point missing"),
    )
)]
pub async fn delete_bullet_point(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((note_id, bullet_id)): Path<(u64, u64)>,
) -> Result<StatusCode, ApiError> {
    let note = resolve_note(&state, user.id, note_id)?;

    BulletPointRepository::new(&state.db).delete(note.id, bullet_id)?;
    Ok(StatusCode::NO_CONTENT)
}
