// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        BulletPointCreateRequest, BulletPointResponse, BulletPointUpdateRequest,
        CreateUserRequest, GoogleTokenRequest, IdentityResponse, LoginRequest, MessageResponse,
        NoteCreateRequest, NoteResponse, NoteUpdateRequest, TokenResponse,
    },
    providers::EnhancementKind,
    state::AppState,
};

pub mod auth;
pub mod bullet_points;
pub mod health;
pub mod notes;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(auth::current_user))
        .route("/health", get(health::health))
        .route("/auth/", post(auth::register))
        .route("/auth/token", post(auth::login))
        .route("/auth/google", post(auth::google_login))
        .route("/auth/google-signup", post(auth::google_signup))
        .route(
            "/notes/",
            get(notes::list_notes).post(notes::create_note),
        )
        .route(
            "/notes/{note_id}",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route(
            "/notes/{note_id}/bullet-points",
            get(bullet_points::list_bullet_points).post(bullet_points::create_bullet_point),
        )
        .route(
            "/notes/{note_id}/bullet-points/{bullet_id}",
            put(bullet_points::update_bullet_point).delete(bullet_points::delete_bullet_point),
        )
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::google_login,
        auth::google_signup,
        auth::current_user,
        health::health,
        notes::create_note,
        notes::list_notes,
        notes::get_note,
        notes::update_note,
        notes::delete_note,
        bullet_points::create_bullet_point,
        bullet_points::list_bullet_points,
        bullet_points::update_bullet_point,
        bullet_points::delete_bullet_point
    ),
    components(
        schemas(
            CreateUserRequest,
            LoginRequest,
            TokenResponse,
            GoogleTokenRequest,
            MessageResponse,
            IdentityResponse,
            NoteCreateRequest,
            NoteUpdateRequest,
            NoteResponse,
            BulletPointCreateRequest,
            BulletPointUpdateRequest,
            BulletPointResponse,
            EnhancementKind,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and identity"),
        (name = "Notes", description = "Owner-scoped note management"),
        (name = "BulletPoints", description = "Bullet points of a note"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;
