// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth endpoints: registration, password login, Google identity
//! login/signup, and the identity echo at `/`.

use axum::{extract::State, http::StatusCode, Form, Json};

use crate::{
    auth::{password::hash_password, Auth},
    error::ApiError,
    models::{
        CreateUserRequest, GoogleTokenRequest, IdentityResponse, LoginRequest, MessageResponse,
        TokenResponse,
    },
    state::AppState,
    storage::{StoredUser, UserRepository},
};

/// Register a local account.
#[utoipa::path(
    post,
    path = "/auth/",
    request_body = CreateUserRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "User created"),
        (status = 409, description = "Username already taken"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<StatusCode, ApiError> {
    let password_hash =
        hash_password(&request.password).map_err(|e| ApiError::internal(e.to_string()))?;

    let users = UserRepository::new(&state.db);
    users.register(&request.username, Some(password_hash))?;

    Ok(StatusCode::CREATED)
}

/// Exchange username/password for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/token",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    tag = "Auth",
    responses(
        (status = 200, description = "Bearer token", body = TokenResponse),
        (status = 401, description = "Bad credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let users = UserRepository::new(&state.db);
    let user = users
        .verify_credentials(&form.username, &form.password)?
        .ok_or_else(|| ApiError::unauthorized("Incorrect username or password"))?;

    issue_token(&state, &user)
}

/// Exchange a Google id token for a bearer token, creating the account
/// on first login.
#[utoipa::path(
    post,
    path = "/auth/google",
    request_body = GoogleTokenRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Bearer token", body = TokenResponse),
        (status = 401, description = "Invalid identity token"),
    )
)]
pub async fn google_login(
    State(state): State<AppState>,
    Json(request): Json<GoogleTokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let verifier = state
        .google
        .as_ref()
        .ok_or_else(|| ApiError::unauthorized("Google login is not configured"))?;
    let email = verifier
        .verify(&request.token)
        .await
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let users = UserRepository::new(&state.db);
    let user = resolve_identity_account(&users, &email)
        .map_err(|e| ApiError::unauthorized(format!("Identity login failed: {e}")))?;

    issue_token(&state, &user)
}

/// Resolve the account behind a verified email, creating it on first
/// identity login. Created accounts carry no local credential, so
/// password login against them is impossible.
fn resolve_identity_account(
    users: &UserRepository<'_>,
    email: &str,
) -> crate::storage::StorageResult<StoredUser> {
    match users.get_by_username(email)? {
        Some(user) => Ok(user),
        None => users.register(email, None),
    }
}

/// Create an account from a Google id token. No token is issued; the
/// caller logs in separately.
#[utoipa::path(
    post,
    path = "/auth/google-signup",
    request_body = GoogleTokenRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Outcome message", body = MessageResponse),
        (status = 400, description = "Invalid identity token"),
    )
)]
pub async fn google_signup(
    State(state): State<AppState>,
    Json(request): Json<GoogleTokenRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let verifier = state
        .google
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("Google login is not configured"))?;
    let email = verifier
        .verify(&request.token)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let users = UserRepository::new(&state.db);
    let existing = users
        .get_by_username(&email)
        .map_err(|e| ApiError::bad_request(format!("Identity signup failed: {e}")))?;
    if existing.is_some() {
        return Ok(Json(MessageResponse {
            message: "User already exists, please login".to_string(),
        }));
    }

    users
        .register(&email, None)
        .map_err(|e| ApiError::bad_request(format!("Identity signup failed: {e}")))?;

    Ok(Json(MessageResponse {
        message: "User created successfully".to_string(),
    }))
}

/// Echo the identity resolved from the bearer token.
#[utoipa::path(
    get,
    path = "/",
    tag = "Auth",
    responses(
        (status = 200, description = "Resolved identity", body = IdentityResponse),
        (status = 401, description = "Unresolvable token"),
    )
)]
pub async fn current_user(Auth(user): Auth) -> Json<IdentityResponse> {
    Json(IdentityResponse {
        username: user.username,
        id: user.id,
    })
}

fn issue_token(state: &AppState, user: &StoredUser) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .tokens
        .issue(user.id, &user.username)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use axum::http::StatusCode;

    fn test_state() -> (AppState, tempfile::TempDir) {
        crate::state::test_support::state_with_temp_db()
    }

    #[tokio::test]
    async fn register_returns_201() {
        let (state, _temp_dir) = test_state();
        let status = register(
            State(state.clone()),
            Json(CreateUserRequest {
                username: "alice".to_string(),
                password: "pw1".to_string(),
            }),
        )
        .await
        .expect("registration succeeds");

        assert_eq!(status, StatusCode::CREATED);
        let users = UserRepository::new(&state.db);
        let stored = users.get_by_username("alice").unwrap().unwrap();
        // The hash is stored, never the plaintext.
        assert_ne!(stored.password_hash.as_deref(), Some("pw1"));
    }

    #[tokio::test]
    async fn duplicate_registration_returns_409() {
        let (state, _temp_dir) = test_state();
        let request = CreateUserRequest {
            username: "alice".to_string(),
            password: "pw1".to_string(),
        };

        register(State(state.clone()), Json(request.clone()))
            .await
            .expect("first registration succeeds");
        let err = register(State(state.clone()), Json(request))
            .await
            .expect_err("second registration fails");

        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn login_round_trips_through_the_token_service() {
        let (state, _temp_dir) = test_state();
        register(
            State(state.clone()),
            Json(CreateUserRequest {
                username: "alice".to_string(),
                password: "pw1".to_string(),
            }),
        )
        .await
        .unwrap();

        let Json(token) = login(
            State(state.clone()),
            Form(LoginRequest {
                username: "alice".to_string(),
                password: "pw1".to_string(),
            }),
        )
        .await
        .expect("login succeeds");

        assert_eq!(token.token_type, "bearer");
        let user = state.tokens.verify(&token.access_token).unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn wrong_password_returns_401() {
        let (state, _temp_dir) = test_state();
        register(
            State(state.clone()),
            Json(CreateUserRequest {
                username: "alice".to_string(),
                password: "pw1".to_string(),
            }),
        )
        .await
        .unwrap();

        let err = login(
            State(state.clone()),
            Form(LoginRequest {
                username: "alice".to_string(),
                password: "wrong".to_string(),
            }),
        )
        .await
        .expect_err("login fails");

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Incorrect username or password");
    }

    #[tokio::test]
    async fn unknown_user_gets_the_same_401() {
        let (state, _temp_dir) = test_state();
        let err = login(
            State(state),
            Form(LoginRequest {
                username: "nobody".to_string(),
                password: "pw1".to_string(),
            }),
        )
        .await
        .expect_err("login fails");

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Incorrect username or password");
    }

    #[tokio::test]
    async fn google_login_unconfigured_returns_401() {
        let (state, _temp_dir) = test_state();
        let err = google_login(
            State(state),
            Json(GoogleTokenRequest {
                token: "id-token".to_string(),
            }),
        )
        .await
        .expect_err("google login unavailable");

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn google_signup_unconfigured_returns_400() {
        let (state, _temp_dir) = test_state();
        let err = google_signup(
            State(state),
            Json(GoogleTokenRequest {
                token: "id-token".to_string(),
            }),
        )
        .await
        .expect_err("google signup unavailable");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn identity_login_creates_then_reuses_the_account() {
        let (state, _temp_dir) = test_state();
        let users = UserRepository::new(&state.db);

        let first = resolve_identity_account(&users, "bob@x.com").unwrap();
        let second = resolve_identity_account(&users, "bob@x.com").unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.username, "bob@x.com");
        // No local credential: password login is structurally impossible.
        assert!(first.password_hash.is_none());
        assert!(users
            .verify_credentials("bob@x.com", "anything")
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn google_login_rejects_bad_identity_token_with_401() {
        let (mut state, _temp_dir) = test_state();
        state.google = Some(crate::auth::GoogleVerifier::new("client-123"));

        let err = google_login(
            State(state),
            Json(GoogleTokenRequest {
                token: "garbage".to_string(),
            }),
        )
        .await
        .expect_err("malformed id token rejected");

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn google_signup_rejects_bad_identity_token_with_400() {
        let (mut state, _temp_dir) = test_state();
        state.google = Some(crate::auth::GoogleVerifier::new("client-123"));

        let err = google_signup(
            State(state),
            Json(GoogleTokenRequest {
                token: "garbage".to_string(),
            }),
        )
        .await
        .expect_err("malformed id token rejected");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn current_user_echoes_token_identity() {
        let Json(identity) = current_user(Auth(AuthenticatedUser {
            id: 7,
            username: "alice".to_string(),
        }))
        .await;

        assert_eq!(identity.id, 7);
        assert_eq!(identity.username, "alice");
    }
}
