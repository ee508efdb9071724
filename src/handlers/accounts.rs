use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use super::{Envelope, created, respond};
use crate::{
    AppState,
    auth::{AuthUser, issue_token},
    credentials::{hash_password, verify_login},
    error::{ApiError, ApiResult},
    extract::ValidJson,
    models::{ApiResponse, Pengguna, UserProfile},
    payloads::{LoginRequest, LoginResponse, RegisterPenggunaRequest},
};

/// register_pengguna
///
/// [Public Route] Creates a visitor account, usable immediately.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterPenggunaRequest,
    responses(
        (status = 201, description = "Registered", body = ApiResponse<Pengguna>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_pengguna(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterPenggunaRequest>,
) -> ApiResult<(StatusCode, Envelope<Pengguna>)> {
    let email = payload.email.to_lowercase();
    if state.repo.email_registered(&email).await? {
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let pengguna = Pengguna {
        id: Uuid::new_v4(),
        nama: payload.nama,
        email,
        created_at: Utc::now(),
    };
    state.repo.create_pengguna(&pengguna, &password_hash).await?;

    tracing::info!(id = %pengguna.id, "pengguna registered");
    Ok(created("Registration successful", pengguna))
}

/// login
///
/// [Public Route] Exchanges email and password for a session token. Account tables are
/// searched admin, pengelola, pengguna; an unverified manager is refused with 403.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid email or password"),
        (status = 403, description = "Manager awaiting verification")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> ApiResult<Envelope<LoginResponse>> {
    let (role, credential) = verify_login(state.repo.as_ref(), &payload.email, &payload.password).await?;
    let token = issue_token(&state.config, credential.id, role)?;

    tracing::info!(id = %credential.id, role = %role, "login succeeded");
    Ok(respond(
        "Login successful",
        LoginResponse {
            token,
            id: credential.id,
            nama: credential.nama,
            role,
        },
    ))
}

/// get_me
///
/// [Authenticated Route] The caller's own profile.
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserProfile>),
        (status = 401, description = "No valid session")
    )
)]
pub async fn get_me(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Envelope<UserProfile>> {
    let profile = state
        .repo
        .get_profile(user.role, user.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;
    Ok(respond("Profile retrieved", profile))
}
