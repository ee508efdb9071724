use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use super::{Envelope, created, respond};
use crate::{
    AppState,
    auth::AuthUser,
    credentials::hash_password,
    error::{ApiError, ApiResult},
    extract::{ApiQuery, ValidJson},
    models::{ApiResponse, IdQuery, Pengelola, Role, StatusQuery},
    payloads::{RegisterPengelolaRequest, UpdatePengelolaRequest, VerificationRequest},
    verification::{apply_requested, apply_verification, record_edit},
};

fn not_found() -> ApiError {
    ApiError::not_found("Pengelola not found")
}

/// register_pengelola
///
/// [Public Route] Creates a manager account. It cannot log in until an admin verifies it.
/// The email must not be taken by any admin, manager or visitor account.
#[utoipa::path(
    post,
    path = "/api/pengelola",
    tag = "pengelola",
    request_body = RegisterPengelolaRequest,
    responses(
        (status = 201, description = "Registered, awaiting verification", body = ApiResponse<Pengelola>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_pengelola(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterPengelolaRequest>,
) -> ApiResult<(StatusCode, Envelope<Pengelola>)> {
    let email = payload.email.to_lowercase();
    if state.repo.email_registered(&email).await? {
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let now = Utc::now();
    let pengelola = Pengelola {
        id: Uuid::new_v4(),
        nama: payload.nama,
        email,
        no_hp: payload.no_hp,
        nama_usaha: payload.nama_usaha,
        is_verified: false,
        updated_by: None,
        created_at: now,
        updated_at: now,
    };
    state.repo.create_pengelola(&pengelola, &password_hash).await?;

    tracing::info!(id = %pengelola.id, "pengelola registered");
    Ok(created(
        "Registration successful, please wait for administrator verification",
        pengelola,
    ))
}

/// update_pengelola
///
/// [Authenticated Route] Profile update by `?id=`, for the manager themself or an admin.
/// Only an admin may send `isVerified`.
#[utoipa::path(
    put,
    path = "/api/pengelola",
    tag = "pengelola",
    params(IdQuery),
    request_body = UpdatePengelolaRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<Pengelola>),
        (status = 400, description = "Invalid input or no-op verification"),
        (status = 403, description = "Not this manager"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_pengelola(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
    ValidJson(payload): ValidJson<UpdatePengelolaRequest>,
) -> ApiResult<Envelope<Pengelola>> {
    user.require(&[Role::Admin, Role::Pengelola])?;

    let mut pengelola = state.repo.get_pengelola(id).await?.ok_or_else(not_found)?;
    user.ensure_can_modify(Some(pengelola.id))?;
    apply_requested(&mut pengelola, payload.is_verified, &user)?;

    if let Some(nama) = payload.nama {
        pengelola.nama = nama;
    }
    if let Some(no_hp) = payload.no_hp {
        pengelola.no_hp = no_hp;
    }
    if let Some(nama_usaha) = payload.nama_usaha {
        pengelola.nama_usaha = nama_usaha;
    }
    let new_hash = payload.password.as_deref().map(hash_password).transpose()?;
    record_edit(&mut pengelola, &user);

    let saved = state
        .repo
        .save_pengelola(&pengelola, new_hash.as_deref())
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(id = %id, by = %user.id, password_changed = new_hash.is_some(), "pengelola updated");
    Ok(respond("Pengelola updated", saved))
}

/// delete_pengelola
///
/// [Authenticated Route, admin only] Removes a manager account. Their content stays and
/// loses its owner.
#[utoipa::path(
    delete,
    path = "/api/pengelola",
    tag = "pengelola",
    params(IdQuery),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<Pengelola>),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_pengelola(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
) -> ApiResult<Envelope<Pengelola>> {
    user.require(&[Role::Admin])?;

    let pengelola = state.repo.get_pengelola(id).await?.ok_or_else(not_found)?;
    if !state.repo.delete_pengelola(id).await? {
        return Err(not_found());
    }

    tracing::info!(id = %id, admin = %user.id, "pengelola deleted");
    Ok(respond("Pengelola deleted", pengelola))
}

#[utoipa::path(
    get,
    path = "/api/admin/pengelola",
    tag = "admin",
    params(StatusQuery),
    responses((status = 200, description = "Managers", body = ApiResponse<Vec<Pengelola>>))
)]
pub async fn admin_list_pengelola(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> ApiResult<Envelope<Vec<Pengelola>>> {
    let items = state
        .repo
        .list_pengelola(query.status.unwrap_or_default().as_flag())
        .await?;
    Ok(respond("Pengelola retrieved", items))
}

/// verify_pengelola
///
/// [Admin Route] Approves (or revokes) a manager account. Revoking blocks future logins;
/// tokens already issued stay valid until they expire.
#[utoipa::path(
    put,
    path = "/api/admin/pengelola/verify",
    tag = "admin",
    params(IdQuery),
    request_body = VerificationRequest,
    responses(
        (status = 200, description = "Verification changed", body = ApiResponse<Pengelola>),
        (status = 400, description = "Already in the requested state"),
        (status = 404, description = "Not found")
    )
)]
pub async fn verify_pengelola(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
    ValidJson(body): ValidJson<VerificationRequest>,
) -> ApiResult<Envelope<Pengelola>> {
    let mut pengelola = state.repo.get_pengelola(id).await?.ok_or_else(not_found)?;
    apply_verification(&mut pengelola, body.is_verified, &user)?;
    let saved = state
        .repo
        .save_pengelola(&pengelola, None)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(id = %id, admin = %user.id, verified = body.is_verified, "pengelola verification changed");
    Ok(respond("Pengelola verification updated", saved))
}
