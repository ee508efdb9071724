use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use super::{Envelope, created, respond};
use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{ApiQuery, ValidJson},
    models::{ApiResponse, IdQuery, ReviewTarget, Role, StatusQuery, Ulasan, UlasanFilter, UlasanQuery},
    payloads::{CreateUlasanRequest, UpdateUlasanRequest, VerificationRequest},
    verification::{apply_requested, apply_verification, record_edit},
};

fn not_found() -> ApiError {
    ApiError::not_found("Ulasan not found")
}

/// list_ulasan
///
/// [Public Route] Verified reviews of one entity, selected by exactly one of
/// `?wisataId=`, `?artikelId=` or `?eventId=`.
#[utoipa::path(
    get,
    path = "/api/ulasan",
    tag = "ulasan",
    params(UlasanQuery),
    responses(
        (status = 200, description = "Verified reviews", body = ApiResponse<Vec<Ulasan>>),
        (status = 400, description = "Zero or several targets given")
    )
)]
pub async fn list_ulasan(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UlasanQuery>,
) -> ApiResult<Envelope<Vec<Ulasan>>> {
    let target = ReviewTarget::from_ids(query.wisata_id, query.artikel_id, query.event_id)
        .ok_or_else(|| {
            ApiError::validation("Exactly one of wisataId, artikelId or eventId must be given")
        })?;
    let items = state
        .repo
        .list_ulasan(UlasanFilter {
            verified: Some(true),
            target: Some(target),
        })
        .await?;
    Ok(respond("Ulasan retrieved", items))
}

/// create_ulasan
///
/// [Authenticated Route] A visitor reviews one verified wisata, artikel or event. The
/// review itself starts unverified.
#[utoipa::path(
    post,
    path = "/api/ulasan",
    tag = "ulasan",
    request_body = CreateUlasanRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<Ulasan>),
        (status = 400, description = "Invalid rating, comment or target"),
        (status = 403, description = "Only visitors can review"),
        (status = 404, description = "Reviewed entity not found")
    )
)]
pub async fn create_ulasan(
    user: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateUlasanRequest>,
) -> ApiResult<(StatusCode, Envelope<Ulasan>)> {
    user.require(&[Role::Pengguna])?;

    let target = payload.target()?;
    if !state.repo.target_exists(target).await? {
        return Err(ApiError::not_found(format!("{} not found", target.label())));
    }

    let (wisata_id, artikel_id, event_id) = target.columns();
    let now = Utc::now();
    let ulasan = Ulasan {
        id: Uuid::new_v4(),
        pengguna_id: user.id,
        rating: payload.rating,
        komentar: payload.komentar,
        wisata_id,
        artikel_id,
        event_id,
        is_verified: false,
        updated_by: None,
        created_at: now,
        updated_at: now,
    };

    let saved = state.repo.insert_ulasan(&ulasan).await?;
    tracing::info!(id = %saved.id, target = target.label(), by = %user.id, "ulasan created");
    Ok(created("Ulasan created", saved))
}

/// update_ulasan
///
/// [Authenticated Route] The author edits rating or comment; an admin may additionally
/// set `isVerified`. The target never changes.
#[utoipa::path(
    put,
    path = "/api/ulasan",
    tag = "ulasan",
    params(IdQuery),
    request_body = UpdateUlasanRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<Ulasan>),
        (status = 400, description = "Invalid input or no-op verification"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_ulasan(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
    ValidJson(payload): ValidJson<UpdateUlasanRequest>,
) -> ApiResult<Envelope<Ulasan>> {
    user.require(&[Role::Admin, Role::Pengguna])?;

    let mut ulasan = state.repo.get_ulasan(id).await?.ok_or_else(not_found)?;
    user.ensure_can_modify(Some(ulasan.pengguna_id))?;
    apply_requested(&mut ulasan, payload.is_verified, &user)?;

    if let Some(rating) = payload.rating {
        ulasan.rating = rating;
    }
    if let Some(komentar) = payload.komentar {
        ulasan.komentar = komentar;
    }
    record_edit(&mut ulasan, &user);

    let saved = state.repo.save_ulasan(&ulasan).await?.ok_or_else(not_found)?;
    tracing::info!(id = %id, by = %user.id, "ulasan updated");
    Ok(respond("Ulasan updated", saved))
}

#[utoipa::path(
    delete,
    path = "/api/ulasan",
    tag = "ulasan",
    params(IdQuery),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<Ulasan>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_ulasan(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
) -> ApiResult<Envelope<Ulasan>> {
    user.require(&[Role::Admin, Role::Pengguna])?;

    let ulasan = state.repo.get_ulasan(id).await?.ok_or_else(not_found)?;
    user.ensure_can_modify(Some(ulasan.pengguna_id))?;

    if !state.repo.delete_ulasan(id).await? {
        return Err(not_found());
    }
    tracing::info!(id = %id, by = %user.id, "ulasan deleted");
    Ok(respond("Ulasan deleted", ulasan))
}

/// admin_list_ulasan
///
/// [Admin Route] Every review across all targets, filtered by `?status=`.
#[utoipa::path(
    get,
    path = "/api/admin/ulasan",
    tag = "admin",
    params(StatusQuery),
    responses((status = 200, description = "Reviews", body = ApiResponse<Vec<Ulasan>>))
)]
pub async fn admin_list_ulasan(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> ApiResult<Envelope<Vec<Ulasan>>> {
    let filter = UlasanFilter {
        verified: query.status.unwrap_or_default().as_flag(),
        target: None,
    };
    let items = state.repo.list_ulasan(filter).await?;
    Ok(respond("Ulasan retrieved", items))
}

#[utoipa::path(
    put,
    path = "/api/admin/ulasan/verify",
    tag = "admin",
    params(IdQuery),
    request_body = VerificationRequest,
    responses(
        (status = 200, description = "Verification changed", body = ApiResponse<Ulasan>),
        (status = 400, description = "Already in the requested state"),
        (status = 404, description = "Not found")
    )
)]
pub async fn verify_ulasan(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
    ValidJson(body): ValidJson<VerificationRequest>,
) -> ApiResult<Envelope<Ulasan>> {
    let mut ulasan = state.repo.get_ulasan(id).await?.ok_or_else(not_found)?;
    apply_verification(&mut ulasan, body.is_verified, &user)?;
    let saved = state.repo.save_ulasan(&ulasan).await?.ok_or_else(not_found)?;

    tracing::info!(id = %id, admin = %user.id, verified = body.is_verified, "ulasan verification changed");
    Ok(respond("Ulasan verification updated", saved))
}
