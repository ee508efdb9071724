use axum::{
    extract::State,
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use super::{Envelope, IMAGE_FIELD, created, persist_or_compensate, respond};
use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{ApiMultipart, ApiPath, ApiQuery, ValidJson},
    forms::MultipartForm,
    images::{ImageRules, delete_images, replaced_images, upload_images},
    models::{ApiResponse, ContentFilter, IdQuery, Role, StatusQuery, Wisata},
    payloads::{VerificationRequest, WisataChanges, WisataInput},
    verification::{apply_requested, apply_verification, record_edit},
};

const IMAGE_PREFIX: &str = "wisata";

fn not_found() -> ApiError {
    ApiError::not_found("Wisata not found")
}

/// list_wisata
///
/// [Public Route] All verified destinations, newest first.
#[utoipa::path(
    get,
    path = "/api/wisata",
    tag = "wisata",
    responses((status = 200, description = "Verified destinations", body = ApiResponse<Vec<Wisata>>))
)]
pub async fn list_wisata(State(state): State<AppState>) -> ApiResult<Envelope<Vec<Wisata>>> {
    let items = state.repo.list_wisata(ContentFilter::verified_only()).await?;
    Ok(respond("Wisata retrieved", items))
}

/// get_wisata
///
/// [Public Route] One destination. Unverified entries are reported as missing.
#[utoipa::path(
    get,
    path = "/api/wisata/{id}",
    tag = "wisata",
    params(("id" = Uuid, Path, description = "Wisata id")),
    responses(
        (status = 200, description = "Destination", body = ApiResponse<Wisata>),
        (status = 404, description = "Not found or not verified")
    )
)]
pub async fn get_wisata(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<Wisata>> {
    let wisata = state
        .repo
        .get_wisata(id)
        .await?
        .filter(|w| w.is_verified)
        .ok_or_else(not_found)?;
    Ok(respond("Wisata retrieved", wisata))
}

/// get_my_wisata
///
/// [Authenticated Route] The calling manager's own destinations, verified or not.
#[utoipa::path(
    get,
    path = "/api/me/wisata",
    tag = "wisata",
    responses((status = 200, description = "Own destinations", body = ApiResponse<Vec<Wisata>>))
)]
pub async fn get_my_wisata(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Envelope<Vec<Wisata>>> {
    user.require(&[Role::Pengelola])?;
    let items = state.repo.list_wisata(ContentFilter::owned_by(user.id)).await?;
    Ok(respond("Wisata retrieved", items))
}

/// create_wisata
///
/// [Authenticated Route] Submits a destination (`multipart/form-data`, images under
/// `gambar`). New entries start unverified; a manager becomes the owner, an admin
/// submission has no owner.
#[utoipa::path(
    post,
    path = "/api/wisata",
    tag = "wisata",
    request_body(content = WisataInput, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", body = ApiResponse<Wisata>),
        (status = 400, description = "Invalid input or image"),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn create_wisata(
    user: AuthUser,
    State(state): State<AppState>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<(StatusCode, Envelope<Wisata>)> {
    user.require(&[Role::Admin, Role::Pengelola])?;

    let mut form = MultipartForm::read(multipart).await?;
    let input = WisataInput::from_form(&form)?;

    let rules = ImageRules::images(IMAGE_PREFIX, state.config.max_image_bytes);
    let gambar = upload_images(state.storage.as_ref(), form.take_files(IMAGE_FIELD), &rules).await?;

    let now = Utc::now();
    let wisata = Wisata {
        id: Uuid::new_v4(),
        nama: input.nama,
        deskripsi: input.deskripsi,
        lokasi: input.lokasi,
        kategori: input.kategori.as_str().to_string(),
        harga_tiket: input.harga_tiket,
        jam_operasional: input.jam_operasional,
        gambar: gambar.clone(),
        pengelola_id: (user.role == Role::Pengelola).then_some(user.id),
        is_verified: false,
        updated_by: None,
        created_at: now,
        updated_at: now,
    };

    let saved = persist_or_compensate(
        state.storage.as_ref(),
        &gambar,
        state.repo.insert_wisata(&wisata),
    )
    .await?;

    tracing::info!(id = %saved.id, by = %user.id, "wisata created");
    Ok(created("Wisata created", saved))
}

/// update_wisata
///
/// [Authenticated Route] Partial update by `?id=` (owner or admin). Sending new images
/// replaces the whole set; the dropped ones are deleted from storage after the row is
/// saved. `isVerified` is accepted from admins only.
#[utoipa::path(
    put,
    path = "/api/wisata",
    tag = "wisata",
    params(IdQuery),
    request_body(content = WisataInput, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated", body = ApiResponse<Wisata>),
        (status = 400, description = "Invalid input or no-op verification"),
        (status = 403, description = "Not the owner, or verification by a non-admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_wisata(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<Envelope<Wisata>> {
    user.require(&[Role::Admin, Role::Pengelola])?;

    let mut form = MultipartForm::read(multipart).await?;
    let changes = WisataChanges::from_form(&form)?;

    let mut wisata = state.repo.get_wisata(id).await?.ok_or_else(not_found)?;
    user.ensure_can_modify(wisata.pengelola_id)?;
    apply_requested(&mut wisata, changes.is_verified, &user)?;

    if let Some(nama) = changes.nama {
        wisata.nama = nama;
    }
    if let Some(deskripsi) = changes.deskripsi {
        wisata.deskripsi = deskripsi;
    }
    if let Some(lokasi) = changes.lokasi {
        wisata.lokasi = lokasi;
    }
    if let Some(kategori) = changes.kategori {
        wisata.kategori = kategori.as_str().to_string();
    }
    if changes.harga_tiket.is_some() {
        wisata.harga_tiket = changes.harga_tiket;
    }
    if changes.jam_operasional.is_some() {
        wisata.jam_operasional = changes.jam_operasional;
    }

    let files = form.take_files(IMAGE_FIELD);
    let previous = wisata.gambar.clone();
    let mut fresh = Vec::new();
    if !files.is_empty() {
        let rules = ImageRules::images(IMAGE_PREFIX, state.config.max_image_bytes);
        fresh = upload_images(state.storage.as_ref(), files, &rules).await?;
        wisata.gambar = fresh.clone();
    }
    record_edit(&mut wisata, &user);

    let saved = persist_or_compensate(state.storage.as_ref(), &fresh, async {
        state.repo.save_wisata(&wisata).await?.ok_or(sqlx::Error::RowNotFound)
    })
    .await?;

    delete_images(state.storage.as_ref(), &replaced_images(&previous, &saved.gambar)).await;

    tracing::info!(id = %saved.id, by = %user.id, "wisata updated");
    Ok(respond("Wisata updated", saved))
}

/// delete_wisata
///
/// [Authenticated Route] Removes a destination by `?id=` (owner or admin). The row goes
/// first; its images are cleaned up afterwards and a storage failure only logs a warning.
#[utoipa::path(
    delete,
    path = "/api/wisata",
    tag = "wisata",
    params(IdQuery),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<Wisata>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_wisata(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
) -> ApiResult<Envelope<Wisata>> {
    user.require(&[Role::Admin, Role::Pengelola])?;

    let wisata = state.repo.get_wisata(id).await?.ok_or_else(not_found)?;
    user.ensure_can_modify(wisata.pengelola_id)?;

    if !state.repo.delete_wisata(id).await? {
        return Err(not_found());
    }
    delete_images(state.storage.as_ref(), &wisata.gambar).await;

    tracing::info!(id = %id, by = %user.id, "wisata deleted");
    Ok(respond("Wisata deleted", wisata))
}

/// admin_list_wisata
///
/// [Admin Route] Every destination, filtered by `?status=pending|verified|all`.
#[utoipa::path(
    get,
    path = "/api/admin/wisata",
    tag = "admin",
    params(StatusQuery),
    responses((status = 200, description = "Destinations", body = ApiResponse<Vec<Wisata>>))
)]
pub async fn admin_list_wisata(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> ApiResult<Envelope<Vec<Wisata>>> {
    let filter = ContentFilter::by_status(query.status.unwrap_or_default());
    let items = state.repo.list_wisata(filter).await?;
    Ok(respond("Wisata retrieved", items))
}

/// verify_wisata
///
/// [Admin Route] Sets `isVerified` on a destination. Repeating the current value is a 400.
#[utoipa::path(
    put,
    path = "/api/admin/wisata/verify",
    tag = "admin",
    params(IdQuery),
    request_body = VerificationRequest,
    responses(
        (status = 200, description = "Verification changed", body = ApiResponse<Wisata>),
        (status = 400, description = "Already in the requested state"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn verify_wisata(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
    ValidJson(body): ValidJson<VerificationRequest>,
) -> ApiResult<Envelope<Wisata>> {
    let mut wisata = state.repo.get_wisata(id).await?.ok_or_else(not_found)?;
    apply_verification(&mut wisata, body.is_verified, &user)?;
    let saved = state.repo.save_wisata(&wisata).await?.ok_or_else(not_found)?;

    tracing::info!(id = %id, admin = %user.id, verified = body.is_verified, "wisata verification changed");
    Ok(respond("Wisata verification updated", saved))
}
