use axum::{
    extract::State,
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use super::{Envelope, created, persist_or_compensate, respond, single_image};
use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{ApiMultipart, ApiPath, ApiQuery, ValidJson},
    forms::MultipartForm,
    images::{ImageRules, delete_images, upload_images},
    models::{ApiResponse, Artikel, ContentFilter, IdQuery, Role, StatusQuery},
    payloads::{ArtikelChanges, ArtikelInput, VerificationRequest},
    verification::{apply_requested, apply_verification, record_edit},
};

const IMAGE_PREFIX: &str = "artikel";

fn not_found() -> ApiError {
    ApiError::not_found("Artikel not found")
}

/// list_artikel
///
/// [Public Route] All verified articles, newest first.
#[utoipa::path(
    get,
    path = "/api/artikel",
    tag = "artikel",
    responses((status = 200, description = "Verified articles", body = ApiResponse<Vec<Artikel>>))
)]
pub async fn list_artikel(State(state): State<AppState>) -> ApiResult<Envelope<Vec<Artikel>>> {
    let items = state.repo.list_artikel(ContentFilter::verified_only()).await?;
    Ok(respond("Artikel retrieved", items))
}

/// get_artikel
///
/// [Public Route] One verified article.
#[utoipa::path(
    get,
    path = "/api/artikel/{id}",
    tag = "artikel",
    params(("id" = Uuid, Path, description = "Artikel id")),
    responses(
        (status = 200, description = "Article", body = ApiResponse<Artikel>),
        (status = 404, description = "Not found or not verified")
    )
)]
pub async fn get_artikel(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<Artikel>> {
    let artikel = state
        .repo
        .get_artikel(id)
        .await?
        .filter(|a| a.is_verified)
        .ok_or_else(not_found)?;
    Ok(respond("Artikel retrieved", artikel))
}

#[utoipa::path(
    get,
    path = "/api/me/artikel",
    tag = "artikel",
    responses((status = 200, description = "Own articles", body = ApiResponse<Vec<Artikel>>))
)]
pub async fn get_my_artikel(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Envelope<Vec<Artikel>>> {
    user.require(&[Role::Pengelola])?;
    let items = state.repo.list_artikel(ContentFilter::owned_by(user.id)).await?;
    Ok(respond("Artikel retrieved", items))
}

/// create_artikel
///
/// [Authenticated Route] Submits an article with at most one image under `gambar`.
#[utoipa::path(
    post,
    path = "/api/artikel",
    tag = "artikel",
    request_body(content = ArtikelInput, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", body = ApiResponse<Artikel>),
        (status = 400, description = "Invalid input or image"),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn create_artikel(
    user: AuthUser,
    State(state): State<AppState>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<(StatusCode, Envelope<Artikel>)> {
    user.require(&[Role::Admin, Role::Pengelola])?;

    let mut form = MultipartForm::read(multipart).await?;
    let input = ArtikelInput::from_form(&form)?;
    let image = single_image(&mut form)?;

    let rules = ImageRules::images(IMAGE_PREFIX, state.config.max_image_bytes);
    let uploaded = upload_images(state.storage.as_ref(), image.into_iter().collect(), &rules).await?;

    let now = Utc::now();
    let artikel = Artikel {
        id: Uuid::new_v4(),
        judul: input.judul,
        konten: input.konten,
        kategori: input.kategori.as_str().to_string(),
        gambar: uploaded.first().cloned(),
        pengelola_id: (user.role == Role::Pengelola).then_some(user.id),
        is_verified: false,
        updated_by: None,
        created_at: now,
        updated_at: now,
    };

    let saved = persist_or_compensate(
        state.storage.as_ref(),
        &uploaded,
        state.repo.insert_artikel(&artikel),
    )
    .await?;

    tracing::info!(id = %saved.id, by = %user.id, "artikel created");
    Ok(created("Artikel created", saved))
}

/// update_artikel
///
/// [Authenticated Route] Partial update by `?id=` (owner or admin). A new image replaces
/// the old one, which is deleted once the row is saved.
#[utoipa::path(
    put,
    path = "/api/artikel",
    tag = "artikel",
    params(IdQuery),
    request_body(content = ArtikelInput, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated", body = ApiResponse<Artikel>),
        (status = 400, description = "Invalid input or no-op verification"),
        (status = 403, description = "Not the owner, or verification by a non-admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_artikel(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<Envelope<Artikel>> {
    user.require(&[Role::Admin, Role::Pengelola])?;

    let mut form = MultipartForm::read(multipart).await?;
    let changes = ArtikelChanges::from_form(&form)?;
    let image = single_image(&mut form)?;

    let mut artikel = state.repo.get_artikel(id).await?.ok_or_else(not_found)?;
    user.ensure_can_modify(artikel.pengelola_id)?;
    apply_requested(&mut artikel, changes.is_verified, &user)?;

    if let Some(judul) = changes.judul {
        artikel.judul = judul;
    }
    if let Some(konten) = changes.konten {
        artikel.konten = konten;
    }
    if let Some(kategori) = changes.kategori {
        artikel.kategori = kategori.as_str().to_string();
    }

    let previous = artikel.gambar.clone();
    let mut fresh = Vec::new();
    if let Some(file) = image {
        let rules = ImageRules::images(IMAGE_PREFIX, state.config.max_image_bytes);
        fresh = upload_images(state.storage.as_ref(), vec![file], &rules).await?;
        artikel.gambar = fresh.first().cloned();
    }
    record_edit(&mut artikel, &user);

    let saved = persist_or_compensate(state.storage.as_ref(), &fresh, async {
        state.repo.save_artikel(&artikel).await?.ok_or(sqlx::Error::RowNotFound)
    })
    .await?;

    if let Some(old) = previous.filter(|old| saved.gambar.as_ref() != Some(old)) {
        delete_images(state.storage.as_ref(), &[old]).await;
    }

    tracing::info!(id = %saved.id, by = %user.id, "artikel updated");
    Ok(respond("Artikel updated", saved))
}

/// delete_artikel
///
/// [Authenticated Route] Removes an article by `?id=` (owner or admin), then its image.
#[utoipa::path(
    delete,
    path = "/api/artikel",
    tag = "artikel",
    params(IdQuery),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<Artikel>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_artikel(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
) -> ApiResult<Envelope<Artikel>> {
    user.require(&[Role::Admin, Role::Pengelola])?;

    let artikel = state.repo.get_artikel(id).await?.ok_or_else(not_found)?;
    user.ensure_can_modify(artikel.pengelola_id)?;

    if !state.repo.delete_artikel(id).await? {
        return Err(not_found());
    }
    if let Some(url) = &artikel.gambar {
        delete_images(state.storage.as_ref(), std::slice::from_ref(url)).await;
    }

    tracing::info!(id = %id, by = %user.id, "artikel deleted");
    Ok(respond("Artikel deleted", artikel))
}

#[utoipa::path(
    get,
    path = "/api/admin/artikel",
    tag = "admin",
    params(StatusQuery),
    responses((status = 200, description = "Articles", body = ApiResponse<Vec<Artikel>>))
)]
pub async fn admin_list_artikel(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> ApiResult<Envelope<Vec<Artikel>>> {
    let filter = ContentFilter::by_status(query.status.unwrap_or_default());
    let items = state.repo.list_artikel(filter).await?;
    Ok(respond("Artikel retrieved", items))
}

/// verify_artikel
///
/// [Admin Route] Sets `isVerified` on an article.
#[utoipa::path(
    put,
    path = "/api/admin/artikel/verify",
    tag = "admin",
    params(IdQuery),
    request_body = VerificationRequest,
    responses(
        (status = 200, description = "Verification changed", body = ApiResponse<Artikel>),
        (status = 400, description = "Already in the requested state"),
        (status = 404, description = "Not found")
    )
)]
pub async fn verify_artikel(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
    ValidJson(body): ValidJson<VerificationRequest>,
) -> ApiResult<Envelope<Artikel>> {
    let mut artikel = state.repo.get_artikel(id).await?.ok_or_else(not_found)?;
    apply_verification(&mut artikel, body.is_verified, &user)?;
    let saved = state.repo.save_artikel(&artikel).await?.ok_or_else(not_found)?;

    tracing::info!(id = %id, admin = %user.id, verified = body.is_verified, "artikel verification changed");
    Ok(respond("Artikel verification updated", saved))
}
