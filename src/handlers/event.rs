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
    models::{ApiResponse, ContentFilter, Event, IdQuery, Role, StatusQuery},
    payloads::{EventChanges, EventInput, VerificationRequest, check_event_dates},
    verification::{apply_requested, apply_verification, record_edit},
};

const IMAGE_PREFIX: &str = "event";

fn not_found() -> ApiError {
    ApiError::not_found("Event not found")
}

/// list_event
///
/// [Public Route] All verified events, newest submission first.
#[utoipa::path(
    get,
    path = "/api/event",
    tag = "event",
    responses((status = 200, description = "Verified events", body = ApiResponse<Vec<Event>>))
)]
pub async fn list_event(State(state): State<AppState>) -> ApiResult<Envelope<Vec<Event>>> {
    let items = state.repo.list_event(ContentFilter::verified_only()).await?;
    Ok(respond("Event retrieved", items))
}

#[utoipa::path(
    get,
    path = "/api/event/{id}",
    tag = "event",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event", body = ApiResponse<Event>),
        (status = 404, description = "Not found or not verified")
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<Event>> {
    let event = state
        .repo
        .get_event(id)
        .await?
        .filter(|e| e.is_verified)
        .ok_or_else(not_found)?;
    Ok(respond("Event retrieved", event))
}

#[utoipa::path(
    get,
    path = "/api/me/event",
    tag = "event",
    responses((status = 200, description = "Own events", body = ApiResponse<Vec<Event>>))
)]
pub async fn get_my_event(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Envelope<Vec<Event>>> {
    user.require(&[Role::Pengelola])?;
    let items = state.repo.list_event(ContentFilter::owned_by(user.id)).await?;
    Ok(respond("Event retrieved", items))
}

/// create_event
///
/// [Authenticated Route] Submits an event. `tanggalMulai`/`tanggalSelesai` are RFC 3339
/// timestamps and the end may not precede the start.
#[utoipa::path(
    post,
    path = "/api/event",
    tag = "event",
    request_body(content = EventInput, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", body = ApiResponse<Event>),
        (status = 400, description = "Invalid input, dates or image"),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn create_event(
    user: AuthUser,
    State(state): State<AppState>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<(StatusCode, Envelope<Event>)> {
    user.require(&[Role::Admin, Role::Pengelola])?;

    let mut form = MultipartForm::read(multipart).await?;
    let input = EventInput::from_form(&form)?;
    let image = single_image(&mut form)?;

    let rules = ImageRules::images(IMAGE_PREFIX, state.config.max_image_bytes);
    let uploaded = upload_images(state.storage.as_ref(), image.into_iter().collect(), &rules).await?;

    let now = Utc::now();
    let event = Event {
        id: Uuid::new_v4(),
        nama: input.nama,
        deskripsi: input.deskripsi,
        lokasi: input.lokasi,
        tanggal_mulai: input.tanggal_mulai,
        tanggal_selesai: input.tanggal_selesai,
        harga: input.harga,
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
        state.repo.insert_event(&event),
    )
    .await?;

    tracing::info!(id = %saved.id, by = %user.id, "event created");
    Ok(created("Event created", saved))
}

/// update_event
///
/// [Authenticated Route] Partial update by `?id=` (owner or admin). Date ordering is
/// checked on the merged result, so moving only one of the two dates is allowed.
#[utoipa::path(
    put,
    path = "/api/event",
    tag = "event",
    params(IdQuery),
    request_body(content = EventInput, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated", body = ApiResponse<Event>),
        (status = 400, description = "Invalid input or no-op verification"),
        (status = 403, description = "Not the owner, or verification by a non-admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_event(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<Envelope<Event>> {
    user.require(&[Role::Admin, Role::Pengelola])?;

    let mut form = MultipartForm::read(multipart).await?;
    let changes = EventChanges::from_form(&form)?;
    let image = single_image(&mut form)?;

    let mut event = state.repo.get_event(id).await?.ok_or_else(not_found)?;
    user.ensure_can_modify(event.pengelola_id)?;
    apply_requested(&mut event, changes.is_verified, &user)?;

    if let Some(nama) = changes.nama {
        event.nama = nama;
    }
    if let Some(deskripsi) = changes.deskripsi {
        event.deskripsi = deskripsi;
    }
    if let Some(lokasi) = changes.lokasi {
        event.lokasi = lokasi;
    }
    if let Some(mulai) = changes.tanggal_mulai {
        event.tanggal_mulai = mulai;
    }
    if let Some(selesai) = changes.tanggal_selesai {
        event.tanggal_selesai = selesai;
    }
    if changes.harga.is_some() {
        event.harga = changes.harga;
    }
    check_event_dates(event.tanggal_mulai, event.tanggal_selesai)?;

    let previous = event.gambar.clone();
    let mut fresh = Vec::new();
    if let Some(file) = image {
        let rules = ImageRules::images(IMAGE_PREFIX, state.config.max_image_bytes);
        fresh = upload_images(state.storage.as_ref(), vec![file], &rules).await?;
        event.gambar = fresh.first().cloned();
    }
    record_edit(&mut event, &user);

    let saved = persist_or_compensate(state.storage.as_ref(), &fresh, async {
        state.repo.save_event(&event).await?.ok_or(sqlx::Error::RowNotFound)
    })
    .await?;

    if let Some(old) = previous.filter(|old| saved.gambar.as_ref() != Some(old)) {
        delete_images(state.storage.as_ref(), &[old]).await;
    }

    tracing::info!(id = %saved.id, by = %user.id, "event updated");
    Ok(respond("Event updated", saved))
}

#[utoipa::path(
    delete,
    path = "/api/event",
    tag = "event",
    params(IdQuery),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<Event>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_event(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
) -> ApiResult<Envelope<Event>> {
    user.require(&[Role::Admin, Role::Pengelola])?;

    let event = state.repo.get_event(id).await?.ok_or_else(not_found)?;
    user.ensure_can_modify(event.pengelola_id)?;

    if !state.repo.delete_event(id).await? {
        return Err(not_found());
    }
    if let Some(url) = &event.gambar {
        delete_images(state.storage.as_ref(), std::slice::from_ref(url)).await;
    }

    tracing::info!(id = %id, by = %user.id, "event deleted");
    Ok(respond("Event deleted", event))
}

#[utoipa::path(
    get,
    path = "/api/admin/event",
    tag = "admin",
    params(StatusQuery),
    responses((status = 200, description = "Events", body = ApiResponse<Vec<Event>>))
)]
pub async fn admin_list_event(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> ApiResult<Envelope<Vec<Event>>> {
    let filter = ContentFilter::by_status(query.status.unwrap_or_default());
    let items = state.repo.list_event(filter).await?;
    Ok(respond("Event retrieved", items))
}

#[utoipa::path(
    put,
    path = "/api/admin/event/verify",
    tag = "admin",
    params(IdQuery),
    request_body = VerificationRequest,
    responses(
        (status = 200, description = "Verification changed", body = ApiResponse<Event>),
        (status = 400, description = "Already in the requested state"),
        (status = 404, description = "Not found")
    )
)]
pub async fn verify_event(
    user: AuthUser,
    State(state): State<AppState>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
    ValidJson(body): ValidJson<VerificationRequest>,
) -> ApiResult<Envelope<Event>> {
    let mut event = state.repo.get_event(id).await?.ok_or_else(not_found)?;
    apply_verification(&mut event, body.is_verified, &user)?;
    let saved = state.repo.save_event(&event).await?.ok_or_else(not_found)?;

    tracing::info!(id = %id, admin = %user.id, verified = body.is_verified, "event verification changed");
    Ok(respond("Event verification updated", saved))
}
