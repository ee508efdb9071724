//! HTTP handlers, one module per resource. Every handler returns `ApiResult`, so failures
//! leave through `ApiError`'s `{ error }` rendering and successes through `ApiResponse`.

pub mod accounts;
pub mod admin;
pub mod artikel;
pub mod event;
pub mod pengelola;
pub mod ulasan;
pub mod wisata;

use axum::{Json, http::StatusCode};
use std::future::Future;

use crate::{
    error::{ApiError, ApiResult},
    forms::MultipartForm,
    images::{IncomingFile, delete_images},
    models::ApiResponse,
    storage::StorageService,
};

/// Form field every content type submits its images under.
pub const IMAGE_FIELD: &str = "gambar";

pub type Envelope<T> = Json<ApiResponse<T>>;

pub(crate) fn respond<T>(message: &str, data: T) -> Envelope<T> {
    Json(ApiResponse::new(message, data))
}

pub(crate) fn created<T>(message: &str, data: T) -> (StatusCode, Envelope<T>) {
    (StatusCode::CREATED, respond(message, data))
}

/// persist_or_compensate
///
/// Awaits a repository write that follows an upload. When the write fails, the images
/// uploaded for it are removed again (best-effort) before the error is returned.
pub(crate) async fn persist_or_compensate<T, F>(
    storage: &dyn StorageService,
    fresh_images: &[String],
    write: F,
) -> ApiResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match write.await {
        Ok(value) => Ok(value),
        Err(e) => {
            if !fresh_images.is_empty() {
                tracing::warn!(count = fresh_images.len(), "persistence failed, removing fresh uploads");
                delete_images(storage, fresh_images).await;
            }
            Err(e.into())
        }
    }
}

/// Takes the single image a content type allows, rejecting a form that carries more.
pub(crate) fn single_image(form: &mut MultipartForm) -> ApiResult<Option<IncomingFile>> {
    let mut files = form.take_files(IMAGE_FIELD);
    if files.len() > 1 {
        return Err(ApiError::validation("Only one image may be uploaded"));
    }
    Ok(files.pop())
}
