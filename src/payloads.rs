use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{ApiError, ApiResult},
    forms::MultipartForm,
    models::{ArtikelKategori, ReviewTarget, Role, WisataKategori},
};

lazy_static! {
    /// Indonesian phone numbers: `08…` or `+628…`, 10 to 15 digits in total.
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^(\+62|0)8[0-9]{8,12}$").unwrap();
}

/// Strips surrounding whitespace while deserializing, so length rules see the stored text.
fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

fn trimmed_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(deserializer).map(|o| o.map(|s| s.trim().to_string()))
}

/// Runs `validator` rules on a payload built outside the JSON extractor.
pub fn validated<T: Validate>(payload: T) -> ApiResult<T> {
    payload.validate()?;
    Ok(payload)
}

// --- Accounts ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// LoginResponse
///
/// Session token plus enough identity for the frontend to pick a dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub id: Uuid,
    pub nama: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterPenggunaRequest {
    #[validate(length(min = 2, max = 100, message = "Nama must be 2-100 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub nama: String,
    #[validate(email(message = "Invalid email format"))]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPengelolaRequest {
    #[validate(length(min = 2, max = 100, message = "Nama must be 2-100 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub nama: String,
    #[validate(email(message = "Invalid email format"))]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
    #[validate(regex(path = "*PHONE_REGEX", message = "Invalid phone number"))]
    #[serde(deserialize_with = "trimmed")]
    pub no_hp: String,
    #[validate(length(min = 2, max = 150, message = "Nama usaha must be 2-150 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub nama_usaha: String,
}

/// UpdatePengelolaRequest
///
/// Partial profile update. `isVerified` is honoured for admins only.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePengelolaRequest {
    #[validate(length(min = 2, max = 100, message = "Nama must be 2-100 characters"))]
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub nama: Option<String>,
    #[validate(regex(path = "*PHONE_REGEX", message = "Invalid phone number"))]
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub no_hp: Option<String>,
    #[validate(length(min = 2, max = 150, message = "Nama usaha must be 2-150 characters"))]
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub nama_usaha: Option<String>,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

/// VerificationRequest
///
/// Body of every admin verify endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub is_verified: bool,
}

// --- Wisata ---

/// WisataInput
///
/// Content fields of a new destination, read from `multipart/form-data`.
#[derive(Debug, Clone, Validate, ToSchema)]
pub struct WisataInput {
    #[validate(length(min = 3, max = 150, message = "Nama must be 3-150 characters"))]
    pub nama: String,
    #[validate(length(min = 10, max = 5000, message = "Deskripsi must be 10-5000 characters"))]
    pub deskripsi: String,
    #[validate(length(min = 3, max = 255, message = "Lokasi must be 3-255 characters"))]
    pub lokasi: String,
    pub kategori: WisataKategori,
    #[validate(range(min = 0, message = "Harga tiket cannot be negative"))]
    pub harga_tiket: Option<i64>,
    #[validate(length(max = 100, message = "Jam operasional is at most 100 characters"))]
    pub jam_operasional: Option<String>,
}

impl WisataInput {
    pub fn from_form(form: &MultipartForm) -> ApiResult<Self> {
        validated(Self {
            nama: form.required("nama")?,
            deskripsi: form.required("deskripsi")?,
            lokasi: form.required("lokasi")?,
            kategori: parse_kategori(form, "kategori")?
                .ok_or_else(|| ApiError::validation("kategori is required"))?,
            harga_tiket: form.parse("hargaTiket")?,
            jam_operasional: form.text("jamOperasional"),
        })
    }
}

/// WisataChanges
///
/// Partial update of a destination; absent fields stay as they are.
#[derive(Debug, Clone, Validate, Default)]
pub struct WisataChanges {
    #[validate(length(min = 3, max = 150, message = "Nama must be 3-150 characters"))]
    pub nama: Option<String>,
    #[validate(length(min = 10, max = 5000, message = "Deskripsi must be 10-5000 characters"))]
    pub deskripsi: Option<String>,
    #[validate(length(min = 3, max = 255, message = "Lokasi must be 3-255 characters"))]
    pub lokasi: Option<String>,
    pub kategori: Option<WisataKategori>,
    #[validate(range(min = 0, message = "Harga tiket cannot be negative"))]
    pub harga_tiket: Option<i64>,
    #[validate(length(max = 100, message = "Jam operasional is at most 100 characters"))]
    pub jam_operasional: Option<String>,
    pub is_verified: Option<bool>,
}

impl WisataChanges {
    pub fn from_form(form: &MultipartForm) -> ApiResult<Self> {
        validated(Self {
            nama: form.text("nama"),
            deskripsi: form.text("deskripsi"),
            lokasi: form.text("lokasi"),
            kategori: parse_kategori(form, "kategori")?,
            harga_tiket: form.parse("hargaTiket")?,
            jam_operasional: form.text("jamOperasional"),
            is_verified: form.parse("isVerified")?,
        })
    }
}

// --- Artikel ---

#[derive(Debug, Clone, Validate, ToSchema)]
pub struct ArtikelInput {
    #[validate(length(min = 5, max = 200, message = "Judul must be 5-200 characters"))]
    pub judul: String,
    #[validate(length(min = 20, message = "Konten must be at least 20 characters"))]
    pub konten: String,
    pub kategori: ArtikelKategori,
}

impl ArtikelInput {
    pub fn from_form(form: &MultipartForm) -> ApiResult<Self> {
        validated(Self {
            judul: form.required("judul")?,
            konten: form.required("konten")?,
            kategori: parse_kategori(form, "kategori")?
                .ok_or_else(|| ApiError::validation("kategori is required"))?,
        })
    }
}

#[derive(Debug, Clone, Validate, Default)]
pub struct ArtikelChanges {
    #[validate(length(min = 5, max = 200, message = "Judul must be 5-200 characters"))]
    pub judul: Option<String>,
    #[validate(length(min = 20, message = "Konten must be at least 20 characters"))]
    pub konten: Option<String>,
    pub kategori: Option<ArtikelKategori>,
    pub is_verified: Option<bool>,
}

impl ArtikelChanges {
    pub fn from_form(form: &MultipartForm) -> ApiResult<Self> {
        validated(Self {
            judul: form.text("judul"),
            konten: form.text("konten"),
            kategori: parse_kategori(form, "kategori")?,
            is_verified: form.parse("isVerified")?,
        })
    }
}

// --- Event ---

/// EventInput
///
/// Dates are RFC 3339 timestamps; the end may not precede the start.
#[derive(Debug, Clone, Validate, ToSchema)]
pub struct EventInput {
    #[validate(length(min = 3, max = 150, message = "Nama must be 3-150 characters"))]
    pub nama: String,
    #[validate(length(min = 10, max = 5000, message = "Deskripsi must be 10-5000 characters"))]
    pub deskripsi: String,
    #[validate(length(min = 3, max = 255, message = "Lokasi must be 3-255 characters"))]
    pub lokasi: String,
    pub tanggal_mulai: DateTime<Utc>,
    pub tanggal_selesai: DateTime<Utc>,
    #[validate(range(min = 0, message = "Harga cannot be negative"))]
    pub harga: Option<i64>,
}

impl EventInput {
    pub fn from_form(form: &MultipartForm) -> ApiResult<Self> {
        let input = validated(Self {
            nama: form.required("nama")?,
            deskripsi: form.required("deskripsi")?,
            lokasi: form.required("lokasi")?,
            tanggal_mulai: form.parse_required("tanggalMulai")?,
            tanggal_selesai: form.parse_required("tanggalSelesai")?,
            harga: form.parse("harga")?,
        })?;
        check_event_dates(input.tanggal_mulai, input.tanggal_selesai)?;
        Ok(input)
    }
}

#[derive(Debug, Clone, Validate, Default)]
pub struct EventChanges {
    #[validate(length(min = 3, max = 150, message = "Nama must be 3-150 characters"))]
    pub nama: Option<String>,
    #[validate(length(min = 10, max = 5000, message = "Deskripsi must be 10-5000 characters"))]
    pub deskripsi: Option<String>,
    #[validate(length(min = 3, max = 255, message = "Lokasi must be 3-255 characters"))]
    pub lokasi: Option<String>,
    pub tanggal_mulai: Option<DateTime<Utc>>,
    pub tanggal_selesai: Option<DateTime<Utc>>,
    #[validate(range(min = 0, message = "Harga cannot be negative"))]
    pub harga: Option<i64>,
    pub is_verified: Option<bool>,
}

impl EventChanges {
    /// Date ordering is checked later, against the merged entity.
    pub fn from_form(form: &MultipartForm) -> ApiResult<Self> {
        validated(Self {
            nama: form.text("nama"),
            deskripsi: form.text("deskripsi"),
            lokasi: form.text("lokasi"),
            tanggal_mulai: form.parse("tanggalMulai")?,
            tanggal_selesai: form.parse("tanggalSelesai")?,
            harga: form.parse("harga")?,
            is_verified: form.parse("isVerified")?,
        })
    }
}

pub fn check_event_dates(mulai: DateTime<Utc>, selesai: DateTime<Utc>) -> ApiResult<()> {
    if selesai < mulai {
        return Err(ApiError::validation(
            "tanggalSelesai cannot be earlier than tanggalMulai",
        ));
    }
    Ok(())
}

// --- Ulasan ---

/// CreateUlasanRequest
///
/// Exactly one of `wisataId`, `artikelId`, `eventId` must be present.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateUlasanRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(min = 3, max = 2000, message = "Komentar must be 3-2000 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub komentar: String,
    pub wisata_id: Option<Uuid>,
    pub artikel_id: Option<Uuid>,
    pub event_id: Option<Uuid>,
}

impl CreateUlasanRequest {
    pub fn target(&self) -> ApiResult<ReviewTarget> {
        ReviewTarget::from_ids(self.wisata_id, self.artikel_id, self.event_id).ok_or_else(|| {
            ApiError::validation("Exactly one of wisataId, artikelId or eventId must be set")
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUlasanRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[validate(length(min = 3, max = 2000, message = "Komentar must be 3-2000 characters"))]
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub komentar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

fn parse_kategori<K>(form: &MultipartForm, name: &str) -> ApiResult<Option<K>>
where
    K: std::str::FromStr<Err = String>,
{
    form.text(name)
        .map(|raw| raw.parse::<K>().map_err(ApiError::Validation))
        .transpose()
}
