use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// --- Roles & Envelope ---

/// Role
///
/// The three account kinds. Each lives in its own table; the session token carries the
/// role so the gate knows which table to resolve the caller against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Pengelola,
    Pengguna,
}

impl Role {
    /// Order in which login searches the account tables. Earlier tables shadow later ones for a shared email.
    pub const LOGIN_ORDER: [Role; 3] = [Role::Admin, Role::Pengelola, Role::Pengguna];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Pengelola => "pengelola",
            Role::Pengguna => "pengguna",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "pengelola" => Ok(Role::Pengelola),
            "pengguna" => Ok(Role::Pengguna),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// ApiResponse
///
/// Success envelope shared by every endpoint: `{ message, data }`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

// --- Accounts ---

/// Admin
///
/// Row of the `admin` table. There is no registration endpoint; the first admin is created
/// at startup from `ADMIN_EMAIL`/`ADMIN_PASSWORD` (see `credentials::bootstrap_admin`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Admin {
    pub id: Uuid,
    pub nama: String,
    pub email: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Pengelola
///
/// A content manager account. Login is refused until an admin verifies it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Pengelola {
    pub id: Uuid,
    pub nama: String,
    pub email: String,
    pub no_hp: String,
    pub nama_usaha: String,
    pub is_verified: bool,
    pub updated_by: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Pengguna
///
/// A registered visitor. Visitors write reviews and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Pengguna {
    pub id: Uuid,
    pub nama: String,
    pub email: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// StoredCredential
///
/// What the credential verifier needs from any of the three account tables. Admin and
/// pengguna rows report `is_verified = true`.
#[derive(Debug, Clone, FromRow)]
pub struct StoredCredential {
    pub id: Uuid,
    pub nama: String,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,
}

/// UserProfile
///
/// The caller's own identity (GET /api/me), uniform across roles.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub nama: String,
    pub email: String,
    pub role: Role,
}

// --- Content ---

/// Wisata
///
/// A tourist destination. `gambar` holds the public URLs of its uploaded images.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Wisata {
    pub id: Uuid,
    pub nama: String,
    pub deskripsi: String,
    pub lokasi: String,
    pub kategori: String,
    pub harga_tiket: Option<i64>,
    pub jam_operasional: Option<String>,
    pub gambar: Vec<String>,
    pub pengelola_id: Option<Uuid>,
    pub is_verified: bool,
    pub updated_by: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Artikel
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Artikel {
    pub id: Uuid,
    pub judul: String,
    pub konten: String,
    pub kategori: String,
    pub gambar: Option<String>,
    pub pengelola_id: Option<Uuid>,
    pub is_verified: bool,
    pub updated_by: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Event
///
/// A dated happening at the geopark. `tanggal_selesai` is never before `tanggal_mulai`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Event {
    pub id: Uuid,
    pub nama: String,
    pub deskripsi: String,
    pub lokasi: String,
    #[ts(type = "string")]
    pub tanggal_mulai: DateTime<Utc>,
    #[ts(type = "string")]
    pub tanggal_selesai: DateTime<Utc>,
    pub harga: Option<i64>,
    pub gambar: Option<String>,
    pub pengelola_id: Option<Uuid>,
    pub is_verified: bool,
    pub updated_by: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Ulasan
///
/// A visitor review. Exactly one of `wisata_id`, `artikel_id`, `event_id` is set; use
/// [`Ulasan::target`] rather than reading the three columns directly.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Ulasan {
    pub id: Uuid,
    pub pengguna_id: Uuid,
    pub rating: i32,
    pub komentar: String,
    pub wisata_id: Option<Uuid>,
    pub artikel_id: Option<Uuid>,
    pub event_id: Option<Uuid>,
    pub is_verified: bool,
    pub updated_by: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl Ulasan {
    pub fn target(&self) -> Option<ReviewTarget> {
        ReviewTarget::from_ids(self.wisata_id, self.artikel_id, self.event_id)
    }
}

/// ReviewTarget
///
/// The one entity a review is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewTarget {
    Wisata(Uuid),
    Artikel(Uuid),
    Event(Uuid),
}

impl ReviewTarget {
    /// Returns `None` unless exactly one id is present.
    pub fn from_ids(
        wisata_id: Option<Uuid>,
        artikel_id: Option<Uuid>,
        event_id: Option<Uuid>,
    ) -> Option<Self> {
        match (wisata_id, artikel_id, event_id) {
            (Some(id), None, None) => Some(ReviewTarget::Wisata(id)),
            (None, Some(id), None) => Some(ReviewTarget::Artikel(id)),
            (None, None, Some(id)) => Some(ReviewTarget::Event(id)),
            _ => None,
        }
    }

    /// Splits back into the `(wisata_id, artikel_id, event_id)` column triple.
    pub fn columns(self) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
        match self {
            ReviewTarget::Wisata(id) => (Some(id), None, None),
            ReviewTarget::Artikel(id) => (None, Some(id), None),
            ReviewTarget::Event(id) => (None, None, Some(id)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReviewTarget::Wisata(_) => "wisata",
            ReviewTarget::Artikel(_) => "artikel",
            ReviewTarget::Event(_) => "event",
        }
    }
}

/// WisataKategori
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum WisataKategori {
    Alam,
    Budaya,
    Edukasi,
    Kuliner,
    Petualangan,
}

impl WisataKategori {
    pub fn as_str(self) -> &'static str {
        match self {
            WisataKategori::Alam => "alam",
            WisataKategori::Budaya => "budaya",
            WisataKategori::Edukasi => "edukasi",
            WisataKategori::Kuliner => "kuliner",
            WisataKategori::Petualangan => "petualangan",
        }
    }
}

impl FromStr for WisataKategori {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alam" => Ok(WisataKategori::Alam),
            "budaya" => Ok(WisataKategori::Budaya),
            "edukasi" => Ok(WisataKategori::Edukasi),
            "kuliner" => Ok(WisataKategori::Kuliner),
            "petualangan" => Ok(WisataKategori::Petualangan),
            other => Err(format!(
                "kategori must be one of alam, budaya, edukasi, kuliner, petualangan (got '{}')",
                other
            )),
        }
    }
}

/// ArtikelKategori
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ArtikelKategori {
    Berita,
    Edukasi,
    Budaya,
    Tips,
}

impl ArtikelKategori {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtikelKategori::Berita => "berita",
            ArtikelKategori::Edukasi => "edukasi",
            ArtikelKategori::Budaya => "budaya",
            ArtikelKategori::Tips => "tips",
        }
    }
}

impl FromStr for ArtikelKategori {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "berita" => Ok(ArtikelKategori::Berita),
            "edukasi" => Ok(ArtikelKategori::Edukasi),
            "budaya" => Ok(ArtikelKategori::Budaya),
            "tips" => Ok(ArtikelKategori::Tips),
            other => Err(format!(
                "kategori must be one of berita, edukasi, budaya, tips (got '{}')",
                other
            )),
        }
    }
}

// --- Query Parameters ---

/// IdQuery
///
/// `?id=` selector used by every PUT and DELETE endpoint.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct IdQuery {
    pub id: Uuid,
}

/// VerificationFilter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationFilter {
    Pending,
    Verified,
    #[default]
    All,
}

impl VerificationFilter {
    /// The `is_verified` value to match, or `None` for no constraint.
    pub fn as_flag(self) -> Option<bool> {
        match self {
            VerificationFilter::Pending => Some(false),
            VerificationFilter::Verified => Some(true),
            VerificationFilter::All => None,
        }
    }
}

/// StatusQuery
///
/// Optional `?status=pending|verified|all` filter on admin listings.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams, Default)]
pub struct StatusQuery {
    pub status: Option<VerificationFilter>,
}

/// UlasanQuery
///
/// Public review listing selector. Exactly one target must be given.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams, Default)]
#[serde(rename_all = "camelCase")]
pub struct UlasanQuery {
    pub wisata_id: Option<Uuid>,
    pub artikel_id: Option<Uuid>,
    pub event_id: Option<Uuid>,
}

/// ContentFilter
///
/// Repository-level listing constraints shared by every content type.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContentFilter {
    pub verified: Option<bool>,
    pub owner: Option<Uuid>,
}

impl ContentFilter {
    pub fn verified_only() -> Self {
        Self {
            verified: Some(true),
            owner: None,
        }
    }

    pub fn by_status(status: VerificationFilter) -> Self {
        Self {
            verified: status.as_flag(),
            owner: None,
        }
    }

    pub fn owned_by(owner: Uuid) -> Self {
        Self {
            verified: None,
            owner: Some(owner),
        }
    }

    pub fn matches(&self, is_verified: bool, owner: Option<Uuid>) -> bool {
        self.verified.is_none_or(|v| v == is_verified)
            && self.owner.is_none_or(|o| owner == Some(o))
    }
}

/// UlasanFilter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UlasanFilter {
    pub verified: Option<bool>,
    pub target: Option<ReviewTarget>,
}

// --- Dashboard ---

/// DashboardStats
///
/// Counters for the admin dashboard (GET /api/admin/stats).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub total_wisata: i64,
    pub total_artikel: i64,
    pub total_event: i64,
    pub total_ulasan: i64,
    pub total_pengelola: i64,
    pub total_pengguna: i64,
    pub pending_wisata: i64,
    pub pending_artikel: i64,
    pub pending_event: i64,
    pub pending_ulasan: i64,
    pub pending_pengelola: i64,
}
