use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{
    Admin, Artikel, ContentFilter, DashboardStats, Event, Pengelola, Pengguna, ReviewTarget, Role,
    StoredCredential, Ulasan, UlasanFilter, UserProfile, Wisata,
};

/// Repository Trait
///
/// Every persistence operation the handlers need. Handlers build complete entities
/// (ids, timestamps, merged fields) and the repository only stores and loads them, so
/// the in-memory test implementation stays trivial.
///
/// `save_*` writes every mutable column and returns `None` when the row is gone.
/// `delete_*` returns whether a row was removed.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Accounts ---
    async fn find_credential(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<StoredCredential>, sqlx::Error>;
    async fn get_profile(&self, role: Role, id: Uuid) -> Result<Option<UserProfile>, sqlx::Error>;
    /// True when any of the three account tables already holds `email`.
    async fn email_registered(&self, email: &str) -> Result<bool, sqlx::Error>;
    async fn create_pengguna(&self, pengguna: &Pengguna, password_hash: &str) -> Result<(), sqlx::Error>;
    async fn create_admin(&self, admin: &Admin, password_hash: &str) -> Result<(), sqlx::Error>;

    // --- Pengelola ---
    async fn create_pengelola(&self, pengelola: &Pengelola, password_hash: &str) -> Result<(), sqlx::Error>;
    async fn list_pengelola(&self, verified: Option<bool>) -> Result<Vec<Pengelola>, sqlx::Error>;
    async fn get_pengelola(&self, id: Uuid) -> Result<Option<Pengelola>, sqlx::Error>;
    /// `new_password_hash` replaces the stored hash when present.
    async fn save_pengelola(
        &self,
        pengelola: &Pengelola,
        new_password_hash: Option<&str>,
    ) -> Result<Option<Pengelola>, sqlx::Error>;
    async fn delete_pengelola(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Wisata ---
    async fn list_wisata(&self, filter: ContentFilter) -> Result<Vec<Wisata>, sqlx::Error>;
    async fn get_wisata(&self, id: Uuid) -> Result<Option<Wisata>, sqlx::Error>;
    async fn insert_wisata(&self, wisata: &Wisata) -> Result<Wisata, sqlx::Error>;
    async fn save_wisata(&self, wisata: &Wisata) -> Result<Option<Wisata>, sqlx::Error>;
    async fn delete_wisata(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Artikel ---
    async fn list_artikel(&self, filter: ContentFilter) -> Result<Vec<Artikel>, sqlx::Error>;
    async fn get_artikel(&self, id: Uuid) -> Result<Option<Artikel>, sqlx::Error>;
    async fn insert_artikel(&self, artikel: &Artikel) -> Result<Artikel, sqlx::Error>;
    async fn save_artikel(&self, artikel: &Artikel) -> Result<Option<Artikel>, sqlx::Error>;
    async fn delete_artikel(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Event ---
    async fn list_event(&self, filter: ContentFilter) -> Result<Vec<Event>, sqlx::Error>;
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>, sqlx::Error>;
    async fn insert_event(&self, event: &Event) -> Result<Event, sqlx::Error>;
    async fn save_event(&self, event: &Event) -> Result<Option<Event>, sqlx::Error>;
    async fn delete_event(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Ulasan ---
    async fn list_ulasan(&self, filter: UlasanFilter) -> Result<Vec<Ulasan>, sqlx::Error>;
    async fn get_ulasan(&self, id: Uuid) -> Result<Option<Ulasan>, sqlx::Error>;
    async fn insert_ulasan(&self, ulasan: &Ulasan) -> Result<Ulasan, sqlx::Error>;
    async fn save_ulasan(&self, ulasan: &Ulasan) -> Result<Option<Ulasan>, sqlx::Error>;
    async fn delete_ulasan(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    /// True when the reviewed entity exists and is verified.
    async fn target_exists(&self, target: ReviewTarget) -> Result<bool, sqlx::Error>;

    // --- Dashboard ---
    async fn get_stats(&self) -> Result<DashboardStats, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const PENGELOLA_COLUMNS: &str =
    "id, nama, email, no_hp, nama_usaha, is_verified, updated_by, created_at, updated_at";
const WISATA_COLUMNS: &str = "id, nama, deskripsi, lokasi, kategori, harga_tiket, jam_operasional, \
     gambar, pengelola_id, is_verified, updated_by, created_at, updated_at";
const ARTIKEL_COLUMNS: &str =
    "id, judul, konten, kategori, gambar, pengelola_id, is_verified, updated_by, created_at, updated_at";
const EVENT_COLUMNS: &str = "id, nama, deskripsi, lokasi, tanggal_mulai, tanggal_selesai, harga, \
     gambar, pengelola_id, is_verified, updated_by, created_at, updated_at";
const ULASAN_COLUMNS: &str = "id, pengguna_id, rating, komentar, wisata_id, artikel_id, event_id, \
     is_verified, updated_by, created_at, updated_at";

/// Account table backing each role.
fn account_table(role: Role) -> &'static str {
    match role {
        Role::Admin => "admin",
        Role::Pengelola => "pengelola",
        Role::Pengguna => "pengguna",
    }
}

/// Appends the `WHERE` clause shared by every content listing.
fn push_content_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: ContentFilter) {
    builder.push(" WHERE TRUE");
    if let Some(verified) = filter.verified {
        builder.push(" AND is_verified = ");
        builder.push_bind(verified);
    }
    if let Some(owner) = filter.owner {
        builder.push(" AND pengelola_id = ");
        builder.push_bind(owner);
    }
    builder.push(" ORDER BY created_at DESC");
}

/// PostgresRepository
///
/// The `Repository` backed by PostgreSQL. All queries are parameterized; listings with
/// optional filters go through `QueryBuilder`.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn delete_by_id(&self, table: &str, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// find_credential
    ///
    /// Admin and pengguna accounts have no verification step, so they report `true`.
    async fn find_credential(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<StoredCredential>, sqlx::Error> {
        let verified = match role {
            Role::Pengelola => "is_verified",
            Role::Admin | Role::Pengguna => "TRUE AS is_verified",
        };
        let sql = format!(
            "SELECT id, nama, email, password_hash, {} FROM {} WHERE LOWER(email) = $1",
            verified,
            account_table(role)
        );
        sqlx::query_as::<_, StoredCredential>(&sql)
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_profile(&self, role: Role, id: Uuid) -> Result<Option<UserProfile>, sqlx::Error> {
        let sql = format!(
            "SELECT id, nama, email FROM {} WHERE id = $1",
            account_table(role)
        );
        let row = sqlx::query_as::<_, (Uuid, String, String)>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id, nama, email)| UserProfile { id, nama, email, role }))
    }

    async fn email_registered(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM admin WHERE LOWER(email) = $1)
                OR EXISTS (SELECT 1 FROM pengelola WHERE LOWER(email) = $1)
                OR EXISTS (SELECT 1 FROM pengguna WHERE LOWER(email) = $1)
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_one(&self.pool)
        .await
    }

    async fn create_pengguna(&self, pengguna: &Pengguna, password_hash: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO pengguna (id, nama, email, password_hash, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(pengguna.id)
        .bind(&pengguna.nama)
        .bind(&pengguna.email)
        .bind(password_hash)
        .bind(pengguna.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn create_admin(&self, admin: &Admin, password_hash: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO admin (id, nama, email, password_hash, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(admin.id)
        .bind(&admin.nama)
        .bind(&admin.email)
        .bind(password_hash)
        .bind(admin.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // --- PENGELOLA ---

    async fn create_pengelola(&self, pengelola: &Pengelola, password_hash: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO pengelola
                (id, nama, email, password_hash, no_hp, nama_usaha, is_verified, updated_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(pengelola.id)
        .bind(&pengelola.nama)
        .bind(&pengelola.email)
        .bind(password_hash)
        .bind(&pengelola.no_hp)
        .bind(&pengelola.nama_usaha)
        .bind(pengelola.is_verified)
        .bind(pengelola.updated_by)
        .bind(pengelola.created_at)
        .bind(pengelola.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_pengelola(&self, verified: Option<bool>) -> Result<Vec<Pengelola>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM pengelola WHERE TRUE",
            PENGELOLA_COLUMNS
        ));
        if let Some(verified) = verified {
            builder.push(" AND is_verified = ");
            builder.push_bind(verified);
        }
        builder.push(" ORDER BY created_at DESC");
        builder.build_query_as::<Pengelola>().fetch_all(&self.pool).await
    }

    async fn get_pengelola(&self, id: Uuid) -> Result<Option<Pengelola>, sqlx::Error> {
        sqlx::query_as::<_, Pengelola>(&format!(
            "SELECT {} FROM pengelola WHERE id = $1",
            PENGELOLA_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_pengelola(
        &self,
        pengelola: &Pengelola,
        new_password_hash: Option<&str>,
    ) -> Result<Option<Pengelola>, sqlx::Error> {
        sqlx::query_as::<_, Pengelola>(&format!(
            r#"
            UPDATE pengelola
            SET nama = $2, no_hp = $3, nama_usaha = $4, is_verified = $5, updated_by = $6,
                updated_at = $7, password_hash = COALESCE($8, password_hash)
            WHERE id = $1
            RETURNING {}
            "#,
            PENGELOLA_COLUMNS
        ))
        .bind(pengelola.id)
        .bind(&pengelola.nama)
        .bind(&pengelola.no_hp)
        .bind(&pengelola.nama_usaha)
        .bind(pengelola.is_verified)
        .bind(pengelola.updated_by)
        .bind(pengelola.updated_at)
        .bind(new_password_hash)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_pengelola(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        self.delete_by_id("pengelola", id).await
    }

    // --- WISATA ---

    async fn list_wisata(&self, filter: ContentFilter) -> Result<Vec<Wisata>, sqlx::Error> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM wisata", WISATA_COLUMNS));
        push_content_filter(&mut builder, filter);
        builder.build_query_as::<Wisata>().fetch_all(&self.pool).await
    }

    async fn get_wisata(&self, id: Uuid) -> Result<Option<Wisata>, sqlx::Error> {
        sqlx::query_as::<_, Wisata>(&format!("SELECT {} FROM wisata WHERE id = $1", WISATA_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_wisata(&self, wisata: &Wisata) -> Result<Wisata, sqlx::Error> {
        sqlx::query_as::<_, Wisata>(&format!(
            r#"
            INSERT INTO wisata ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {cols}
            "#,
            cols = WISATA_COLUMNS
        ))
        .bind(wisata.id)
        .bind(&wisata.nama)
        .bind(&wisata.deskripsi)
        .bind(&wisata.lokasi)
        .bind(&wisata.kategori)
        .bind(wisata.harga_tiket)
        .bind(&wisata.jam_operasional)
        .bind(&wisata.gambar)
        .bind(wisata.pengelola_id)
        .bind(wisata.is_verified)
        .bind(wisata.updated_by)
        .bind(wisata.created_at)
        .bind(wisata.updated_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn save_wisata(&self, wisata: &Wisata) -> Result<Option<Wisata>, sqlx::Error> {
        sqlx::query_as::<_, Wisata>(&format!(
            r#"
            UPDATE wisata
            SET nama = $2, deskripsi = $3, lokasi = $4, kategori = $5, harga_tiket = $6,
                jam_operasional = $7, gambar = $8, is_verified = $9, updated_by = $10,
                updated_at = $11
            WHERE id = $1
            RETURNING {}
            "#,
            WISATA_COLUMNS
        ))
        .bind(wisata.id)
        .bind(&wisata.nama)
        .bind(&wisata.deskripsi)
        .bind(&wisata.lokasi)
        .bind(&wisata.kategori)
        .bind(wisata.harga_tiket)
        .bind(&wisata.jam_operasional)
        .bind(&wisata.gambar)
        .bind(wisata.is_verified)
        .bind(wisata.updated_by)
        .bind(wisata.updated_at)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_wisata(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        self.delete_by_id("wisata", id).await
    }

    // --- ARTIKEL ---

    async fn list_artikel(&self, filter: ContentFilter) -> Result<Vec<Artikel>, sqlx::Error> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM artikel", ARTIKEL_COLUMNS));
        push_content_filter(&mut builder, filter);
        builder.build_query_as::<Artikel>().fetch_all(&self.pool).await
    }

    async fn get_artikel(&self, id: Uuid) -> Result<Option<Artikel>, sqlx::Error> {
        sqlx::query_as::<_, Artikel>(&format!("SELECT {} FROM artikel WHERE id = $1", ARTIKEL_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_artikel(&self, artikel: &Artikel) -> Result<Artikel, sqlx::Error> {
        sqlx::query_as::<_, Artikel>(&format!(
            r#"
            INSERT INTO artikel ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {cols}
            "#,
            cols = ARTIKEL_COLUMNS
        ))
        .bind(artikel.id)
        .bind(&artikel.judul)
        .bind(&artikel.konten)
        .bind(&artikel.kategori)
        .bind(&artikel.gambar)
        .bind(artikel.pengelola_id)
        .bind(artikel.is_verified)
        .bind(artikel.updated_by)
        .bind(artikel.created_at)
        .bind(artikel.updated_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn save_artikel(&self, artikel: &Artikel) -> Result<Option<Artikel>, sqlx::Error> {
        sqlx::query_as::<_, Artikel>(&format!(
            r#"
            UPDATE artikel
            SET judul = $2, konten = $3, kategori = $4, gambar = $5, is_verified = $6,
                updated_by = $7, updated_at = $8
            WHERE id = $1
            RETURNING {}
            "#,
            ARTIKEL_COLUMNS
        ))
        .bind(artikel.id)
        .bind(&artikel.judul)
        .bind(&artikel.konten)
        .bind(&artikel.kategori)
        .bind(&artikel.gambar)
        .bind(artikel.is_verified)
        .bind(artikel.updated_by)
        .bind(artikel.updated_at)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_artikel(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        self.delete_by_id("artikel", id).await
    }

    // --- EVENT ---

    async fn list_event(&self, filter: ContentFilter) -> Result<Vec<Event>, sqlx::Error> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM event", EVENT_COLUMNS));
        push_content_filter(&mut builder, filter);
        builder.build_query_as::<Event>().fetch_all(&self.pool).await
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!("SELECT {} FROM event WHERE id = $1", EVENT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_event(&self, event: &Event) -> Result<Event, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO event ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {cols}
            "#,
            cols = EVENT_COLUMNS
        ))
        .bind(event.id)
        .bind(&event.nama)
        .bind(&event.deskripsi)
        .bind(&event.lokasi)
        .bind(event.tanggal_mulai)
        .bind(event.tanggal_selesai)
        .bind(event.harga)
        .bind(&event.gambar)
        .bind(event.pengelola_id)
        .bind(event.is_verified)
        .bind(event.updated_by)
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn save_event(&self, event: &Event) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE event
            SET nama = $2, deskripsi = $3, lokasi = $4, tanggal_mulai = $5, tanggal_selesai = $6,
                harga = $7, gambar = $8, is_verified = $9, updated_by = $10, updated_at = $11
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(event.id)
        .bind(&event.nama)
        .bind(&event.deskripsi)
        .bind(&event.lokasi)
        .bind(event.tanggal_mulai)
        .bind(event.tanggal_selesai)
        .bind(event.harga)
        .bind(&event.gambar)
        .bind(event.is_verified)
        .bind(event.updated_by)
        .bind(event.updated_at)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        self.delete_by_id("event", id).await
    }

    // --- ULASAN ---

    async fn list_ulasan(&self, filter: UlasanFilter) -> Result<Vec<Ulasan>, sqlx::Error> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM ulasan WHERE TRUE", ULASAN_COLUMNS));
        if let Some(verified) = filter.verified {
            builder.push(" AND is_verified = ");
            builder.push_bind(verified);
        }
        if let Some(target) = filter.target {
            let (column, id) = match target {
                ReviewTarget::Wisata(id) => (" AND wisata_id = ", id),
                ReviewTarget::Artikel(id) => (" AND artikel_id = ", id),
                ReviewTarget::Event(id) => (" AND event_id = ", id),
            };
            builder.push(column);
            builder.push_bind(id);
        }
        builder.push(" ORDER BY created_at DESC");
        builder.build_query_as::<Ulasan>().fetch_all(&self.pool).await
    }

    async fn get_ulasan(&self, id: Uuid) -> Result<Option<Ulasan>, sqlx::Error> {
        sqlx::query_as::<_, Ulasan>(&format!("SELECT {} FROM ulasan WHERE id = $1", ULASAN_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_ulasan(&self, ulasan: &Ulasan) -> Result<Ulasan, sqlx::Error> {
        sqlx::query_as::<_, Ulasan>(&format!(
            r#"
            INSERT INTO ulasan ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {cols}
            "#,
            cols = ULASAN_COLUMNS
        ))
        .bind(ulasan.id)
        .bind(ulasan.pengguna_id)
        .bind(ulasan.rating)
        .bind(&ulasan.komentar)
        .bind(ulasan.wisata_id)
        .bind(ulasan.artikel_id)
        .bind(ulasan.event_id)
        .bind(ulasan.is_verified)
        .bind(ulasan.updated_by)
        .bind(ulasan.created_at)
        .bind(ulasan.updated_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn save_ulasan(&self, ulasan: &Ulasan) -> Result<Option<Ulasan>, sqlx::Error> {
        sqlx::query_as::<_, Ulasan>(&format!(
            r#"
            UPDATE ulasan
            SET rating = $2, komentar = $3, is_verified = $4, updated_by = $5, updated_at = $6
            WHERE id = $1
            RETURNING {}
            "#,
            ULASAN_COLUMNS
        ))
        .bind(ulasan.id)
        .bind(ulasan.rating)
        .bind(&ulasan.komentar)
        .bind(ulasan.is_verified)
        .bind(ulasan.updated_by)
        .bind(ulasan.updated_at)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_ulasan(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        self.delete_by_id("ulasan", id).await
    }

    async fn target_exists(&self, target: ReviewTarget) -> Result<bool, sqlx::Error> {
        let (table, id) = match target {
            ReviewTarget::Wisata(id) => ("wisata", id),
            ReviewTarget::Artikel(id) => ("artikel", id),
            ReviewTarget::Event(id) => ("event", id),
        };
        sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1 AND is_verified = TRUE)",
            table
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }

    // --- DASHBOARD ---

    /// get_stats
    ///
    /// All dashboard counters in one round trip.
    async fn get_stats(&self) -> Result<DashboardStats, sqlx::Error> {
        sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM wisata) AS total_wisata,
                (SELECT COUNT(*) FROM artikel) AS total_artikel,
                (SELECT COUNT(*) FROM event) AS total_event,
                (SELECT COUNT(*) FROM ulasan) AS total_ulasan,
                (SELECT COUNT(*) FROM pengelola) AS total_pengelola,
                (SELECT COUNT(*) FROM pengguna) AS total_pengguna,
                (SELECT COUNT(*) FROM wisata WHERE NOT is_verified) AS pending_wisata,
                (SELECT COUNT(*) FROM artikel WHERE NOT is_verified) AS pending_artikel,
                (SELECT COUNT(*) FROM event WHERE NOT is_verified) AS pending_event,
                (SELECT COUNT(*) FROM ulasan WHERE NOT is_verified) AS pending_ulasan,
                (SELECT COUNT(*) FROM pengelola WHERE NOT is_verified) AS pending_pengelola
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }
}
