#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use geopark_portal::{
    AppState,
    auth::issue_token,
    config::AppConfig,
    create_router,
    credentials::hash_password,
    models::{
        Admin, Artikel, ContentFilter, DashboardStats, Event, Pengelola, Pengguna, ReviewTarget,
        Role, StoredCredential, Ulasan, UlasanFilter, UserProfile, Wisata,
    },
    repository::{Repository, RepositoryState},
    storage::{MockStorageService, StorageState},
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "rahasia-geopark";

// --- IN-MEMORY REPOSITORY ---

#[derive(Default)]
struct Tables {
    admin: Vec<(Admin, String)>,
    pengelola: Vec<(Pengelola, String)>,
    pengguna: Vec<(Pengguna, String)>,
    wisata: Vec<Wisata>,
    artikel: Vec<Artikel>,
    event: Vec<Event>,
    ulasan: Vec<Ulasan>,
}

/// Repository double backed by plain vectors. `fail_writes` makes every insert and save
/// fail, for exercising the upload compensation path.
#[derive(Default)]
pub struct InMemoryRepo {
    tables: Mutex<Tables>,
    pub fail_writes: bool,
}

fn simulated_failure() -> sqlx::Error {
    sqlx::Error::Protocol("simulated database failure".to_string())
}

fn replace_by_id<T: Clone>(rows: &mut [T], id: Uuid, row: &T, id_of: fn(&T) -> Uuid) -> Option<T> {
    let slot = rows.iter_mut().find(|r| id_of(r) == id)?;
    *slot = row.clone();
    Some(row.clone())
}

fn remove_by_id<T>(rows: &mut Vec<T>, id: Uuid, id_of: fn(&T) -> Uuid) -> bool {
    let before = rows.len();
    rows.retain(|r| id_of(r) != id);
    rows.len() != before
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    fn write_guard(&self) -> Result<(), sqlx::Error> {
        if self.fail_writes {
            Err(simulated_failure())
        } else {
            Ok(())
        }
    }

    // --- Seeding ---

    pub fn seed_admin(&self, email: &str) -> Uuid {
        let admin = Admin {
            id: Uuid::new_v4(),
            nama: "Admin Geopark".to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        let id = admin.id;
        let hash = hash_password(PASSWORD).unwrap();
        self.tables.lock().unwrap().admin.push((admin, hash));
        id
    }

    pub fn seed_pengelola(&self, email: &str, verified: bool) -> Uuid {
        let now = Utc::now();
        let pengelola = Pengelola {
            id: Uuid::new_v4(),
            nama: "Pak Pengelola".to_string(),
            email: email.to_string(),
            no_hp: "081234567890".to_string(),
            nama_usaha: "Karst Tour".to_string(),
            is_verified: verified,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        let id = pengelola.id;
        let hash = hash_password(PASSWORD).unwrap();
        self.tables.lock().unwrap().pengelola.push((pengelola, hash));
        id
    }

    pub fn seed_pengguna(&self, email: &str) -> Uuid {
        let pengguna = Pengguna {
            id: Uuid::new_v4(),
            nama: "Wisatawan".to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        let id = pengguna.id;
        let hash = hash_password(PASSWORD).unwrap();
        self.tables.lock().unwrap().pengguna.push((pengguna, hash));
        id
    }

    pub fn seed_wisata(&self, owner: Option<Uuid>, verified: bool, gambar: Vec<String>) -> Wisata {
        let now = Utc::now();
        let wisata = Wisata {
            id: Uuid::new_v4(),
            nama: "Pantai Klayar".to_string(),
            deskripsi: "Pantai karang dengan seruling samudra.".to_string(),
            lokasi: "Pacitan".to_string(),
            kategori: "alam".to_string(),
            harga_tiket: Some(10000),
            jam_operasional: Some("06:00-18:00".to_string()),
            gambar,
            pengelola_id: owner,
            is_verified: verified,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().wisata.push(wisata.clone());
        wisata
    }

    pub fn seed_artikel(&self, owner: Option<Uuid>, verified: bool, gambar: Option<String>) -> Artikel {
        let now = Utc::now();
        let artikel = Artikel {
            id: Uuid::new_v4(),
            judul: "Sejarah Gunung Sewu".to_string(),
            konten: "Kawasan karst Gunung Sewu terbentuk jutaan tahun lalu.".to_string(),
            kategori: "edukasi".to_string(),
            gambar,
            pengelola_id: owner,
            is_verified: verified,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().artikel.push(artikel.clone());
        artikel
    }

    pub fn seed_event(&self, owner: Option<Uuid>, verified: bool, gambar: Option<String>) -> Event {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            nama: "Festival Karst".to_string(),
            deskripsi: "Festival budaya tahunan di kawasan geopark.".to_string(),
            lokasi: "Wonosari".to_string(),
            tanggal_mulai: now + Duration::days(10),
            tanggal_selesai: now + Duration::days(12),
            harga: None,
            gambar,
            pengelola_id: owner,
            is_verified: verified,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().event.push(event.clone());
        event
    }

    pub fn seed_ulasan(&self, author: Uuid, target: ReviewTarget, verified: bool) -> Ulasan {
        let now = Utc::now();
        let (wisata_id, artikel_id, event_id) = target.columns();
        let ulasan = Ulasan {
            id: Uuid::new_v4(),
            pengguna_id: author,
            rating: 4,
            komentar: "Tempatnya bersih".to_string(),
            wisata_id,
            artikel_id,
            event_id,
            is_verified: verified,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().ulasan.push(ulasan.clone());
        ulasan
    }

    // --- Inspection ---

    pub fn wisata(&self, id: Uuid) -> Option<Wisata> {
        self.tables.lock().unwrap().wisata.iter().find(|w| w.id == id).cloned()
    }

    pub fn artikel(&self, id: Uuid) -> Option<Artikel> {
        self.tables.lock().unwrap().artikel.iter().find(|a| a.id == id).cloned()
    }

    pub fn event(&self, id: Uuid) -> Option<Event> {
        self.tables.lock().unwrap().event.iter().find(|e| e.id == id).cloned()
    }

    pub fn ulasan(&self, id: Uuid) -> Option<Ulasan> {
        self.tables.lock().unwrap().ulasan.iter().find(|u| u.id == id).cloned()
    }

    pub fn pengelola(&self, id: Uuid) -> Option<Pengelola> {
        self.tables
            .lock()
            .unwrap()
            .pengelola
            .iter()
            .find(|(p, _)| p.id == id)
            .map(|(p, _)| p.clone())
    }

    pub fn pengelola_hash(&self, id: Uuid) -> Option<String> {
        self.tables
            .lock()
            .unwrap()
            .pengelola
            .iter()
            .find(|(p, _)| p.id == id)
            .map(|(_, h)| h.clone())
    }

    pub fn wisata_count(&self) -> usize {
        self.tables.lock().unwrap().wisata.len()
    }

    pub fn pengguna_count(&self) -> usize {
        self.tables.lock().unwrap().pengguna.len()
    }
}

#[async_trait]
impl Repository for InMemoryRepo {
    async fn find_credential(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<StoredCredential>, sqlx::Error> {
        let email = email.to_lowercase();
        let t = self.tables.lock().unwrap();
        let found = match role {
            Role::Admin => t.admin.iter().find(|(a, _)| a.email.to_lowercase() == email).map(
                |(a, h)| StoredCredential {
                    id: a.id,
                    nama: a.nama.clone(),
                    email: a.email.clone(),
                    password_hash: h.clone(),
                    is_verified: true,
                },
            ),
            Role::Pengelola => t
                .pengelola
                .iter()
                .find(|(p, _)| p.email.to_lowercase() == email)
                .map(|(p, h)| StoredCredential {
                    id: p.id,
                    nama: p.nama.clone(),
                    email: p.email.clone(),
                    password_hash: h.clone(),
                    is_verified: p.is_verified,
                }),
            Role::Pengguna => t
                .pengguna
                .iter()
                .find(|(p, _)| p.email.to_lowercase() == email)
                .map(|(p, h)| StoredCredential {
                    id: p.id,
                    nama: p.nama.clone(),
                    email: p.email.clone(),
                    password_hash: h.clone(),
                    is_verified: true,
                }),
        };
        Ok(found)
    }

    async fn get_profile(&self, role: Role, id: Uuid) -> Result<Option<UserProfile>, sqlx::Error> {
        let t = self.tables.lock().unwrap();
        let profile = |id: Uuid, nama: &str, email: &str| UserProfile {
            id,
            nama: nama.to_string(),
            email: email.to_string(),
            role,
        };
        Ok(match role {
            Role::Admin => t.admin.iter().find(|(a, _)| a.id == id).map(|(a, _)| profile(a.id, &a.nama, &a.email)),
            Role::Pengelola => t.pengelola.iter().find(|(p, _)| p.id == id).map(|(p, _)| profile(p.id, &p.nama, &p.email)),
            Role::Pengguna => t.pengguna.iter().find(|(p, _)| p.id == id).map(|(p, _)| profile(p.id, &p.nama, &p.email)),
        })
    }

    async fn email_registered(&self, email: &str) -> Result<bool, sqlx::Error> {
        let email = email.to_lowercase();
        let t = self.tables.lock().unwrap();
        Ok(t.admin.iter().any(|(a, _)| a.email.to_lowercase() == email)
            || t.pengelola.iter().any(|(p, _)| p.email.to_lowercase() == email)
            || t.pengguna.iter().any(|(p, _)| p.email.to_lowercase() == email))
    }

    async fn create_pengguna(&self, pengguna: &Pengguna, password_hash: &str) -> Result<(), sqlx::Error> {
        self.write_guard()?;
        self.tables
            .lock()
            .unwrap()
            .pengguna
            .push((pengguna.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn create_admin(&self, admin: &Admin, password_hash: &str) -> Result<(), sqlx::Error> {
        self.write_guard()?;
        self.tables
            .lock()
            .unwrap()
            .admin
            .push((admin.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn create_pengelola(&self, pengelola: &Pengelola, password_hash: &str) -> Result<(), sqlx::Error> {
        self.write_guard()?;
        self.tables
            .lock()
            .unwrap()
            .pengelola
            .push((pengelola.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn list_pengelola(&self, verified: Option<bool>) -> Result<Vec<Pengelola>, sqlx::Error> {
        let t = self.tables.lock().unwrap();
        Ok(t.pengelola
            .iter()
            .filter(|(p, _)| verified.is_none_or(|v| v == p.is_verified))
            .map(|(p, _)| p.clone())
            .collect())
    }

    async fn get_pengelola(&self, id: Uuid) -> Result<Option<Pengelola>, sqlx::Error> {
        Ok(self.pengelola(id))
    }

    async fn save_pengelola(
        &self,
        pengelola: &Pengelola,
        new_password_hash: Option<&str>,
    ) -> Result<Option<Pengelola>, sqlx::Error> {
        self.write_guard()?;
        let mut t = self.tables.lock().unwrap();
        let Some(slot) = t.pengelola.iter_mut().find(|(p, _)| p.id == pengelola.id) else {
            return Ok(None);
        };
        slot.0 = pengelola.clone();
        if let Some(hash) = new_password_hash {
            slot.1 = hash.to_string();
        }
        Ok(Some(pengelola.clone()))
    }

    async fn delete_pengelola(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut t = self.tables.lock().unwrap();
        let before = t.pengelola.len();
        t.pengelola.retain(|(p, _)| p.id != id);
        Ok(t.pengelola.len() != before)
    }

    async fn list_wisata(&self, filter: ContentFilter) -> Result<Vec<Wisata>, sqlx::Error> {
        let t = self.tables.lock().unwrap();
        Ok(t.wisata
            .iter()
            .rev()
            .filter(|w| filter.matches(w.is_verified, w.pengelola_id))
            .cloned()
            .collect())
    }

    async fn get_wisata(&self, id: Uuid) -> Result<Option<Wisata>, sqlx::Error> {
        Ok(self.wisata(id))
    }

    async fn insert_wisata(&self, wisata: &Wisata) -> Result<Wisata, sqlx::Error> {
        self.write_guard()?;
        self.tables.lock().unwrap().wisata.push(wisata.clone());
        Ok(wisata.clone())
    }

    async fn save_wisata(&self, wisata: &Wisata) -> Result<Option<Wisata>, sqlx::Error> {
        self.write_guard()?;
        let mut t = self.tables.lock().unwrap();
        Ok(replace_by_id(&mut t.wisata, wisata.id, wisata, |w| w.id))
    }

    async fn delete_wisata(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(remove_by_id(&mut self.tables.lock().unwrap().wisata, id, |w| w.id))
    }

    async fn list_artikel(&self, filter: ContentFilter) -> Result<Vec<Artikel>, sqlx::Error> {
        let t = self.tables.lock().unwrap();
        Ok(t.artikel
            .iter()
            .rev()
            .filter(|a| filter.matches(a.is_verified, a.pengelola_id))
            .cloned()
            .collect())
    }

    async fn get_artikel(&self, id: Uuid) -> Result<Option<Artikel>, sqlx::Error> {
        Ok(self.artikel(id))
    }

    async fn insert_artikel(&self, artikel: &Artikel) -> Result<Artikel, sqlx::Error> {
        self.write_guard()?;
        self.tables.lock().unwrap().artikel.push(artikel.clone());
        Ok(artikel.clone())
    }

    async fn save_artikel(&self, artikel: &Artikel) -> Result<Option<Artikel>, sqlx::Error> {
        self.write_guard()?;
        let mut t = self.tables.lock().unwrap();
        Ok(replace_by_id(&mut t.artikel, artikel.id, artikel, |a| a.id))
    }

    async fn delete_artikel(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(remove_by_id(&mut self.tables.lock().unwrap().artikel, id, |a| a.id))
    }

    async fn list_event(&self, filter: ContentFilter) -> Result<Vec<Event>, sqlx::Error> {
        let t = self.tables.lock().unwrap();
        Ok(t.event
            .iter()
            .rev()
            .filter(|e| filter.matches(e.is_verified, e.pengelola_id))
            .cloned()
            .collect())
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>, sqlx::Error> {
        Ok(self.event(id))
    }

    async fn insert_event(&self, event: &Event) -> Result<Event, sqlx::Error> {
        self.write_guard()?;
        self.tables.lock().unwrap().event.push(event.clone());
        Ok(event.clone())
    }

    async fn save_event(&self, event: &Event) -> Result<Option<Event>, sqlx::Error> {
        self.write_guard()?;
        let mut t = self.tables.lock().unwrap();
        Ok(replace_by_id(&mut t.event, event.id, event, |e| e.id))
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(remove_by_id(&mut self.tables.lock().unwrap().event, id, |e| e.id))
    }

    async fn list_ulasan(&self, filter: UlasanFilter) -> Result<Vec<Ulasan>, sqlx::Error> {
        let t = self.tables.lock().unwrap();
        Ok(t.ulasan
            .iter()
            .rev()
            .filter(|u| filter.verified.is_none_or(|v| v == u.is_verified))
            .filter(|u| filter.target.is_none_or(|target| u.target() == Some(target)))
            .cloned()
            .collect())
    }

    async fn get_ulasan(&self, id: Uuid) -> Result<Option<Ulasan>, sqlx::Error> {
        Ok(self.ulasan(id))
    }

    async fn insert_ulasan(&self, ulasan: &Ulasan) -> Result<Ulasan, sqlx::Error> {
        self.write_guard()?;
        self.tables.lock().unwrap().ulasan.push(ulasan.clone());
        Ok(ulasan.clone())
    }

    async fn save_ulasan(&self, ulasan: &Ulasan) -> Result<Option<Ulasan>, sqlx::Error> {
        self.write_guard()?;
        let mut t = self.tables.lock().unwrap();
        Ok(replace_by_id(&mut t.ulasan, ulasan.id, ulasan, |u| u.id))
    }

    async fn delete_ulasan(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(remove_by_id(&mut self.tables.lock().unwrap().ulasan, id, |u| u.id))
    }

    async fn target_exists(&self, target: ReviewTarget) -> Result<bool, sqlx::Error> {
        let t = self.tables.lock().unwrap();
        Ok(match target {
            ReviewTarget::Wisata(id) => t.wisata.iter().any(|w| w.id == id && w.is_verified),
            ReviewTarget::Artikel(id) => t.artikel.iter().any(|a| a.id == id && a.is_verified),
            ReviewTarget::Event(id) => t.event.iter().any(|e| e.id == id && e.is_verified),
        })
    }

    async fn get_stats(&self) -> Result<DashboardStats, sqlx::Error> {
        let t = self.tables.lock().unwrap();
        let count = |n: usize| n as i64;
        Ok(DashboardStats {
            total_wisata: count(t.wisata.len()),
            total_artikel: count(t.artikel.len()),
            total_event: count(t.event.len()),
            total_ulasan: count(t.ulasan.len()),
            total_pengelola: count(t.pengelola.len()),
            total_pengguna: count(t.pengguna.len()),
            pending_wisata: count(t.wisata.iter().filter(|w| !w.is_verified).count()),
            pending_artikel: count(t.artikel.iter().filter(|a| !a.is_verified).count()),
            pending_event: count(t.event.iter().filter(|e| !e.is_verified).count()),
            pending_ulasan: count(t.ulasan.iter().filter(|u| !u.is_verified).count()),
            pending_pengelola: count(t.pengelola.iter().filter(|(p, _)| !p.is_verified).count()),
        })
    }
}

// --- STATE & AUTH HELPERS ---

pub fn test_state(repo: Arc<InMemoryRepo>, storage: Arc<MockStorageService>) -> AppState {
    AppState {
        repo: repo as RepositoryState,
        storage: storage as StorageState,
        config: AppConfig::default(),
    }
}

pub fn test_app(repo: Arc<InMemoryRepo>, storage: Arc<MockStorageService>) -> Router {
    create_router(test_state(repo, storage))
}

pub fn bearer(id: Uuid, role: Role) -> String {
    let token = issue_token(&AppConfig::default(), id, role).unwrap();
    format!("Bearer {}", token)
}

// --- REQUEST HELPERS ---

/// Sends one request through the router and returns the status plus the JSON body
/// (`Value::Null` for an empty or non-JSON body).
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn multipart_request(method: &str, uri: &str, auth: Option<&str>, form: MultipartBody) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, form.content_type());
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(form.finish())).unwrap()
}

/// Minimal `multipart/form-data` encoder for building request bodies in tests.
pub struct MultipartBody {
    boundary: String,
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "----geopark-test-boundary".to_string(),
            buf: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.buf
    }
}

/// A complete, valid wisata form without images.
pub fn wisata_form() -> MultipartBody {
    MultipartBody::new()
        .text("nama", "Goa Jomblang")
        .text("deskripsi", "Goa vertikal dengan cahaya surga.")
        .text("lokasi", "Gunungkidul")
        .text("kategori", "petualangan")
        .text("hargaTiket", "450000")
}

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];
