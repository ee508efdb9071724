use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod forms;
pub mod handlers;
pub mod images;
pub mod models;
pub mod payloads;
pub mod repository;
pub mod storage;
pub mod verification;

// Routing segregated by access level (public, authenticated, admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use repository::{PostgresRepository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and schema into the OpenAPI document
/// served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::accounts::register_pengguna, handlers::accounts::login, handlers::accounts::get_me,
        handlers::pengelola::register_pengelola, handlers::pengelola::update_pengelola,
        handlers::pengelola::delete_pengelola, handlers::pengelola::admin_list_pengelola,
        handlers::pengelola::verify_pengelola,
        handlers::wisata::list_wisata, handlers::wisata::get_wisata, handlers::wisata::get_my_wisata,
        handlers::wisata::create_wisata, handlers::wisata::update_wisata, handlers::wisata::delete_wisata,
        handlers::wisata::admin_list_wisata, handlers::wisata::verify_wisata,
        handlers::artikel::list_artikel, handlers::artikel::get_artikel, handlers::artikel::get_my_artikel,
        handlers::artikel::create_artikel, handlers::artikel::update_artikel, handlers::artikel::delete_artikel,
        handlers::artikel::admin_list_artikel, handlers::artikel::verify_artikel,
        handlers::event::list_event, handlers::event::get_event, handlers::event::get_my_event,
        handlers::event::create_event, handlers::event::update_event, handlers::event::delete_event,
        handlers::event::admin_list_event, handlers::event::verify_event,
        handlers::ulasan::list_ulasan, handlers::ulasan::create_ulasan, handlers::ulasan::update_ulasan,
        handlers::ulasan::delete_ulasan, handlers::ulasan::admin_list_ulasan, handlers::ulasan::verify_ulasan,
        handlers::admin::get_admin_stats,
    ),
    components(
        schemas(
            models::Role, models::Pengelola, models::Pengguna, models::UserProfile,
            models::Wisata, models::Artikel, models::Event, models::Ulasan,
            models::WisataKategori, models::ArtikelKategori, models::VerificationFilter,
            models::DashboardStats,
            payloads::LoginRequest, payloads::LoginResponse, payloads::RegisterPenggunaRequest,
            payloads::RegisterPengelolaRequest, payloads::UpdatePengelolaRequest,
            payloads::VerificationRequest, payloads::WisataInput, payloads::ArtikelInput,
            payloads::EventInput, payloads::CreateUlasanRequest, payloads::UpdateUlasanRequest,
        )
    ),
    tags(
        (name = "geopark-portal", description = "Geopark tourism content API")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// The single shared container for the services every handler needs. Built once in
/// `main` (or per test) and cloned cheaply into each request.
#[derive(Clone)]
pub struct AppState {
    /// Persistence, backed by the Postgres pool in production.
    pub repo: RepositoryState,
    /// Image object storage (S3/MinIO).
    pub storage: StorageState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Lets extractors such as `AuthUser` pull single components out of `AppState`.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Session gate for the authenticated router. Extracting `AuthUser` rejects the request
/// with 401 before any handler (or body parsing) runs.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// Image parts a single multipart body may carry, used to size the body limit.
const MAX_FILES_PER_REQUEST: usize = 10;
/// Room for the text fields and multipart framing around the files.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// create_router
///
/// Assembles every route, its access layer, and the global observability stack.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_image_bytes
        .saturating_mul(MAX_FILES_PER_REQUEST)
        .saturating_add(FORM_OVERHEAD_BYTES);

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        // Same paths as some public reads (e.g. /api/wisata); axum merges them per method,
        // and the session layer only wraps the methods registered here.
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .nest(
            "/api/admin",
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                handlers::admin::require_admin,
            )),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span, tagged with the `x-request-id` set by `SetRequestIdLayer`
/// so every log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
