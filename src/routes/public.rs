use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Unauthenticated endpoints. Every read here must only ever return verified content;
/// the handlers filter on `is_verified` themselves.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // POST /api/auth/register, /api/auth/login
        .route("/api/auth/register", post(handlers::accounts::register_pengguna))
        .route("/api/auth/login", post(handlers::accounts::login))
        // POST /api/pengelola
        // Manager sign-up. The account stays locked until an admin verifies it.
        .route("/api/pengelola", post(handlers::pengelola::register_pengelola))
        // GET /api/{wisata,artikel,event}[/{id}]
        .route("/api/wisata", get(handlers::wisata::list_wisata))
        .route("/api/wisata/{id}", get(handlers::wisata::get_wisata))
        .route("/api/artikel", get(handlers::artikel::list_artikel))
        .route("/api/artikel/{id}", get(handlers::artikel::get_artikel))
        .route("/api/event", get(handlers::event::list_event))
        .route("/api/event/{id}", get(handlers::event::get_event))
        // GET /api/ulasan?wisataId=|artikelId=|eventId=
        .route("/api/ulasan", get(handlers::ulasan::list_ulasan))
}
