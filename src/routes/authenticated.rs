use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Mutations and personal views. The session layer in `create_router` guarantees a
/// resolved `AuthUser`; handlers then check the role (`AuthUser::require`) and, for
/// existing rows, ownership (`AuthUser::ensure_can_modify`).
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/me
        .route("/api/me", get(handlers::accounts::get_me))
        // GET /api/me/{wisata,artikel,event}
        // A manager's own submissions, including those still pending verification.
        .route("/api/me/wisata", get(handlers::wisata::get_my_wisata))
        .route("/api/me/artikel", get(handlers::artikel::get_my_artikel))
        .route("/api/me/event", get(handlers::event::get_my_event))
        // POST, PUT ?id=, DELETE ?id= for each content type (multipart bodies).
        .route(
            "/api/wisata",
            post(handlers::wisata::create_wisata)
                .put(handlers::wisata::update_wisata)
                .delete(handlers::wisata::delete_wisata),
        )
        .route(
            "/api/artikel",
            post(handlers::artikel::create_artikel)
                .put(handlers::artikel::update_artikel)
                .delete(handlers::artikel::delete_artikel),
        )
        .route(
            "/api/event",
            post(handlers::event::create_event)
                .put(handlers::event::update_event)
                .delete(handlers::event::delete_event),
        )
        // PUT /api/pengelola?id= (self or admin), DELETE /api/pengelola?id= (admin)
        .route(
            "/api/pengelola",
            put(handlers::pengelola::update_pengelola).delete(handlers::pengelola::delete_pengelola),
        )
        // Reviews: visitors write, authors edit, admins moderate.
        .route(
            "/api/ulasan",
            post(handlers::ulasan::create_ulasan)
                .put(handlers::ulasan::update_ulasan)
                .delete(handlers::ulasan::delete_ulasan),
        )
}
