use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, put},
};

/// Admin Router Module
///
/// Moderation and oversight, nested under `/api/admin`. `create_router` wraps this
/// router in `handlers::admin::require_admin`, so no handler here runs for a non-admin.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/admin/stats
        .route("/stats", get(handlers::admin::get_admin_stats))
        // GET /api/admin/<entity>?status=pending|verified|all
        // PUT /api/admin/<entity>/verify?id=  { "isVerified": bool }
        .route("/wisata", get(handlers::wisata::admin_list_wisata))
        .route("/wisata/verify", put(handlers::wisata::verify_wisata))
        .route("/artikel", get(handlers::artikel::admin_list_artikel))
        .route("/artikel/verify", put(handlers::artikel::verify_artikel))
        .route("/event", get(handlers::event::admin_list_event))
        .route("/event/verify", put(handlers::event::verify_event))
        .route("/ulasan", get(handlers::ulasan::admin_list_ulasan))
        .route("/ulasan/verify", put(handlers::ulasan::verify_ulasan))
        .route("/pengelola", get(handlers::pengelola::admin_list_pengelola))
        .route("/pengelola/verify", put(handlers::pengelola::verify_pengelola))
}
