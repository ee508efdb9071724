use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::{Envelope, respond};
use crate::{
    AppState,
    auth::AuthUser,
    error::ApiResult,
    models::{ApiResponse, DashboardStats, Role},
};

/// require_admin
///
/// Route layer for the `/api/admin` router: resolves the caller (401 without a session)
/// and rejects anyone who is not an admin with 403 before the handler runs.
pub async fn require_admin(user: AuthUser, request: Request, next: Next) -> ApiResult<Response> {
    user.require(&[Role::Admin])?;
    Ok(next.run(request).await)
}

/// get_admin_stats
///
/// [Admin Route] Totals and pending (unverified) counts for every entity.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "admin",
    responses(
        (status = 200, description = "Dashboard counters", body = ApiResponse<DashboardStats>),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn get_admin_stats(State(state): State<AppState>) -> ApiResult<Envelope<DashboardStats>> {
    let stats = state.repo.get_stats().await?;
    Ok(respond("Stats retrieved", stats))
}
