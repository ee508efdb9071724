use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::{ApiError, ApiResult},
    models::Role,
    repository::RepositoryState,
};

/// Claims
///
/// Payload of a session token. `role` tells the gate which account table `sub` lives in.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity of an authenticated request. Handlers take it as an argument and
/// call [`AuthUser::require`] with the roles they accept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    /// require
    ///
    /// The role gate: succeeds only when the caller's role is in `roles`.
    pub fn require(&self, roles: &[Role]) -> ApiResult<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            tracing::debug!(user = %self.id, role = %self.role, "role not permitted");
            Err(ApiError::forbidden("You do not have access to this resource"))
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Ownership check: admins may touch anything, everyone else only what they own.
    pub fn ensure_can_modify(&self, owner: Option<Uuid>) -> ApiResult<()> {
        if self.is_admin() || owner == Some(self.id) {
            Ok(())
        } else {
            Err(ApiError::forbidden("You can only modify your own data"))
        }
    }
}

/// issue_token
///
/// Signs a session token for `id`/`role` valid for `ttl_hours`.
pub fn issue_token(config: &AppConfig, id: Uuid, role: Role) -> ApiResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: id,
        role,
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(config.jwt_ttl_hours)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("failed to sign session token: {}", e)))
}

/// decode_token
///
/// Verifies signature and expiry, returning the claims.
pub fn decode_token(config: &AppConfig, token: &str) -> ApiResult<Claims> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => ApiError::Unauthorized("Session expired".to_string()),
        _ => ApiError::Unauthorized("Invalid session".to_string()),
    })
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Authentication required".to_string())
}

/// AuthUser Extractor
///
/// Resolution order:
/// 1. Local bypass (`Env::Local` only): `x-user-id` + `x-user-role` headers.
/// 2. `Authorization: Bearer <jwt>`.
///
/// Either way the account must still exist, so deleting a manager ends their session.
/// Rejects with 401 `{ error }`.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            if let Some(user) = dev_bypass_identity(parts) {
                if repo.get_profile(user.role, user.id).await?.is_some() {
                    return Ok(user);
                }
            }
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(unauthorized)?;

        let claims = decode_token(&config, token)?;

        repo.get_profile(claims.role, claims.sub)
            .await?
            .ok_or_else(unauthorized)?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

fn dev_bypass_identity(parts: &Parts) -> Option<AuthUser> {
    let header = |name: &str| parts.headers.get(name).and_then(|v| v.to_str().ok());
    let id = Uuid::parse_str(header("x-user-id")?).ok()?;
    let role = header("x-user-role")?.parse().ok()?;
    Some(AuthUser { id, role })
}
