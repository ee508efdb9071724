use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{Admin, Role, StoredCredential},
    repository::Repository,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// hash_password
///
/// Argon2id with a fresh random salt, PHC string format.
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))
}

/// verify_password
///
/// `Ok(false)` on mismatch; an unparseable stored hash is an internal error.
pub fn verify_password(password: &str, stored_hash: &str) -> ApiResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ApiError::Internal(format!("stored password hash is invalid: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// verify_login
///
/// Searches the account tables in [`Role::LOGIN_ORDER`] (admin, pengelola, pengguna) and
/// checks the password against the first account holding `email`. Later tables are never
/// consulted once a row is found, even if the password does not match.
///
/// Unknown email and wrong password produce the same 401. A matching but unverified
/// manager gets 403.
pub async fn verify_login(
    repo: &dyn Repository,
    email: &str,
    password: &str,
) -> ApiResult<(Role, StoredCredential)> {
    let email = email.trim().to_lowercase();

    for role in Role::LOGIN_ORDER {
        let Some(credential) = repo.find_credential(role, &email).await? else {
            continue;
        };

        if !verify_password(password, &credential.password_hash)? {
            tracing::info!(role = %role, "login rejected: password mismatch");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if role == Role::Pengelola && !credential.is_verified {
            tracing::info!(id = %credential.id, "login rejected: pengelola not verified");
            return Err(ApiError::forbidden(
                "Your account is awaiting verification by an administrator",
            ));
        }

        return Ok((role, credential));
    }

    tracing::info!("login rejected: unknown email");
    Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))
}

/// bootstrap_admin
///
/// Creates the first admin from `ADMIN_EMAIL`/`ADMIN_PASSWORD`. Returns `false` without
/// touching anything when the email already belongs to any account, so restarts are safe.
pub async fn bootstrap_admin(repo: &dyn Repository, email: &str, password: &str) -> ApiResult<bool> {
    let email = email.trim().to_lowercase();
    if password.len() < 8 {
        return Err(ApiError::validation("ADMIN_PASSWORD must be at least 8 characters"));
    }
    if repo.email_registered(&email).await? {
        return Ok(false);
    }

    let admin = Admin {
        id: Uuid::new_v4(),
        nama: "Administrator".to_string(),
        email,
        created_at: Utc::now(),
    };
    repo.create_admin(&admin, &hash_password(password)?).await?;
    tracing::info!(id = %admin.id, "admin account bootstrapped");
    Ok(true)
}
