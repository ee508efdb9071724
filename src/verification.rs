use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    models::{Artikel, Event, Pengelola, Ulasan, Wisata},
};

/// Verifiable
///
/// Anything carrying the `isVerified` moderation flag. Only admins flip it. Every admin
/// change to the entity, a flip or an ordinary edit, records the admin in `updated_by`.
pub trait Verifiable {
    fn is_verified(&self) -> bool;
    fn set_verified(&mut self, verified: bool);
    /// Bumps `updated_at`; `admin` replaces `updated_by` when present.
    fn touch(&mut self, admin: Option<Uuid>);

    fn mark_verified(&mut self, verified: bool, by: Uuid) {
        self.set_verified(verified);
        self.touch(Some(by));
    }
}

macro_rules! impl_verifiable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Verifiable for $ty {
                fn is_verified(&self) -> bool {
                    self.is_verified
                }

                fn set_verified(&mut self, verified: bool) {
                    self.is_verified = verified;
                }

                fn touch(&mut self, admin: Option<Uuid>) {
                    if admin.is_some() {
                        self.updated_by = admin;
                    }
                    self.updated_at = Utc::now();
                }
            }
        )+
    };
}

impl_verifiable!(Wisata, Artikel, Event, Ulasan, Pengelola);

/// apply_verification
///
/// Sets the flag on `entity` on behalf of `actor`.
///
/// - non-admin callers get 403 and the entity is untouched
/// - asking for the value already stored is a 400, so a double click in the dashboard
///   does not silently rewrite `updated_by`
pub fn apply_verification<T: Verifiable>(
    entity: &mut T,
    requested: bool,
    actor: &AuthUser,
) -> ApiResult<()> {
    if !actor.is_admin() {
        return Err(ApiError::forbidden(
            "Only an administrator can change verification status",
        ));
    }

    if entity.is_verified() == requested {
        return Err(ApiError::validation(if requested {
            "Data is already verified"
        } else {
            "Data is already unverified"
        }));
    }

    entity.mark_verified(requested, actor.id);
    Ok(())
}

/// Applies an optional `isVerified` carried inside an ordinary update body.
pub fn apply_requested<T: Verifiable>(
    entity: &mut T,
    requested: Option<bool>,
    actor: &AuthUser,
) -> ApiResult<()> {
    match requested {
        Some(flag) => apply_verification(entity, flag, actor),
        None => Ok(()),
    }
}

/// record_edit
///
/// Stamps an ordinary (non-verification) update. Admin edits are attributed in
/// `updated_by`; an owner's own edit leaves the last admin in place.
pub fn record_edit<T: Verifiable>(entity: &mut T, actor: &AuthUser) {
    entity.touch(actor.is_admin().then_some(actor.id));
}
