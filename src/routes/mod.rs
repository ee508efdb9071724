//! Router Module Index
//!
//! Splits the API by access level. Each module's router gets its access control
//! applied as a layer in `create_router`, so a handler cannot end up exposed by
//! being registered in the wrong place.

/// Routes open to anonymous callers: reads of verified content, registration, login.
pub mod public;

/// Routes behind the `AuthUser` session check. Role and ownership rules are applied
/// inside the handlers.
pub mod authenticated;

/// Routes under `/api/admin`, restricted to the admin role.
pub mod admin;
