//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use safehub_core::{Email, UserId};

/// A registered storefront account.
///
/// The password hash is deliberately not part of this type; it is only read
/// by the login path (see `UserRepository::get_password_hash`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID, assigned by the store.
    pub id: UserId,
    /// Normalized email address, unique across users.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}
