//! User model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeeper_core::{Email, Role, UserId};

/// A registered user.
///
/// The password hash is never part of this struct; it stays inside the
/// repository and auth service.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
