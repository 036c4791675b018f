//! User entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for user accounts.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// PHC-formatted Argon2id hash.
    pub password_hash: String,
    /// Role as stored ("admin" or "user").
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
