//! Permission grant entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for permission grant rows.
///
/// Unique on (user_id, device_id); at most one row per pair.
#[derive(Debug, Clone, FromRow)]
pub struct PermissionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub device_id: Uuid,
    pub can_read: bool,
    pub can_write: bool,
    pub can_execute: bool,
    /// Admin who granted the row; NULL once that admin is deleted.
    pub granted_by: Option<Uuid>,
    pub granted_at: DateTime<Utc>,
}
