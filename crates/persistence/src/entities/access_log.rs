//! Audit trail entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for audit trail entries. Rows are append-only.
#[derive(Debug, Clone, FromRow)]
pub struct AccessLogEntity {
    /// BIGSERIAL; monotonic, used as the ordering tiebreak.
    pub id: i64,
    pub user_id: Uuid,
    /// NULL for system-level login/logout events.
    pub device_id: Option<Uuid>,
    pub access_time: DateTime<Utc>,
    /// Action as stored ("system_login", "device_access", ...).
    pub action: String,
    /// Outcome as stored ("success" or "failed").
    pub status: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub details: Option<String>,
    pub is_suspicious: bool,
}
