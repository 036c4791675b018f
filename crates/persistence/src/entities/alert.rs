//! Security alert entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for security alerts.
#[derive(Debug, Clone, FromRow)]
pub struct AlertEntity {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Severity as stored ("low", "medium", "high").
    pub severity: String,
    pub created_at: DateTime<Utc>,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    /// Back-reference to the source audit entry; NULL if that entry was
    /// cascade-deleted.
    pub log_id: Option<i64>,
}
