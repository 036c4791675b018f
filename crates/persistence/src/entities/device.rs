//! Device entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for monitored devices.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: Uuid,
    pub name: String,
    /// IPv4 or IPv6 address, stored as text.
    pub ip_address: String,
    /// Device type as stored ("computer", "server", ...).
    pub device_type: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
