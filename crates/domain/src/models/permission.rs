//! Permission grant domain model.
//!
//! A grant is a single row per (user, device) pair. Presence of the row is
//! what authorizes basic device access; the capability flags are stored for
//! finer-grained actions but do not gate the access check itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The capability flags carried by a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub can_read: bool,
    pub can_write: bool,
    pub can_execute: bool,
}

impl Capabilities {
    /// Read-only capabilities, the default for a fresh grant.
    pub fn read_only() -> Self {
        Self {
            can_read: true,
            can_write: false,
            can_execute: false,
        }
    }

    pub fn all() -> Self {
        Self {
            can_read: true,
            can_write: true,
            can_execute: true,
        }
    }

    /// An all-false set; granting this is equivalent to a revoke.
    pub fn none() -> Self {
        Self {
            can_read: false,
            can_write: false,
            can_execute: false,
        }
    }

    pub fn is_empty(self) -> bool {
        !self.can_read && !self.can_write && !self.can_execute
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::read_only()
    }
}

/// A stored grant row linking one user to one device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGrant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub device_id: Uuid,
    pub capabilities: Capabilities,
    /// Admin who granted or last updated the row; cleared if that admin
    /// is later deleted.
    pub granted_by: Option<Uuid>,
    pub granted_at: DateTime<Utc>,
}

/// Input for granting (or re-granting) capabilities on a device.
#[derive(Debug, Clone)]
pub struct NewGrant {
    pub user_id: Uuid,
    pub device_id: Uuid,
    pub capabilities: Capabilities,
    pub granted_by: Uuid,
}
