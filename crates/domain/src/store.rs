//! Store trait seams implemented by the persistence layer.
//!
//! The core orchestration talks only to these traits. Concurrent writers
//! are coordinated by the backing store (unique constraints and
//! transactions), not by the core; each multi-row operation declared here
//! must be atomic in every implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    AccessLogEntry, Alert, Device, DeviceUpdate, LogFilter, LogStats, NewAlert, NewDevice,
    NewGrant, NewLogEntry, PermissionGrant, User, UserRole, UserUpdate,
};

/// User account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Inserts an account. `password_hash` must already be hashed; the
    /// store never sees plaintext.
    async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, StoreError>;

    async fn update(&self, id: Uuid, update: &UserUpdate) -> Result<Option<User>, StoreError>;

    /// Deletes the account and cascades its grant rows and audit entries
    /// in one transaction. Grants issued by this account keep their rows
    /// with `granted_by` cleared. Returns false if the account was absent.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;

    /// Number of enabled admin accounts, used by the last-admin guard.
    async fn count_enabled_admins(&self) -> Result<i64, StoreError>;
}

/// Device storage.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Device>, StoreError>;

    async fn insert(&self, input: &NewDevice) -> Result<Device, StoreError>;

    async fn update(&self, id: Uuid, update: &DeviceUpdate) -> Result<Option<Device>, StoreError>;

    /// Deletes the device and cascades its grant rows and audit entries in
    /// one transaction; alerts referencing removed entries are detached,
    /// never deleted. Returns false if the device was absent.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn list(&self) -> Result<Vec<Device>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

/// Permission grant storage: one row per (user, device) pair.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Looks up the grant row for a pair. Presence of the row — not its
    /// capability flags — is what authorizes basic access; the flags gate
    /// finer-grained actions and are currently informational.
    async fn find(
        &self,
        user_id: Uuid,
        device_id: Uuid,
    ) -> Result<Option<PermissionGrant>, StoreError>;

    /// Atomically inserts or updates the pair's row, relying on the unique
    /// (user, device) constraint. Capabilities must be non-empty; an
    /// all-false set is a revoke, handled by the caller.
    async fn upsert(&self, grant: &NewGrant) -> Result<PermissionGrant, StoreError>;

    /// Removes the pair's row. Returns false if no row existed.
    async fn delete(&self, user_id: Uuid, device_id: Uuid) -> Result<bool, StoreError>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PermissionGrant>, StoreError>;

    async fn list_for_device(&self, device_id: Uuid) -> Result<Vec<PermissionGrant>, StoreError>;
}

/// Append-only audit trail storage.
///
/// Entries are never updated; removal happens only through entity cascade.
#[async_trait]
pub trait AuditLogStore: Send + Sync {
    /// Appends exactly one immutable entry.
    async fn append(&self, entry: &NewLogEntry) -> Result<AccessLogEntry, StoreError>;

    /// Appends a suspicious entry together with its alert as one atomic
    /// unit; the alert's back-reference is set to the new entry's id.
    async fn append_suspicious(
        &self,
        entry: &NewLogEntry,
        alert: &NewAlert,
    ) -> Result<(AccessLogEntry, Alert), StoreError>;

    /// Lists entries matching the filter in descending time order (id as
    /// tiebreak). Principal scoping is the caller's responsibility; this
    /// is a dumb store.
    async fn query(&self, filter: &LogFilter) -> Result<Vec<AccessLogEntry>, StoreError>;

    /// Most recent entries, for the dashboard overview.
    async fn recent(&self, limit: i64) -> Result<Vec<AccessLogEntry>, StoreError>;

    async fn stats(&self) -> Result<LogStats, StoreError>;
}

/// Security alert storage.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Alert>, StoreError>;

    /// Lists alerts newest first; unresolved only unless `show_resolved`.
    async fn list(&self, show_resolved: bool) -> Result<Vec<Alert>, StoreError>;

    async fn count_unresolved(&self) -> Result<i64, StoreError>;

    /// Marks an alert resolved at `resolved_at` if it is still unresolved.
    /// Returns `None` when the alert is absent or already resolved, so the
    /// caller can keep resolution idempotent.
    async fn resolve(
        &self,
        id: Uuid,
        resolved_at: DateTime<Utc>,
    ) -> Result<Option<Alert>, StoreError>;
}
