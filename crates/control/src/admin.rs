//! Admin-only management operations and the dashboard overview.
//!
//! Mutations here enforce two invariants: at least one enabled admin
//! account always exists (guarded on delete, demote and disable), and an
//! admin can never delete their own account.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    AccessLogEntry, Capabilities, Device, DeviceUpdate, NewDevice, NewGrant, NewUser,
    PermissionGrant, Principal, User, UserRole, UserUpdate,
};
use domain::{CoreError, StoreError};

use crate::controller::AccessController;

/// How many recent entries the overview carries.
const OVERVIEW_RECENT_LOGS: i64 = 10;

/// Dashboard counters plus the most recent audit entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_users: i64,
    pub total_devices: i64,
    pub recent_logs: Vec<AccessLogEntry>,
    pub unresolved_alerts: i64,
}

impl AccessController {
    /// Creates a user account with a freshly hashed password. Admin-only;
    /// username and email must be unused.
    pub async fn create_user(
        &self,
        principal: &Principal,
        input: &NewUser,
    ) -> Result<User, CoreError> {
        self.require_admin(principal)?;
        input
            .validate()
            .map_err(|e| CoreError::Conflict(format!("invalid input: {}", e)))?;

        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(CoreError::Conflict("username already taken".to_string()));
        }
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(CoreError::Conflict("email already registered".to_string()));
        }

        let hash = shared::password::hash_password(&input.password)
            .map_err(|e| CoreError::Store(StoreError::Backend(e.to_string())))?;

        // Concurrent creation can still trip the unique constraints.
        let user = match self
            .users
            .insert(&input.username, &input.email, &hash, input.role)
            .await
        {
            Ok(user) => user,
            Err(StoreError::Duplicate) => {
                return Err(CoreError::Conflict(
                    "username or email already in use".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        info!(user = %user.username, by = %principal.username, "user created");
        Ok(user)
    }

    /// Enables or disables an account. Disabling the last enabled admin is
    /// rejected with `Conflict`.
    pub async fn set_user_enabled(
        &self,
        principal: &Principal,
        user_id: Uuid,
        enabled: bool,
    ) -> Result<User, CoreError> {
        self.require_admin(principal)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(CoreError::NotFound("user"))?;

        if !enabled && self.is_last_enabled_admin(&user).await? {
            return Err(CoreError::Conflict(
                "cannot disable the last enabled administrator".to_string(),
            ));
        }

        let update = UserUpdate {
            is_active: Some(enabled),
            ..Default::default()
        };
        let user = self
            .users
            .update(user_id, &update)
            .await?
            .ok_or(CoreError::NotFound("user"))?;

        info!(user = %user.username, enabled, by = %principal.username, "user toggled");
        Ok(user)
    }

    /// Changes an account's role. Demoting the last enabled admin is
    /// rejected with `Conflict`.
    pub async fn set_user_role(
        &self,
        principal: &Principal,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<User, CoreError> {
        self.require_admin(principal)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(CoreError::NotFound("user"))?;

        if role != UserRole::Admin && self.is_last_enabled_admin(&user).await? {
            return Err(CoreError::Conflict(
                "cannot demote the last enabled administrator".to_string(),
            ));
        }

        let update = UserUpdate {
            role: Some(role),
            ..Default::default()
        };
        let user = self
            .users
            .update(user_id, &update)
            .await?
            .ok_or(CoreError::NotFound("user"))?;

        info!(user = %user.username, %role, by = %principal.username, "user role changed");
        Ok(user)
    }

    /// Deletes an account, cascading its grant rows and audit entries.
    /// Self-deletion and last-admin deletion are rejected with `Conflict`.
    pub async fn delete_user(&self, principal: &Principal, user_id: Uuid) -> Result<(), CoreError> {
        self.require_admin(principal)?;

        if principal.user_id == user_id {
            return Err(CoreError::Conflict(
                "cannot delete your own account".to_string(),
            ));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(CoreError::NotFound("user"))?;

        if self.is_last_enabled_admin(&user).await? {
            return Err(CoreError::Conflict(
                "cannot delete the last enabled administrator".to_string(),
            ));
        }

        if !self.users.delete(user_id).await? {
            return Err(CoreError::NotFound("user"));
        }

        info!(user = %user.username, by = %principal.username, "user deleted");
        Ok(())
    }

    /// Lists all accounts. Admin-only.
    pub async fn list_users(&self, principal: &Principal) -> Result<Vec<User>, CoreError> {
        self.require_admin(principal)?;
        Ok(self.users.list().await?)
    }

    /// Registers a device. Admin-only.
    pub async fn create_device(
        &self,
        principal: &Principal,
        input: &NewDevice,
    ) -> Result<Device, CoreError> {
        self.require_admin(principal)?;
        input
            .validate()
            .map_err(|e| CoreError::Conflict(format!("invalid input: {}", e)))?;

        let device = self.devices.insert(input).await?;
        info!(device = %device.name, by = %principal.username, "device created");
        Ok(device)
    }

    /// Applies a partial update to a device. Admin-only.
    pub async fn update_device(
        &self,
        principal: &Principal,
        device_id: Uuid,
        update: &DeviceUpdate,
    ) -> Result<Device, CoreError> {
        self.require_admin(principal)?;
        update
            .validate()
            .map_err(|e| CoreError::Conflict(format!("invalid input: {}", e)))?;

        let device = self
            .devices
            .update(device_id, update)
            .await?
            .ok_or(CoreError::NotFound("device"))?;

        info!(device = %device.name, by = %principal.username, "device updated");
        Ok(device)
    }

    /// Deletes a device, cascading its grant rows and audit entries in one
    /// transaction. Alerts referencing removed entries are detached, never
    /// deleted. Admin-only.
    pub async fn delete_device(
        &self,
        principal: &Principal,
        device_id: Uuid,
    ) -> Result<(), CoreError> {
        self.require_admin(principal)?;

        if !self.devices.delete(device_id).await? {
            return Err(CoreError::NotFound("device"));
        }

        info!(device = %device_id, by = %principal.username, "device deleted");
        Ok(())
    }

    /// Lists all devices. Any principal; devices are visible fleet-wide.
    pub async fn list_devices(&self, _principal: &Principal) -> Result<Vec<Device>, CoreError> {
        Ok(self.devices.list().await?)
    }

    /// Grants (or re-grants) capabilities on a device. Admin-only. The
    /// upsert is keyed on the unique (user, device) pair; granting an
    /// all-false capability set revokes instead, returning `None`.
    pub async fn grant_permission(
        &self,
        principal: &Principal,
        user_id: Uuid,
        device_id: Uuid,
        capabilities: Capabilities,
    ) -> Result<Option<PermissionGrant>, CoreError> {
        self.require_admin(principal)?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(CoreError::NotFound("user"));
        }
        if self.devices.find_by_id(device_id).await?.is_none() {
            return Err(CoreError::NotFound("device"));
        }

        if capabilities.is_empty() {
            self.permissions.delete(user_id, device_id).await?;
            info!(%user_id, %device_id, by = %principal.username, "permission revoked");
            return Ok(None);
        }

        let grant = self
            .permissions
            .upsert(&NewGrant {
                user_id,
                device_id,
                capabilities,
                granted_by: principal.user_id,
            })
            .await?;

        info!(%user_id, %device_id, by = %principal.username, "permission granted");
        Ok(Some(grant))
    }

    /// Removes the grant row for a pair. Admin-only and idempotent; returns
    /// whether a row existed.
    pub async fn revoke_permission(
        &self,
        principal: &Principal,
        user_id: Uuid,
        device_id: Uuid,
    ) -> Result<bool, CoreError> {
        self.require_admin(principal)?;

        let removed = self.permissions.delete(user_id, device_id).await?;
        if removed {
            info!(%user_id, %device_id, by = %principal.username, "permission revoked");
        }
        Ok(removed)
    }

    /// Lists a user's grant rows. Admin-only.
    pub async fn list_user_permissions(
        &self,
        principal: &Principal,
        user_id: Uuid,
    ) -> Result<Vec<PermissionGrant>, CoreError> {
        self.require_admin(principal)?;
        Ok(self.permissions.list_for_user(user_id).await?)
    }

    /// Lists a device's grant rows. Admin-only.
    pub async fn list_device_permissions(
        &self,
        principal: &Principal,
        device_id: Uuid,
    ) -> Result<Vec<PermissionGrant>, CoreError> {
        self.require_admin(principal)?;
        Ok(self.permissions.list_for_device(device_id).await?)
    }

    /// Dashboard counters and the ten most recent audit entries. Any
    /// principal.
    pub async fn overview(&self, _principal: &Principal) -> Result<Overview, CoreError> {
        Ok(Overview {
            total_users: self.users.count().await?,
            total_devices: self.devices.count().await?,
            recent_logs: self.logs.recent(OVERVIEW_RECENT_LOGS).await?,
            unresolved_alerts: self.alerts.count_unresolved().await?,
        })
    }

    /// True when disabling, demoting or deleting this account would leave
    /// no enabled admin.
    async fn is_last_enabled_admin(&self, user: &User) -> Result<bool, CoreError> {
        Ok(user.role == UserRole::Admin
            && user.is_active
            && self.users.count_enabled_admins().await? <= 1)
    }
}
