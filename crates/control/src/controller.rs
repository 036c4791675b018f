//! The Access Controller: orchestration of credential verification,
//! permission checks, audit recording and alert raising.
//!
//! Every operation takes an explicit [`Principal`]; the controller holds
//! no session state. Denied device access and failed logins are expected
//! outcomes: they are audited, alerted, and returned as values. Only
//! store failures surface as errors.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use domain::models::{
    AccessAction, AccessDecision, AccessDenied, AccessGrant, AccessLogEntry, Alert, ClientContext,
    LogFilter, LogStats, Principal, User,
};
use domain::services::alert::suspicious_activity_alert;
use domain::services::audit::entries;
use domain::store::{AlertStore, AuditLogStore, DeviceStore, PermissionStore, UserStore};
use domain::{CoreError, StoreError};

use crate::authz::{self, Authorization};

/// Orchestrates access control over the five store seams.
pub struct AccessController {
    pub(crate) users: Arc<dyn UserStore>,
    pub(crate) devices: Arc<dyn DeviceStore>,
    pub(crate) permissions: Arc<dyn PermissionStore>,
    pub(crate) logs: Arc<dyn AuditLogStore>,
    pub(crate) alerts: Arc<dyn AlertStore>,
}

impl AccessController {
    pub fn new(
        users: Arc<dyn UserStore>,
        devices: Arc<dyn DeviceStore>,
        permissions: Arc<dyn PermissionStore>,
        logs: Arc<dyn AuditLogStore>,
        alerts: Arc<dyn AlertStore>,
    ) -> Self {
        Self {
            users,
            devices,
            permissions,
            logs,
            alerts,
        }
    }

    /// Wires the controller to PostgreSQL repositories over one pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(
            Arc::new(persistence::repositories::UserRepository::new(pool.clone())),
            Arc::new(persistence::repositories::DeviceRepository::new(
                pool.clone(),
            )),
            Arc::new(persistence::repositories::PermissionRepository::new(
                pool.clone(),
            )),
            Arc::new(persistence::repositories::AccessLogRepository::new(
                pool.clone(),
            )),
            Arc::new(persistence::repositories::AlertRepository::new(pool)),
        )
    }

    /// Verifies credentials and records the outcome.
    ///
    /// Failure order: unknown username (`NotFound`, deliberately leaves no
    /// audit trace), disabled account (`Disabled`), hash mismatch
    /// (`BadCredential`). The latter two are audited as suspicious failed
    /// logins with an alert raised in the same transaction.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        ctx: &ClientContext,
    ) -> Result<Principal, CoreError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(CoreError::NotFound("user"))?;

        if !user.is_active {
            self.record_failed_login(&user, ctx, "Account disabled")
                .await?;
            return Err(CoreError::Disabled);
        }

        let matches = shared::password::verify_password(password, &user.password_hash)
            .map_err(|e| CoreError::Store(StoreError::Backend(e.to_string())))?;
        if !matches {
            self.record_failed_login(&user, ctx, "Invalid password")
                .await?;
            return Err(CoreError::BadCredential);
        }

        self.logs.append(&entries::system_login(user.id, ctx)).await?;
        info!(user = %user.username, "user authenticated");

        Ok(Principal::from(&user))
    }

    /// Records the end of a session. Always succeeds for a valid principal.
    pub async fn logout(
        &self,
        principal: &Principal,
        ctx: &ClientContext,
    ) -> Result<AccessLogEntry, CoreError> {
        let entry = self
            .logs
            .append(&entries::system_logout(principal.user_id, ctx))
            .await?;
        debug!(user = %principal.username, "user logged out");
        Ok(entry)
    }

    /// Evaluates the authorization predicate for one device access and
    /// records the outcome: one `device_access` entry on success, or one
    /// `unauthorized_access_attempt` entry plus one High alert written
    /// atomically on denial.
    pub async fn check_and_record_device_access(
        &self,
        principal: &Principal,
        device_id: Uuid,
        ctx: &ClientContext,
    ) -> Result<AccessDecision, CoreError> {
        let device = self
            .devices
            .find_by_id(device_id)
            .await?
            .ok_or(CoreError::NotFound("device"))?;

        let grant = self.permissions.find(principal.user_id, device_id).await?;

        match authz::evaluate(principal, grant.as_ref()) {
            Authorization::Permitted => {
                let entry = self
                    .logs
                    .append(&entries::device_access(
                        principal.user_id,
                        device.id,
                        &device.name,
                        ctx,
                    ))
                    .await?;
                debug!(user = %principal.username, device = %device.name, "device access granted");
                Ok(AccessDecision::Granted(AccessGrant { device, entry }))
            }
            Authorization::Denied(reason) => {
                let new_entry =
                    entries::unauthorized_access(principal.user_id, device.id, &device.name, ctx);
                let details = new_entry.details.clone().unwrap_or_default();
                let new_alert = suspicious_activity_alert(
                    &principal.username,
                    AccessAction::UnauthorizedAccessAttempt,
                    &details,
                );
                let (entry, alert) = self.logs.append_suspicious(&new_entry, &new_alert).await?;
                warn!(
                    user = %principal.username,
                    device = %device.name,
                    "device access denied, alert raised"
                );
                Ok(AccessDecision::Denied(AccessDenied {
                    reason,
                    entry,
                    alert,
                }))
            }
        }
    }

    /// Lists audit entries matching the filter, newest first. Non-admin
    /// callers are scoped to their own rows: their `user_id` filter is
    /// overridden with their own id.
    pub async fn list_logs(
        &self,
        principal: &Principal,
        filter: &LogFilter,
    ) -> Result<Vec<AccessLogEntry>, CoreError> {
        let mut filter = filter.clone();
        if !principal.is_admin() {
            filter.user_id = Some(principal.user_id);
        }
        Ok(self.logs.query(&filter).await?)
    }

    /// Aggregate audit counters. Admin-only.
    pub async fn get_stats(&self, principal: &Principal) -> Result<LogStats, CoreError> {
        self.require_admin(principal)?;
        Ok(self.logs.stats().await?)
    }

    /// Lists alerts, newest first; unresolved only unless `show_resolved`.
    /// Admin-only.
    pub async fn list_alerts(
        &self,
        principal: &Principal,
        show_resolved: bool,
    ) -> Result<Vec<Alert>, CoreError> {
        self.require_admin(principal)?;
        Ok(self.alerts.list(show_resolved).await?)
    }

    /// Marks an alert resolved. Admin-only and idempotent: re-resolving
    /// returns the alert unchanged, keeping its original `resolved_at`.
    pub async fn resolve_alert(
        &self,
        principal: &Principal,
        alert_id: Uuid,
    ) -> Result<Alert, CoreError> {
        self.require_admin(principal)?;

        if let Some(alert) = self.alerts.resolve(alert_id, Utc::now()).await? {
            info!(alert = %alert.id, by = %principal.username, "alert resolved");
            return Ok(alert);
        }

        // Absent or already resolved; the latter is a successful no-op.
        self.alerts
            .find_by_id(alert_id)
            .await?
            .ok_or(CoreError::NotFound("alert"))
    }

    pub(crate) fn require_admin(&self, principal: &Principal) -> Result<(), CoreError> {
        if principal.is_admin() {
            Ok(())
        } else {
            Err(CoreError::AccessDenied(
                "administrator role required".to_string(),
            ))
        }
    }

    async fn record_failed_login(
        &self,
        user: &User,
        ctx: &ClientContext,
        cause: &str,
    ) -> Result<(), CoreError> {
        let entry = entries::failed_login(user.id, ctx, cause);
        let alert = suspicious_activity_alert(&user.username, AccessAction::FailedLogin, cause);
        self.logs.append_suspicious(&entry, &alert).await?;
        warn!(user = %user.username, cause, "failed login attempt");
        Ok(())
    }
}
