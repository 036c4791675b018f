//! Audit entry construction.
//!
//! Provides a fluent builder plus one helper per audited action, so the
//! orchestration layer never assembles `NewLogEntry` fields by hand and
//! the action/status/suspicious combinations stay consistent.

use uuid::Uuid;

use crate::models::{AccessAction, AccessStatus, ClientContext, NewLogEntry};

/// Builder for audit trail entries.
#[derive(Debug, Clone)]
pub struct LogEntryBuilder {
    user_id: Uuid,
    device_id: Option<Uuid>,
    action: AccessAction,
    status: AccessStatus,
    ip_address: Option<String>,
    user_agent: Option<String>,
    details: Option<String>,
    is_suspicious: bool,
}

impl LogEntryBuilder {
    /// Starts a successful, non-suspicious entry for an action.
    pub fn success(user_id: Uuid, action: AccessAction) -> Self {
        Self {
            user_id,
            device_id: None,
            action,
            status: AccessStatus::Success,
            ip_address: None,
            user_agent: None,
            details: None,
            is_suspicious: false,
        }
    }

    /// Starts a failed, suspicious entry for an action.
    pub fn suspicious_failure(user_id: Uuid, action: AccessAction) -> Self {
        Self {
            user_id,
            device_id: None,
            action,
            status: AccessStatus::Failed,
            ip_address: None,
            user_agent: None,
            details: None,
            is_suspicious: true,
        }
    }

    /// Attaches the target device.
    pub fn on_device(mut self, device_id: Uuid) -> Self {
        self.device_id = Some(device_id);
        self
    }

    /// Copies the caller-supplied request context verbatim.
    pub fn with_context(mut self, ctx: &ClientContext) -> Self {
        self.ip_address = ctx.source_address.clone();
        self.user_agent = ctx.user_agent.clone();
        self
    }

    /// Attaches free-text details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn build(self) -> NewLogEntry {
        NewLogEntry {
            user_id: self.user_id,
            device_id: self.device_id,
            action: self.action,
            status: self.status,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            details: self.details,
            is_suspicious: self.is_suspicious,
        }
    }
}

/// Ready-made entries for the actions the core records.
pub mod entries {
    use super::*;

    /// Successful authentication; no device involved.
    pub fn system_login(user_id: Uuid, ctx: &ClientContext) -> NewLogEntry {
        LogEntryBuilder::success(user_id, AccessAction::SystemLogin)
            .with_context(ctx)
            .build()
    }

    /// Known-user authentication failure; suspicious by definition.
    pub fn failed_login(user_id: Uuid, ctx: &ClientContext, cause: &str) -> NewLogEntry {
        LogEntryBuilder::suspicious_failure(user_id, AccessAction::FailedLogin)
            .with_context(ctx)
            .with_details(cause)
            .build()
    }

    /// Permitted device access.
    pub fn device_access(
        user_id: Uuid,
        device_id: Uuid,
        device_name: &str,
        ctx: &ClientContext,
    ) -> NewLogEntry {
        LogEntryBuilder::success(user_id, AccessAction::DeviceAccess)
            .on_device(device_id)
            .with_context(ctx)
            .with_details(format!("Authorized access to device {}", device_name))
            .build()
    }

    /// Denied device access; suspicious by definition.
    pub fn unauthorized_access(
        user_id: Uuid,
        device_id: Uuid,
        device_name: &str,
        ctx: &ClientContext,
    ) -> NewLogEntry {
        LogEntryBuilder::suspicious_failure(user_id, AccessAction::UnauthorizedAccessAttempt)
            .on_device(device_id)
            .with_context(ctx)
            .with_details(format!(
                "Unauthorized access attempt on device {}",
                device_name
            ))
            .build()
    }

    /// Session end; always recorded as a success.
    pub fn system_logout(user_id: Uuid, ctx: &ClientContext) -> NewLogEntry {
        LogEntryBuilder::success(user_id, AccessAction::SystemLogout)
            .with_context(ctx)
            .build()
    }
}
