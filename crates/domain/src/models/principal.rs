//! Principal and access-decision types.
//!
//! The core holds no session state; the calling layer passes an explicit
//! `Principal` into every operation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::access_log::AccessLogEntry;
use super::alert::Alert;
use super::device::Device;
use super::user::{User, UserRole};

/// The authenticated identity making a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Outcome of a checked-and-recorded device access.
///
/// Denial is an expected, audited outcome and therefore a value, not an
/// error; store failures are the only error path.
#[derive(Debug, Clone)]
pub enum AccessDecision {
    Granted(AccessGrant),
    Denied(AccessDenied),
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted(_))
    }
}

/// A permitted device access, with the audit entry it produced.
#[derive(Debug, Clone)]
pub struct AccessGrant {
    pub device: Device,
    pub entry: AccessLogEntry,
}

/// A denied device access, with the audit entry and alert it produced.
#[derive(Debug, Clone)]
pub struct AccessDenied {
    pub reason: String,
    pub entry: AccessLogEntry,
    pub alert: Alert,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_principal_from_user() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "hash".into(),
            role: UserRole::Admin,
            is_active: true,
            created_at: Utc::now(),
        };
        let principal = Principal::from(&user);
        assert_eq!(principal.user_id, user.id);
        assert_eq!(principal.username, "alice");
        assert!(principal.is_admin());
    }
}
