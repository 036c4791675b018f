//! Audit trail domain models.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Audited actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    /// Successful authentication against the system itself.
    SystemLogin,
    /// Known-user authentication failure (wrong password or disabled
    /// account). Always suspicious.
    FailedLogin,
    /// Permitted access to a device.
    DeviceAccess,
    /// Denied access to a device. Always suspicious.
    UnauthorizedAccessAttempt,
    /// Session end.
    SystemLogout,
}

impl FromStr for AccessAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system_login" => Ok(AccessAction::SystemLogin),
            "failed_login" => Ok(AccessAction::FailedLogin),
            "device_access" => Ok(AccessAction::DeviceAccess),
            "unauthorized_access_attempt" => Ok(AccessAction::UnauthorizedAccessAttempt),
            "system_logout" => Ok(AccessAction::SystemLogout),
            _ => Err(format!("Unknown access action: {}", s)),
        }
    }
}

impl std::fmt::Display for AccessAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AccessAction::SystemLogin => "system_login",
            AccessAction::FailedLogin => "failed_login",
            AccessAction::DeviceAccess => "device_access",
            AccessAction::UnauthorizedAccessAttempt => "unauthorized_access_attempt",
            AccessAction::SystemLogout => "system_logout",
        };
        write!(f, "{}", s)
    }
}

/// Outcome recorded for an audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessStatus {
    Success,
    Failed,
}

impl FromStr for AccessStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(AccessStatus::Success),
            "failed" => Ok(AccessStatus::Failed),
            _ => Err(format!("Unknown access status: {}", s)),
        }
    }
}

impl std::fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessStatus::Success => write!(f, "success"),
            AccessStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Request context handed in by the presentation layer and copied verbatim
/// into log entries. The core never parses or validates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext {
    pub source_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientContext {
    pub fn new(
        source_address: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            source_address: Some(source_address.into()),
            user_agent: Some(user_agent.into()),
        }
    }
}

/// One immutable audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogEntry {
    /// Monotonically increasing identifier; ties in `access_time` are
    /// broken by descending id when listing.
    pub id: i64,
    pub user_id: Uuid,
    /// Absent for system-level login/logout events.
    pub device_id: Option<Uuid>,
    pub access_time: DateTime<Utc>,
    pub action: AccessAction,
    pub status: AccessStatus,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub details: Option<String>,
    pub is_suspicious: bool,
}

/// Input for appending one audit trail entry.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub user_id: Uuid,
    pub device_id: Option<Uuid>,
    pub action: AccessAction,
    pub status: AccessStatus,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub details: Option<String>,
    pub is_suspicious: bool,
}

/// Filters for listing audit trail entries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub user_id: Option<Uuid>,
    pub device_id: Option<Uuid>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub suspicious_only: bool,
}

impl LogFilter {
    /// Resolves the date filters into concrete bounds: `date_from` becomes
    /// an inclusive lower bound at midnight, `date_to` an exclusive upper
    /// bound at midnight of the following day, so the whole final day is
    /// included.
    pub fn time_window(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let from = self
            .date_from
            .map(|d| Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).unwrap()));
        let until = self.date_to.map(|d| {
            Utc.from_utc_datetime(&d.succ_opt().unwrap_or(d).and_hms_opt(0, 0, 0).unwrap())
        });
        (from, until)
    }
}

/// Aggregate counters over the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    pub total_logs: i64,
    pub suspicious_logs: i64,
    pub failed_logins: i64,
    pub recent_logs_24h: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_action_round_trip() {
        for s in [
            "system_login",
            "failed_login",
            "device_access",
            "unauthorized_access_attempt",
            "system_logout",
        ] {
            assert_eq!(AccessAction::from_str(s).unwrap().to_string(), s);
        }
        assert!(AccessAction::from_str("reboot").is_err());
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(AccessStatus::from_str("success").unwrap(), AccessStatus::Success);
        assert_eq!(AccessStatus::from_str("FAILED").unwrap(), AccessStatus::Failed);
        assert!(AccessStatus::from_str("maybe").is_err());
    }

    #[test]
    fn test_time_window_bounds() {
        let filter = LogFilter {
            date_from: Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            date_to: Some(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()),
            ..Default::default()
        };
        let (from, until) = filter.time_window();
        let from = from.unwrap();
        let until = until.unwrap();
        assert_eq!(from.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(from.hour(), 0);
        // The upper bound covers the entire final day.
        assert_eq!(until.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(until.hour(), 0);
    }

    #[test]
    fn test_time_window_absent_filters() {
        let (from, until) = LogFilter::default().time_window();
        assert!(from.is_none());
        assert!(until.is_none());
    }
}
