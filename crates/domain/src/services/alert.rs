//! Alert derivation for suspicious events.
//!
//! Every suspicious audit entry yields exactly one alert, created in the
//! same atomic unit as the entry itself. All automatically generated
//! alerts are High severity; lower severities exist only for manual or
//! future generation paths.

use crate::models::{AccessAction, AlertSeverity, NewAlert};

/// Builds the alert for a suspicious event, titled from the actor and
/// action, with the caller's details embedded in the description.
pub fn suspicious_activity_alert(
    username: &str,
    action: AccessAction,
    details: &str,
) -> NewAlert {
    NewAlert {
        title: format!("Suspicious access detected - user {}", username),
        description: Some(format!(
            "Suspicious {} event. Details: {}",
            action, details
        )),
        severity: AlertSeverity::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_is_always_high_severity() {
        let alert =
            suspicious_activity_alert("bob", AccessAction::FailedLogin, "incorrect password");
        assert_eq!(alert.severity, AlertSeverity::High);
    }

    #[test]
    fn test_alert_title_names_actor() {
        let alert = suspicious_activity_alert(
            "bob",
            AccessAction::UnauthorizedAccessAttempt,
            "no grant for device cam1",
        );
        assert_eq!(alert.title, "Suspicious access detected - user bob");
        let description = alert.description.unwrap();
        assert!(description.contains("unauthorized_access_attempt"));
        assert!(description.contains("no grant for device cam1"));
    }
}
