//! The device-access authorization predicate.
//!
//! Evaluated exactly once per access request. Admins pass unconditionally;
//! everyone else passes iff a grant row exists for the (user, device) pair.
//! The capability flags on the row do not gate this check; they scope
//! finer-grained actions only.

use domain::models::{PermissionGrant, Principal};

/// Outcome of the authorization predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Permitted,
    Denied(String),
}

/// Decides whether a principal may access a device, given the grant row
/// looked up for the pair (if any).
pub fn evaluate(principal: &Principal, grant: Option<&PermissionGrant>) -> Authorization {
    if principal.is_admin() {
        return Authorization::Permitted;
    }

    match grant {
        Some(_) => Authorization::Permitted,
        None => Authorization::Denied(format!(
            "user {} holds no permission grant for this device",
            principal.username
        )),
    }
}
