//! Common validation utilities for account and device inputs.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Usernames: 3-80 characters, alphanumeric plus `.`, `-`, `_`,
    /// starting with a letter or digit.
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{2,79}$").unwrap();
}

/// Validates a username against the allowed pattern.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_username");
        err.message = Some(
            "Username must be 3-80 characters: letters, digits, '.', '-' or '_'".into(),
        );
        Err(err)
    }
}

/// Validates that a device network address is plausible.
///
/// Addresses are stored as free text (IPv4 or IPv6); this only bounds the
/// length and rejects embedded whitespace.
pub fn validate_network_address(address: &str) -> Result<(), ValidationError> {
    if address.is_empty() || address.len() > 45 || address.chars().any(char::is_whitespace) {
        let mut err = ValidationError::new("invalid_network_address");
        err.message = Some("Network address must be 1-45 characters without whitespace".into());
        Err(err)
    } else {
        Ok(())
    }
}
