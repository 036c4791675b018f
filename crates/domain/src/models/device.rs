//! Device domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Kinds of monitored endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Computer,
    Server,
    Camera,
    Switch,
    Router,
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "computer" => Ok(DeviceType::Computer),
            "server" => Ok(DeviceType::Server),
            "camera" => Ok(DeviceType::Camera),
            "switch" => Ok(DeviceType::Switch),
            "router" => Ok(DeviceType::Router),
            _ => Err(format!("Unknown device type: {}", s)),
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceType::Computer => write!(f, "computer"),
            DeviceType::Server => write!(f, "server"),
            DeviceType::Camera => write!(f, "camera"),
            DeviceType::Switch => write!(f, "switch"),
            DeviceType::Router => write!(f, "router"),
        }
    }
}

/// A monitored endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: Uuid,
    pub name: String,
    /// IPv4 or IPv6 address, stored as text.
    pub ip_address: String,
    pub device_type: DeviceType,
    pub description: Option<String>,
    pub location: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for registering a device. Admin-only.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_network_address"))]
    pub ip_address: String,

    pub device_type: DeviceType,

    pub description: Option<String>,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,
}

/// Partial update applied to a device by an admin.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUpdate {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_network_address"))]
    pub ip_address: Option<String>,

    pub device_type: Option<DeviceType>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_type_round_trip() {
        for (s, t) in [
            ("computer", DeviceType::Computer),
            ("server", DeviceType::Server),
            ("camera", DeviceType::Camera),
            ("switch", DeviceType::Switch),
            ("router", DeviceType::Router),
        ] {
            assert_eq!(DeviceType::from_str(s).unwrap(), t);
            assert_eq!(t.to_string(), s);
        }
        assert!(DeviceType::from_str("toaster").is_err());
    }

    #[test]
    fn test_new_device_validation() {
        let ok = NewDevice {
            name: "cam1".into(),
            ip_address: "10.0.4.17".into(),
            device_type: DeviceType::Camera,
            description: Some("lobby camera".into()),
            location: Some("front lobby".into()),
        };
        assert!(ok.validate().is_ok());

        let bad = NewDevice {
            name: "".into(),
            ip_address: "10.0.4.17 junk trailing".into(),
            device_type: DeviceType::Camera,
            description: None,
            location: None,
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("ip_address"));
    }
}
