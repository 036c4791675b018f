//! Domain models.

pub mod access_log;
pub mod alert;
pub mod device;
pub mod permission;
pub mod principal;
pub mod user;

pub use access_log::{
    AccessAction, AccessLogEntry, AccessStatus, ClientContext, LogFilter, LogStats, NewLogEntry,
};
pub use alert::{Alert, AlertSeverity, NewAlert};
pub use device::{Device, DeviceType, DeviceUpdate, NewDevice};
pub use permission::{Capabilities, NewGrant, PermissionGrant};
pub use principal::{AccessDecision, AccessDenied, AccessGrant, Principal};
pub use user::{NewUser, User, UserRole, UserUpdate};
