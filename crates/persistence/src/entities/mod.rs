//! Database entities (row mappings).

pub mod access_log;
pub mod alert;
pub mod device;
pub mod permission;
pub mod user;

pub use access_log::AccessLogEntity;
pub use alert::AlertEntity;
pub use device::DeviceEntity;
pub use permission::PermissionEntity;
pub use user::UserEntity;
