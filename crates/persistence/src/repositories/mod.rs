//! Repository implementations of the domain store traits.

pub mod access_log;
pub mod alert;
pub mod device;
pub mod permission;
pub mod user;

pub use access_log::AccessLogRepository;
pub use alert::AlertRepository;
pub use device::DeviceRepository;
pub use permission::PermissionRepository;
pub use user::UserRepository;
