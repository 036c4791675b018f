//! Domain layer for the Device Sentry core.
//!
//! This crate contains:
//! - Domain models (User, Device, PermissionGrant, AccessLogEntry, Alert)
//! - The store trait seams implemented by the persistence layer
//! - The domain error taxonomy
//! - Pure services (audit entry builders, alert derivation)

pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::{CoreError, StoreError};
