//! Business logic services.

pub mod alert;
pub mod audit;
