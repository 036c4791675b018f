//! Access-control orchestration for a fleet of monitored devices.
//!
//! This crate wires credential verification, permission checks, audit
//! recording and alert raising into one [`AccessController`]. It is a
//! library invoked by a surrounding presentation layer; it carries no
//! transport and installs no tracing subscriber.

pub mod admin;
pub mod authz;
pub mod config;
pub mod controller;

pub use admin::Overview;
pub use controller::AccessController;
