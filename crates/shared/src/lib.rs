//! Shared utilities for the Device Sentry core.
//!
//! This crate provides functionality used across the other crates:
//! - Password hashing with Argon2id
//! - Input validation helpers

pub mod password;
pub mod validation;
