//! Domain error taxonomy.
//!
//! Denials and credential failures are expected, audited outcomes and are
//! reported as ordinary result values; `CoreError::Store` is the only
//! variant that represents a system fault.

use thiserror::Error;

/// Failures originating in the persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated.
    #[error("duplicate row violates a uniqueness constraint")]
    Duplicate,

    /// A referenced row does not exist.
    #[error("referenced row does not exist")]
    MissingReference,

    /// Any other backend failure (connection, protocol, corruption).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => StoreError::Duplicate,
                Some("23503") => StoreError::MissingReference,
                _ => StoreError::Backend(db_err.to_string()),
            },
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// Errors surfaced by the access-control core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The named entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The account is disabled.
    #[error("account is disabled")]
    Disabled,

    /// Username or password did not match.
    #[error("invalid credentials")]
    BadCredential,

    /// The caller is not authorized for the operation.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The request conflicts with an invariant or an existing row.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Persistence failure; the only fatal class.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    /// True for the denial/credential outcomes a caller is expected to
    /// handle as normal results rather than faults.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CoreError::Store(_))
    }
}
