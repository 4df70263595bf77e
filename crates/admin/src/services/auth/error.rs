//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
///
/// Unknown accounts and wrong passwords are not errors; see
/// [`EmailAuthBackend::authenticate`](super::EmailAuthBackend::authenticate).
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
