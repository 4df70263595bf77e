//! Database operations for the Meroghar `PostgreSQL` store.
//!
//! # Schema: `meroghar`
//!
//! ## Tables
//!
//! - `user` - User accounts (login by email)
//! - `address` - Physical addresses
//! - `owner` - One-to-one profile extension of a user account
//! - `home` - Ownership record binding an owner to an address
//! - `session` - Tower-sessions storage
//!
//! Referential actions are declared in the schema: deleting a user deletes
//! its owner and, through the owner, its homes; deleting an address clears
//! `owner.address_id` and deletes the home built on it.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p meroghar-cli -- migrate
//! ```

pub mod addresses;
pub mod homes;
pub mod owners;
pub mod users;

use std::time::Duration;

use meroghar_core::FieldError;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use homes::HomeRepository;
pub use owners::OwnerRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Uniqueness constraint violation (e.g., a second owner for one user).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A referenced row does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Input rejected before reaching the database.
    #[error("validation failed: {0}")]
    Validation(#[from] FieldError),
}

impl RepositoryError {
    /// Classify a write failure: unique violations become [`Self::Conflict`]
    /// and foreign-key violations [`Self::InvalidReference`], each carrying
    /// `context`. Anything else stays a database error.
    pub(crate) fn from_write(err: sqlx::Error, context: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return Self::Conflict(context.to_owned());
            }
            if db_err.is_foreign_key_violation() {
                return Self::InvalidReference(context.to_owned());
            }
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply the embedded migrations in `crates/admin/migrations/`.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history diverged.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_write_keeps_non_constraint_errors() {
        let err = RepositoryError::from_write(sqlx::Error::RowNotFound, "owner");
        assert!(matches!(err, RepositoryError::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_validation_converts() {
        let err: RepositoryError = FieldError::Required { field: "city" }.into();
        assert_eq!(err.to_string(), "validation failed: city is required");
    }
}
