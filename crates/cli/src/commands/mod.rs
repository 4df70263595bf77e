//! CLI command implementations.
//!
//! # Environment Variables
//!
//! - `MEROGHAR_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

pub mod home;
pub mod migrate;
pub mod owner;
pub mod user;

use meroghar_admin::db::{self, RepositoryError};
use meroghar_admin::services::AuthError;
use meroghar_core::{EmailError, FieldError};
use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// A field was rejected before reaching the database.
    #[error("Invalid input: {0}")]
    Field(#[from] FieldError),

    /// Store operation failed.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Account creation failed.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Load `.env` and connect to the records database.
pub(crate) async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MEROGHAR_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("MEROGHAR_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&SecretString::from(database_url)).await?)
}
