//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! mg-cli migrate
//! ```
//!
//! Migrations live in `crates/admin/migrations/` and are embedded in the
//! admin crate at build time.

use super::{CommandError, connect};

/// Apply every pending migration.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    meroghar_admin::db::migrate(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
