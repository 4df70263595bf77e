//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions, stored in
//! `meroghar.session` with a 24 hour inactivity expiry. The session cookie
//! is signed with `MEROGHAR_SESSION_SECRET`.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::{Expiry, SessionManagerLayer, cookie::Key, service::SignedCookie};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "meroghar_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// The session store rejected its schema or table name, or the secret is
/// too short to sign with.
#[derive(Debug, Error)]
#[error("invalid session store {0}")]
pub struct SessionStoreError(String);

/// Create the session layer with `PostgreSQL` store.
///
/// The `meroghar.session` table is created by migration, not by the store.
///
/// # Errors
///
/// Returns `SessionStoreError` if the schema or table name is rejected,
/// or the session secret is shorter than a signing key.
pub fn create_session_layer(
    pool: &PgPool,
    config: &AdminConfig,
) -> Result<SessionManagerLayer<PostgresStore, SignedCookie>, SessionStoreError> {
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())
        .map_err(|e| SessionStoreError(format!("signing key: {e}")))?;

    let store = PostgresStore::new(pool.clone())
        .with_schema_name("meroghar")
        .map_err(|e| SessionStoreError(format!("schema name: {e}")))?
        .with_table_name("session")
        .map_err(|e| SessionStoreError(format!("table name: {e}")))?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
