//! HTTP middleware for the admin surface.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Route guards are extractors rather than layers; see [`auth`].

pub mod auth;
pub mod session;

pub use auth::{OptionalUser, RequireStaff, clear_current_user, set_current_user};
pub use session::{SESSION_COOKIE_NAME, SessionStoreError, create_session_layer};
