//! Business logic services for Meroghar.
//!
//! # Services
//!
//! - `auth` - Email and password authentication against user accounts

pub mod auth;

pub use auth::{AuthError, EmailAuthBackend};
