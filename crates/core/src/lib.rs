//! Meroghar Core - Shared domain types.
//!
//! This crate provides the types shared by every Meroghar component:
//! - `admin` - Record stores, email authentication and the admin surface
//! - `cli` - Command-line tools for migrations and record management
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access. Database encodings are available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, emails, choices, percentages and field limits

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
