//! Core types for Meroghar.
//!
//! This module provides type-safe wrappers for the property-record domain.

pub mod choice;
pub mod email;
pub mod field;
pub mod id;
pub mod percentage;
pub mod picture;

pub use choice::{AddressType, MaritalStatus};
pub use email::{Email, EmailError};
pub use field::{FieldError, bounded_text, optional_text};
pub use id::*;
pub use percentage::OwnershipPercentage;
pub use picture::ProfilePicture;
