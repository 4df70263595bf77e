//! Domain models for Meroghar.
//!
//! These types are separate from the database row types in `db`, which
//! convert into them after validation.

pub mod address;
pub mod home;
pub mod owner;
pub mod session;
pub mod timestamps;
pub mod user;

pub use address::{Address, NewAddress};
pub use home::{Home, NewHome};
pub use owner::{Owner, OwnerFields};
pub use session::{CurrentUser, keys as session_keys};
pub use timestamps::Timestamps;
pub use user::{NewUser, User};
