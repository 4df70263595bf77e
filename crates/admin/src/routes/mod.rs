//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST   /auth/login                - Log in with email + password (form)
//! POST   /auth/logout               - Log out
//! GET    /auth/me                   - Current user, if any
//!
//! # Admin (staff only)
//! GET    /admin/addresses           - Address listing (?q=..., filters)
//! POST   /admin/addresses           - Create address
//! GET    /admin/addresses/config    - Listing configuration
//! GET    /admin/addresses/{id}      - Address detail
//! DELETE /admin/addresses/{id}      - Delete address
//!
//! GET    /admin/owners              - Owner listing
//! POST   /admin/owners              - Create owner
//! GET    /admin/owners/config       - Listing configuration
//! GET    /admin/owners/{id}         - Owner detail
//! PUT    /admin/owners/{id}         - Update owner
//! DELETE /admin/owners/{id}         - Delete owner (and homes)
//! GET    /admin/owners/{id}/homes   - Owner's homes
//! PUT    /admin/owners/{id}/picture - Upload profile picture (?filename=...)
//!
//! GET    /admin/homes               - Home listing
//! POST   /admin/homes               - Create home from address fields
//! GET    /admin/homes/config        - Listing configuration
//! GET    /admin/homes/{id}          - Home detail
//! DELETE /admin/homes/{id}          - Delete home
//! ```

pub mod addresses;
pub mod auth;
pub mod homes;
pub mod owners;

use axum::Router;
use meroghar_core::AddressType;

use crate::state::AppState;

/// Build the complete router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(addresses::router())
        .merge(owners::router())
        .merge(homes::router())
}

/// Missing `type` means the default; an explicit `null` stays `None`.
#[allow(clippy::unnecessary_wraps)]
fn default_address_type() -> Option<AddressType> {
    Some(AddressType::default())
}
