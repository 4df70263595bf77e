//! Address admin handlers.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use meroghar_core::{AddressId, AddressType};

use crate::{
    db::AddressRepository,
    error::AppError,
    listing::{self, ListQuery, Listing, ListingConfig},
    middleware::RequireStaff,
    models::{Address, NewAddress},
    state::AppState,
};

/// Build the address router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/addresses", get(index).post(create))
        .route("/admin/addresses/config", get(config))
        .route("/admin/addresses/{id}", get(show).delete(destroy))
}

/// Address fields as submitted.
#[derive(Debug, Deserialize)]
pub struct AddressForm {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(rename = "type", default = "super::default_address_type")]
    pub kind: Option<AddressType>,
}

impl AddressForm {
    /// Validate into insertable fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a field is blank or too long.
    pub fn validate(&self) -> Result<NewAddress, AppError> {
        Ok(NewAddress::new(
            &self.street_address,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
            self.kind,
        )?)
    }
}

/// Address listing with search and filters.
#[instrument(skip(staff, state), fields(user_id = %staff.id))]
pub async fn index(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Listing<Address>>, AppError> {
    let query = ListQuery::from_params(params);
    Ok(Json(listing::addresses::list(state.pool(), &query).await?))
}

/// Listing configuration, with filter options loaded.
pub async fn config(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<Json<ListingConfig>, AppError> {
    let config = listing::addresses::config()
        .load_options(state.pool())
        .await
        .map_err(listing::ListingError::from)?;
    Ok(Json(config))
}

/// Create an address. Duplicates are allowed.
#[instrument(skip(staff, state, form), fields(user_id = %staff.id))]
pub async fn create(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Json(form): Json<AddressForm>,
) -> Result<(StatusCode, Json<Address>), AppError> {
    let address = AddressRepository::new(state.pool())
        .create(&form.validate()?)
        .await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// Address detail.
pub async fn show(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
) -> Result<Json<Address>, AppError> {
    AddressRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("address {id}")))
}

/// Delete an address.
#[instrument(skip(staff, state), fields(user_id = %staff.id))]
pub async fn destroy(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
) -> Result<StatusCode, AppError> {
    AddressRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
