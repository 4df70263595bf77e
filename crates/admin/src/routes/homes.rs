//! Home admin handlers.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;

use meroghar_core::{HomeId, OwnerId, OwnershipPercentage};

use super::addresses::AddressForm;
use crate::{
    db::HomeRepository,
    error::AppError,
    listing::{self, ListQuery, Listing, ListingConfig, ListingError, homes::HomeListItem},
    middleware::RequireStaff,
    models::{Home, NewHome},
    state::AppState,
};

/// Build the home router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/homes", get(index).post(create))
        .route("/admin/homes/config", get(config))
        .route("/admin/homes/{id}", get(show).delete(destroy))
}

/// Request to create a home from raw address fields.
#[derive(Debug, Deserialize)]
pub struct CreateHomeRequest {
    pub owner_id: OwnerId,
    #[serde(flatten)]
    pub address: AddressForm,
    #[serde(default)]
    pub date_of_purchase: Option<NaiveDate>,
    #[serde(default)]
    pub ownership_percentage: OwnershipPercentage,
}

impl CreateHomeRequest {
    fn validate(&self) -> Result<NewHome, AppError> {
        Ok(NewHome {
            owner_id: self.owner_id,
            address: self.address.validate()?,
            date_of_purchase: self.date_of_purchase,
            ownership_percentage: self.ownership_percentage,
        })
    }
}

/// Home listing with search and filters.
#[instrument(skip(staff, state), fields(user_id = %staff.id))]
pub async fn index(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Listing<HomeListItem>>, AppError> {
    let query = ListQuery::from_params(params);
    Ok(Json(listing::homes::list(state.pool(), &query).await?))
}

/// Listing configuration, with filter options loaded.
pub async fn config(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<Json<ListingConfig>, AppError> {
    let config = listing::homes::config()
        .load_options(state.pool())
        .await
        .map_err(ListingError::from)?;
    Ok(Json(config))
}

/// Create a home, reusing an identical address if one exists.
#[instrument(skip(staff, state, body), fields(user_id = %staff.id))]
pub async fn create(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Json(body): Json<CreateHomeRequest>,
) -> Result<(StatusCode, Json<Home>), AppError> {
    let home = HomeRepository::new(state.pool())
        .create(&body.validate()?)
        .await?;
    Ok((StatusCode::CREATED, Json(home)))
}

/// Home detail.
pub async fn show(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<HomeId>,
) -> Result<Json<Home>, AppError> {
    HomeRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("home {id}")))
}

/// Delete a home. Its address is kept.
#[instrument(skip(staff, state), fields(user_id = %staff.id))]
pub async fn destroy(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<HomeId>,
) -> Result<StatusCode, AppError> {
    HomeRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
