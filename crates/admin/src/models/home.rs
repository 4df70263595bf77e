//! Home domain types.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use meroghar_core::{HomeId, OwnerId, OwnershipPercentage};

use super::{Address, NewAddress, Timestamps};

/// An ownership record: one owner, one exclusively held address.
#[derive(Debug, Clone, Serialize)]
pub struct Home {
    pub id: HomeId,
    pub owner_id: OwnerId,
    pub address: Address,
    pub date_of_purchase: Option<NaiveDate>,
    pub ownership_percentage: OwnershipPercentage,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl fmt::Display for Home {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Home at {}", self.address)
    }
}

/// Input for creating a home from raw address fields.
#[derive(Debug, Clone)]
pub struct NewHome {
    pub owner_id: OwnerId,
    /// Resolved to an existing address on exact match, created otherwise.
    pub address: NewAddress,
    pub date_of_purchase: Option<NaiveDate>,
    pub ownership_percentage: OwnershipPercentage,
}
