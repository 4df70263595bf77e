//! Home commands.
//!
//! # Usage
//!
//! ```bash
//! mg-cli home create --owner-id 1 --street "1 Main St" --city Springfield \
//!     --state IL --postal-code 62701 --country USA --purchased 2020-06-15 --percentage 50
//! ```
//!
//! The address is reused when an identical one is already stored.

use chrono::NaiveDate;
use meroghar_admin::db::HomeRepository;
use meroghar_admin::models::{NewAddress, NewHome};
use meroghar_core::{AddressType, HomeId, OwnerId, OwnershipPercentage};

use super::{CommandError, connect};

/// Fields accepted by `home create`.
#[derive(Debug)]
pub struct HomeArgs {
    pub owner_id: i32,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub address_type: Option<AddressType>,
    pub date_of_purchase: Option<NaiveDate>,
    pub ownership_percentage: OwnershipPercentage,
}

impl HomeArgs {
    fn new_home(&self) -> Result<NewHome, CommandError> {
        let address = NewAddress::new(
            &self.street_address,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
            self.address_type,
        )?;
        Ok(NewHome {
            owner_id: OwnerId::new(self.owner_id),
            address,
            date_of_purchase: self.date_of_purchase,
            ownership_percentage: self.ownership_percentage,
        })
    }
}

/// Record a home for an owner.
///
/// # Returns
///
/// The ID of the created home.
pub async fn create(args: &HomeArgs) -> Result<HomeId, CommandError> {
    let new_home = args.new_home()?;
    let pool = connect().await?;

    let home = HomeRepository::new(&pool).create(&new_home).await?;

    tracing::info!(
        "Home created successfully! ID: {}, Address: {}, Share: {}%",
        home.id,
        home.address,
        home.ownership_percentage
    );
    Ok(home.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> HomeArgs {
        HomeArgs {
            owner_id: 3,
            street_address: " 1 Main St ".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            postal_code: "62701".to_owned(),
            country: "USA".to_owned(),
            address_type: Some(AddressType::Home),
            date_of_purchase: None,
            ownership_percentage: OwnershipPercentage::default(),
        }
    }

    #[test]
    fn test_new_home_keeps_address_as_given() {
        let home = args().new_home().ok();
        assert_eq!(
            home.as_ref().map(|h| h.address.street_address()),
            Some(" 1 Main St ")
        );
        assert_eq!(home.map(|h| h.owner_id), Some(OwnerId::new(3)));
    }

    #[test]
    fn test_new_home_rejects_blank_city() {
        let mut args = args();
        args.city = "  ".to_owned();
        assert!(matches!(args.new_home(), Err(CommandError::Field(_))));
    }
}
