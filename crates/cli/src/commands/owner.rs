//! Owner profile commands.
//!
//! # Usage
//!
//! ```bash
//! mg-cli owner create --user-id 1 --phone 555-1234 --dob 1980-01-01 \
//!     --occupation Engineer --marital-status Married --spouse-name Sam
//! ```

use chrono::NaiveDate;
use meroghar_admin::db::OwnerRepository;
use meroghar_admin::models::OwnerFields;
use meroghar_core::{AddressId, MaritalStatus, OwnerId, UserId};

use super::{CommandError, connect};

/// Profile fields accepted by `owner create`.
#[derive(Debug)]
pub struct OwnerArgs {
    pub user_id: i32,
    pub phone_number: String,
    pub date_of_birth: Option<NaiveDate>,
    pub occupation: Option<String>,
    pub marital_status: MaritalStatus,
    pub spouse_name: Option<String>,
    pub address_id: Option<i32>,
}

impl OwnerArgs {
    fn fields(&self) -> OwnerFields {
        let mut fields = OwnerFields::new(&self.phone_number, self.date_of_birth)
            .marital_status(self.marital_status);
        if let Some(occupation) = &self.occupation {
            fields = fields.occupation(occupation);
        }
        if let Some(spouse) = &self.spouse_name {
            fields = fields.spouse_name(spouse);
        }
        if let Some(address_id) = self.address_id {
            fields = fields.address(AddressId::new(address_id));
        }
        fields
    }
}

/// Create the owner profile of an existing user.
///
/// # Returns
///
/// The ID of the created owner.
pub async fn create(args: &OwnerArgs) -> Result<OwnerId, CommandError> {
    let fields = args.fields().validated()?;
    let pool = connect().await?;

    let owner = OwnerRepository::new(&pool)
        .create(UserId::new(args.user_id), &fields)
        .await?;

    tracing::info!("Owner created successfully! ID: {}, Name: {}", owner.id, owner);
    Ok(owner.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_carry_optional_args() {
        let args = OwnerArgs {
            user_id: 1,
            phone_number: "555-1234".to_owned(),
            date_of_birth: NaiveDate::from_ymd_opt(1980, 1, 1),
            occupation: Some("Engineer".to_owned()),
            marital_status: MaritalStatus::Married,
            spouse_name: None,
            address_id: Some(4),
        };

        let fields = args.fields();
        assert_eq!(fields.occupation.as_deref(), Some("Engineer"));
        assert_eq!(fields.marital_status, MaritalStatus::Married);
        assert_eq!(fields.spouse_name, None);
        assert_eq!(fields.address_id, Some(AddressId::new(4)));
    }
}
