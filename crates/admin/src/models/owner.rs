//! Owner domain types.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use meroghar_core::{
    AddressId, FieldError, MaritalStatus, OwnerId, ProfilePicture, UserId, bounded_text,
    optional_text,
};

use super::Timestamps;

/// Column limits for owner text fields.
pub mod limits {
    pub const PHONE_NUMBER: usize = 15;
    pub const OCCUPATION: usize = 100;
    pub const SPOUSE_NAME: usize = 100;
}

/// A homeowner: the profile extension of exactly one user account.
#[derive(Debug, Clone, Serialize)]
pub struct Owner {
    pub id: OwnerId,
    pub user_id: UserId,
    /// Linked account's first name.
    pub first_name: String,
    /// Linked account's last name.
    pub last_name: String,
    pub phone_number: String,
    pub date_of_birth: Option<NaiveDate>,
    pub occupation: Option<String>,
    pub marital_status: MaritalStatus,
    pub spouse_name: Option<String>,
    pub profile_picture: Option<ProfilePicture>,
    pub address_id: Option<AddressId>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Owner {
    /// The editable profile fields, for mutate-then-update.
    #[must_use]
    pub fn fields(&self) -> OwnerFields {
        OwnerFields {
            phone_number: self.phone_number.clone(),
            date_of_birth: self.date_of_birth,
            occupation: self.occupation.clone(),
            marital_status: self.marital_status,
            spouse_name: self.spouse_name.clone(),
            profile_picture: self.profile_picture.clone(),
            address_id: self.address_id,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// Owner profile fields, used to create and to update an owner.
///
/// ```
/// use chrono::NaiveDate;
/// use meroghar_admin::models::OwnerFields;
/// use meroghar_core::MaritalStatus;
///
/// let fields = OwnerFields::new("555-1234", NaiveDate::from_ymd_opt(1980, 1, 1))
///     .occupation("Engineer");
/// assert_eq!(fields.marital_status, MaritalStatus::Single);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerFields {
    pub phone_number: String,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub marital_status: MaritalStatus,
    #[serde(default)]
    pub spouse_name: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<ProfilePicture>,
    #[serde(default)]
    pub address_id: Option<AddressId>,
}

impl OwnerFields {
    /// Required fields; everything else takes its default.
    #[must_use]
    pub fn new(phone_number: &str, date_of_birth: Option<NaiveDate>) -> Self {
        Self {
            phone_number: phone_number.to_owned(),
            date_of_birth,
            occupation: None,
            marital_status: MaritalStatus::default(),
            spouse_name: None,
            profile_picture: None,
            address_id: None,
        }
    }

    #[must_use]
    pub fn occupation(mut self, occupation: &str) -> Self {
        self.occupation = Some(occupation.to_owned());
        self
    }

    #[must_use]
    pub const fn marital_status(mut self, status: MaritalStatus) -> Self {
        self.marital_status = status;
        self
    }

    #[must_use]
    pub fn spouse_name(mut self, name: &str) -> Self {
        self.spouse_name = Some(name.to_owned());
        self
    }

    #[must_use]
    pub fn profile_picture(mut self, picture: ProfilePicture) -> Self {
        self.profile_picture = Some(picture);
        self
    }

    #[must_use]
    pub const fn address(mut self, address_id: AddressId) -> Self {
        self.address_id = Some(address_id);
        self
    }

    /// Checked copy: limits enforced and blank optional text collapsed to
    /// `None`. Non-blank text is kept as given.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the phone number is blank or any text
    /// field is longer than its column.
    pub fn validated(&self) -> Result<Self, FieldError> {
        if let Some(picture) = &self.profile_picture {
            let len = picture.as_str().chars().count();
            if len > ProfilePicture::MAX_LENGTH {
                return Err(FieldError::TooLong {
                    field: "profile_picture",
                    max: ProfilePicture::MAX_LENGTH,
                    len,
                });
            }
        }

        Ok(Self {
            phone_number: bounded_text("phone_number", &self.phone_number, limits::PHONE_NUMBER)?,
            date_of_birth: self.date_of_birth,
            occupation: optional_text("occupation", self.occupation.as_deref(), limits::OCCUPATION)?,
            marital_status: self.marital_status,
            spouse_name: optional_text(
                "spouse_name",
                self.spouse_name.as_deref(),
                limits::SPOUSE_NAME,
            )?,
            profile_picture: self.profile_picture.clone(),
            address_id: self.address_id,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_single() {
        let fields = OwnerFields::new("555-1234", NaiveDate::from_ymd_opt(1980, 1, 1));
        assert_eq!(fields.marital_status, MaritalStatus::Single);
        assert!(fields.occupation.is_none());
        assert!(fields.address_id.is_none());
    }

    #[test]
    fn test_validated_collapses_blanks_only() {
        let fields = OwnerFields::new(" 555-1234 ", None).occupation("   ").spouse_name("Sam");
        let clean = fields.validated().unwrap();
        assert_eq!(clean.phone_number, " 555-1234 ");
        assert_eq!(clean.occupation, None);
        assert_eq!(clean.spouse_name.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_validated_rejects_long_phone() {
        let fields = OwnerFields::new("+1 (555) 123-45678", None);
        assert!(matches!(
            fields.validated(),
            Err(FieldError::TooLong { field: "phone_number", max: 15, .. })
        ));
    }

    #[test]
    fn test_validated_requires_phone() {
        let fields = OwnerFields::new("", None);
        assert_eq!(
            fields.validated(),
            Err(FieldError::Required { field: "phone_number" })
        );
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let fields: OwnerFields =
            serde_json::from_str(r#"{"phone_number":"555","date_of_birth":"1980-01-01"}"#).unwrap();
        assert_eq!(fields.marital_status, MaritalStatus::Single);
        assert_eq!(fields.date_of_birth, NaiveDate::from_ymd_opt(1980, 1, 1));
    }
}
