//! Address domain types.

use std::fmt;

use serde::{Deserialize, Serialize};

use meroghar_core::{AddressId, AddressType, FieldError, bounded_text};

/// Column limits for address text fields.
pub mod limits {
    pub const STREET_ADDRESS: usize = 255;
    pub const CITY: usize = 100;
    pub const STATE: usize = 100;
    pub const POSTAL_CODE: usize = 20;
    pub const COUNTRY: usize = 100;
}

/// A stored physical address.
///
/// Referenced by at most one owner and at most one home at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub id: AddressId,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(rename = "type")]
    pub kind: Option<AddressType>,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}",
            self.street_address, self.city, self.state, self.postal_code, self.country
        )
    }
}

/// Validated address fields, used both to insert and as the exact-match key
/// of get-or-create.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewAddress {
    street_address: String,
    city: String,
    state: String,
    postal_code: String,
    country: String,
    #[serde(rename = "type")]
    kind: Option<AddressType>,
}

impl NewAddress {
    /// Validate address fields against their column limits.
    ///
    /// Pass `Some(AddressType::Home)` for the usual default; `None` stores a
    /// NULL type.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when a field is blank or too long.
    pub fn new(
        street_address: &str,
        city: &str,
        state: &str,
        postal_code: &str,
        country: &str,
        kind: Option<AddressType>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            street_address: bounded_text("street_address", street_address, limits::STREET_ADDRESS)?,
            city: bounded_text("city", city, limits::CITY)?,
            state: bounded_text("state", state, limits::STATE)?,
            postal_code: bounded_text("postal_code", postal_code, limits::POSTAL_CODE)?,
            country: bounded_text("country", country, limits::COUNTRY)?,
            kind,
        })
    }

    /// Re-run validation, e.g. after deserializing from a request body.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when a field is blank or too long.
    pub fn validated(&self) -> Result<Self, FieldError> {
        Self::new(
            &self.street_address,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
            self.kind,
        )
    }

    #[must_use]
    pub fn street_address(&self) -> &str {
        &self.street_address
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    #[must_use]
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    #[must_use]
    pub const fn kind(&self) -> Option<AddressType> {
        self.kind
    }

    /// Stable key for the advisory lock serializing get-or-create on
    /// identical fields. Fields are joined with a unit separator so
    /// `("a b", "c")` and `("a", "b c")` differ.
    #[must_use]
    pub fn lock_key(&self) -> String {
        [
            self.street_address.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.postal_code.as_str(),
            self.country.as_str(),
            self.kind.map_or("", AddressType::as_str),
        ]
        .join("\u{1f}")
    }
}
