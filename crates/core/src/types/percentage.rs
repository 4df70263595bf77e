//! Ownership share of a home.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::field::FieldError;

/// Percentage of a home held by its owner, stored as `NUMERIC(5, 2)`.
///
/// Always carries exactly two fractional digits and lies in
/// `0.00..=100.00`.
///
/// ```
/// use meroghar_core::OwnershipPercentage;
/// use rust_decimal::Decimal;
///
/// let full = OwnershipPercentage::default();
/// assert_eq!(full.to_string(), "100.00");
///
/// let half = OwnershipPercentage::new(Decimal::new(50, 0)).unwrap();
/// assert_eq!(half.to_string(), "50.00");
///
/// assert!(OwnershipPercentage::new(Decimal::new(12345, 3)).is_err()); // 12.345
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct OwnershipPercentage(Decimal);

impl OwnershipPercentage {
    /// Fractional digits kept by the column.
    pub const SCALE: u32 = 2;

    /// Validate a percentage.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidDecimal`] if the value has more than two
    /// significant fractional digits, is negative, or exceeds 100.
    pub fn new(value: Decimal) -> Result<Self, FieldError> {
        let normalized = value.normalize();
        if normalized.scale() > Self::SCALE {
            return Err(invalid(format!(
                "at most {} decimal places allowed (got {value})",
                Self::SCALE
            )));
        }
        if value.is_sign_negative() && !value.is_zero() {
            return Err(invalid(format!("cannot be negative (got {value})")));
        }
        if value > Decimal::ONE_HUNDRED {
            return Err(invalid(format!("cannot exceed 100 (got {value})")));
        }

        let mut scaled = normalized;
        scaled.rescale(Self::SCALE);
        Ok(Self(scaled))
    }

    /// The underlying decimal, scaled to two places.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl Default for OwnershipPercentage {
    fn default() -> Self {
        Self(Decimal::new(10_000, Self::SCALE))
    }
}

impl std::fmt::Display for OwnershipPercentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OwnershipPercentage {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<Decimal>()
            .map_err(|e| invalid(format!("not a decimal number: {e}")))?;
        Self::new(value)
    }
}

impl TryFrom<Decimal> for OwnershipPercentage {
    type Error = FieldError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OwnershipPercentage> for Decimal {
    fn from(p: OwnershipPercentage) -> Self {
        p.0
    }
}

fn invalid(reason: String) -> FieldError {
    FieldError::InvalidDecimal {
        field: "ownership_percentage",
        reason,
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for OwnershipPercentage {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for OwnershipPercentage {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let d = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(d)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for OwnershipPercentage {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
