//! Enumerated column values.
//!
//! Stored as `PostgreSQL` enum types whose labels match the variant names,
//! so the wire form ("Single", "Home") is the same in JSON, SQL and forms.
//! Values travel as `TEXT`; queries cast with `::meroghar.marital_status`
//! on write and `::text` on read.

use serde::{Deserialize, Serialize};

use super::field::FieldError;

/// Marital status of an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    Divorced,
    Widowed,
    Separated,
}

impl MaritalStatus {
    /// Every choice, in display order.
    pub const ALL: [Self; 5] = [
        Self::Single,
        Self::Married,
        Self::Divorced,
        Self::Widowed,
        Self::Separated,
    ];

    /// Stored label for this choice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Married => "Married",
            Self::Divorced => "Divorced",
            Self::Widowed => "Widowed",
            Self::Separated => "Separated",
        }
    }
}

impl std::fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MaritalStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FieldError::InvalidChoice {
                field: "marital_status",
                value: s.to_owned(),
            })
    }
}

/// Category of an address.
///
/// The column is nullable; `None` is a legitimate "uncategorized" value and
/// takes part in address matching like any other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AddressType {
    #[default]
    Home,
    Office,
    Mailing,
    Rental,
    Other,
}

impl AddressType {
    /// Every choice, in display order.
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Office,
        Self::Mailing,
        Self::Rental,
        Self::Other,
    ];

    /// Stored label for this choice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Office => "Office",
            Self::Mailing => "Mailing",
            Self::Rental => "Rental",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AddressType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FieldError::InvalidChoice {
                field: "type",
                value: s.to_owned(),
            })
    }
}

macro_rules! text_choice_sqlx {
    ($name:ident) => {
        #[cfg(feature = "postgres")]
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                Ok(s.parse::<Self>()?)
            }
        }

        #[cfg(feature = "postgres")]
        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

text_choice_sqlx!(MaritalStatus);
text_choice_sqlx!(AddressType);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(MaritalStatus::default(), MaritalStatus::Single);
        assert_eq!(AddressType::default(), AddressType::Home);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("married".parse::<MaritalStatus>().ok(), Some(MaritalStatus::Married));
        assert_eq!(" RENTAL ".parse::<AddressType>().ok(), Some(AddressType::Rental));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "engaged".parse::<MaritalStatus>();
        assert!(matches!(
            err,
            Err(FieldError::InvalidChoice { field: "marital_status", .. })
        ));
    }

    #[test]
    fn test_labels_roundtrip() {
        for status in MaritalStatus::ALL {
            assert_eq!(status.as_str().parse::<MaritalStatus>().ok(), Some(status));
        }
        for kind in AddressType::ALL {
            assert_eq!(kind.to_string().parse::<AddressType>().ok(), Some(kind));
        }
    }
}
