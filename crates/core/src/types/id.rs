//! Newtype IDs for record references.
//!
//! Every table uses a `SERIAL` primary key; the wrappers below keep an
//! `OwnerId` from being passed where a `HomeId` is expected.

/// Define a type-safe ID wrapper around a `SERIAL` (`i32`) primary key.
///
/// The generated type is `Copy`, serializes transparently, and (with the
/// `postgres` feature) binds and decodes as an `INT4`.
///
/// # Example
///
/// ```rust
/// # use meroghar_core::define_id;
/// define_id!(ParcelId);
/// define_id!(DeedId);
///
/// let parcel = ParcelId::new(7);
/// assert_eq!(parcel.as_i32(), 7);
///
/// // Distinct types, so this won't compile:
/// // let _: DeedId = parcel;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw primary key.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// The raw primary key.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(UserId);
define_id!(AddressId);
define_id!(OwnerId);
define_id!(HomeId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_display_raw_value() {
        assert_eq!(OwnerId::new(42).to_string(), "42");
        assert_eq!(i32::from(HomeId::from(9)), 9);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&AddressId::new(3)).unwrap_or_default();
        assert_eq!(json, "3");
    }
}
