//! Owner listing.
//!
//! Rows carry the owner's email and address alongside the owner itself.

use serde::Serialize;
use sqlx::PgPool;

use meroghar_core::{AddressType, MaritalStatus};

use super::{
    FilterKind, FilterOption, ListQuery, Listing, ListingConfig, ListingError, TableColumn,
    TableFilter,
};
use crate::config::MEDIA_URL;
use crate::db::owners::{OWNER_COLUMNS, OwnerRow};
use crate::models::{Address, Owner};

const FROM: &str = r#"meroghar.owner o
    JOIN meroghar."user" u ON u.id = o.user_id
    LEFT JOIN meroghar.address a ON a.id = o.address_id"#;

/// Listing configuration for owners.
#[must_use]
pub fn config() -> ListingConfig {
    ListingConfig::new("owners", FROM, "o.id")
        .column(TableColumn::new("user", "User"))
        .column(TableColumn::new("occupation", "Occupation"))
        .column(TableColumn::new("marital_status", "Marital status"))
        .column(TableColumn::new("spouse_name", "Spouse name"))
        .column(TableColumn::new("address", "Address"))
        .search("user__first_name", "u.first_name")
        .search("user__last_name", "u.last_name")
        .search("user__email", "u.email")
        .search("occupation", "o.occupation")
        .search("spouse_name", "o.spouse_name")
        .search("address__street_address", "a.street_address")
        .filter(TableFilter::choice(
            "marital_status",
            "Marital status",
            "o.marital_status::text",
            MaritalStatus::ALL
                .iter()
                .map(|s| FilterOption::new(s.as_str(), s.as_str()))
                .collect(),
        ))
        .filter(TableFilter::distinct(
            "occupation",
            "Occupation",
            "o.occupation",
            FilterKind::Text,
        ))
        .order_by("user__last_name", "u.last_name")
        .order_by("user__first_name", "u.first_name")
        .search_placeholder("Search owners by name, email, occupation, spouse or street...")
}

/// An owner as listed: the record plus its display fields.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerListItem {
    #[serde(flatten)]
    pub owner: Owner,
    /// "First Last" of the linked account.
    pub display_name: String,
    pub email: String,
    pub address: Option<Address>,
    /// Public URL of the profile picture.
    pub profile_picture_url: Option<String>,
}

#[derive(sqlx::FromRow)]
struct OwnerListRow {
    #[sqlx(flatten)]
    owner: OwnerRow,
    email: String,
    address_street_address: Option<String>,
    address_city: Option<String>,
    address_state: Option<String>,
    address_postal_code: Option<String>,
    address_country: Option<String>,
    address_type: Option<AddressType>,
}

impl From<OwnerListRow> for OwnerListItem {
    fn from(row: OwnerListRow) -> Self {
        let owner = Owner::from(row.owner);
        let address = match (
            owner.address_id,
            row.address_street_address,
            row.address_city,
            row.address_state,
            row.address_postal_code,
            row.address_country,
        ) {
            (Some(id), Some(street_address), Some(city), Some(state), Some(postal_code), Some(country)) => {
                Some(Address {
                    id,
                    street_address,
                    city,
                    state,
                    postal_code,
                    country,
                    kind: row.address_type,
                })
            }
            _ => None,
        };

        Self {
            display_name: owner.to_string(),
            profile_picture_url: owner.profile_picture.as_ref().map(|p| p.url(MEDIA_URL)),
            owner,
            email: row.email,
            address,
        }
    }
}

/// Run the owner listing.
///
/// # Errors
///
/// Returns `ListingError` for an invalid filter or a failed query.
pub async fn list(
    pool: &PgPool,
    query: &ListQuery,
) -> Result<Listing<OwnerListItem>, ListingError> {
    let select = format!(
        "{OWNER_COLUMNS}, u.email, a.street_address AS address_street_address, \
         a.city AS address_city, a.state AS address_state, \
         a.postal_code AS address_postal_code, a.country AS address_country, \
         a.type::text AS address_type"
    );
    let mut qb = config().build_query(&select, query)?;
    let rows: Vec<OwnerListRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(OwnerListItem::from)
        .collect::<Vec<_>>()
        .into())
}
