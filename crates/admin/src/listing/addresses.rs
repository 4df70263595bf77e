//! Address listing.

use sqlx::PgPool;

use meroghar_core::AddressType;

use super::{
    FilterKind, FilterOption, ListQuery, Listing, ListingConfig, ListingError, TableColumn,
    TableFilter,
};
use crate::db::addresses::{ADDRESS_COLUMNS, AddressRow};
use crate::models::Address;

/// Listing configuration for addresses.
#[must_use]
pub fn config() -> ListingConfig {
    ListingConfig::new("addresses", "meroghar.address a", "a.id")
        .column(TableColumn::new("street_address", "Street address"))
        .column(TableColumn::new("city", "City"))
        .column(TableColumn::new("state", "State"))
        .column(TableColumn::new("postal_code", "Postal code"))
        .column(TableColumn::new("country", "Country"))
        .search("street_address", "a.street_address")
        .search("city", "a.city")
        .search("state", "a.state")
        .search("postal_code", "a.postal_code")
        .search("country", "a.country")
        .filter(TableFilter::distinct("state", "State", "a.state", FilterKind::Text))
        .filter(TableFilter::choice(
            "type",
            "Type",
            "a.type::text",
            AddressType::ALL
                .iter()
                .map(|t| FilterOption::new(t.as_str(), t.as_str()))
                .collect(),
        ))
        .order_by("city", "a.city")
        .order_by("street_address", "a.street_address")
        .search_placeholder("Search addresses by street, city, state, postal code or country...")
}

/// Run the address listing.
///
/// # Errors
///
/// Returns `ListingError` for an invalid filter or a failed query.
pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<Listing<Address>, ListingError> {
    let mut qb = config().build_query(ADDRESS_COLUMNS, query)?;
    let rows: Vec<AddressRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(Address::from).collect::<Vec<_>>().into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_type_filter_offers_every_choice() {
        let config = config();
        let filter = config.find_filter("type").unwrap();
        assert_eq!(filter.kind, FilterKind::Choice);
        assert_eq!(filter.options.len(), AddressType::ALL.len());
    }

    #[test]
    fn test_search_and_type_filter_sql() {
        let query = ListQuery {
            search: Some("springfield".to_owned()),
            filters: [("type".to_owned(), "Home".to_owned())].into(),
        };
        let qb = config().build_query("a.id", &query).unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT a.id FROM meroghar.address a WHERE TRUE \
             AND (a.street_address ILIKE $1 OR a.city ILIKE $2 OR a.state ILIKE $3 \
             OR a.postal_code ILIKE $4 OR a.country ILIKE $5) \
             AND a.type::text = $6 \
             ORDER BY a.city, a.street_address, a.id"
        );
    }
}
