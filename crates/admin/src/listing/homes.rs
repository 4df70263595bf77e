//! Home listing.

use serde::Serialize;
use sqlx::PgPool;

use super::{
    FilterKind, ListQuery, Listing, ListingConfig, ListingError, TableColumn, TableFilter,
};
use crate::db::homes::{HOME_COLUMNS, HomeRow};
use crate::models::Home;

const FROM: &str = r#"meroghar.home h
    JOIN meroghar.address a ON a.id = h.address_id
    JOIN meroghar.owner o ON o.id = h.owner_id
    JOIN meroghar."user" u ON u.id = o.user_id"#;

/// Listing configuration for homes.
#[must_use]
pub fn config() -> ListingConfig {
    ListingConfig::new("homes", FROM, "h.id")
        .column(TableColumn::new("owner", "Owner"))
        .column(TableColumn::new("address", "Address"))
        .column(TableColumn::new("date_of_purchase", "Date of purchase"))
        .column(TableColumn::new("ownership_percentage", "Ownership percentage"))
        .search("owner__user__first_name", "u.first_name")
        .search("owner__user__last_name", "u.last_name")
        .search("address__street_address", "a.street_address")
        .search("address__city", "a.city")
        .filter(TableFilter::date(
            "date_of_purchase",
            "Date of purchase",
            "h.date_of_purchase",
        ))
        .filter(TableFilter::distinct(
            "ownership_percentage",
            "Ownership percentage",
            "h.ownership_percentage",
            FilterKind::Decimal,
        ))
        .order_by("address__city", "a.city")
        .order_by("address__street_address", "a.street_address")
        .search_placeholder("Search homes by owner name, street or city...")
}

/// A home as listed, with its owner's display name.
#[derive(Debug, Clone, Serialize)]
pub struct HomeListItem {
    #[serde(flatten)]
    pub home: Home,
    /// "First Last" of the owner.
    pub owner: String,
    /// "Home at ..." rendering.
    pub display_name: String,
}

#[derive(sqlx::FromRow)]
struct HomeListRow {
    #[sqlx(flatten)]
    home: HomeRow,
    owner_first_name: String,
    owner_last_name: String,
}

impl From<HomeListRow> for HomeListItem {
    fn from(row: HomeListRow) -> Self {
        let home = Home::from(row.home);
        Self {
            display_name: home.to_string(),
            owner: format!("{} {}", row.owner_first_name, row.owner_last_name),
            home,
        }
    }
}

/// Run the home listing.
///
/// # Errors
///
/// Returns `ListingError` for an invalid filter or a failed query.
pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<Listing<HomeListItem>, ListingError> {
    let select =
        format!("{HOME_COLUMNS}, u.first_name AS owner_first_name, u.last_name AS owner_last_name");
    let mut qb = config().build_query(&select, query)?;
    let rows: Vec<HomeListRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(HomeListItem::from)
        .collect::<Vec<_>>()
        .into())
}
