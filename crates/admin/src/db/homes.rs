//! Home repository.
//!
//! A home is read together with its address (`h` joined with `a`), which
//! it renders and sorts by.

use chrono::NaiveDate;
use sqlx::PgPool;

use meroghar_core::{AddressId, AddressType, HomeId, OwnerId, OwnershipPercentage};

use super::{AddressRepository, RepositoryError};
use crate::models::{Address, Home, NewHome, Timestamps};

pub(crate) const HOME_COLUMNS: &str = "h.id, h.owner_id, h.date_of_purchase, h.ownership_percentage, \
     h.created_at, h.updated_at, a.id AS address_id, a.street_address, a.city, a.state, \
     a.postal_code, a.country, a.type::text AS type";

#[derive(sqlx::FromRow)]
pub(crate) struct HomeRow {
    id: HomeId,
    owner_id: OwnerId,
    date_of_purchase: Option<NaiveDate>,
    ownership_percentage: OwnershipPercentage,
    #[sqlx(flatten)]
    timestamps: Timestamps,
    address_id: AddressId,
    street_address: String,
    city: String,
    state: String,
    postal_code: String,
    country: String,
    #[sqlx(rename = "type")]
    kind: Option<AddressType>,
}

impl From<HomeRow> for Home {
    fn from(row: HomeRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            address: Address {
                id: row.address_id,
                street_address: row.street_address,
                city: row.city,
                state: row.state,
                postal_code: row.postal_code,
                country: row.country,
                kind: row.kind,
            },
            date_of_purchase: row.date_of_purchase,
            ownership_percentage: row.ownership_percentage,
            timestamps: row.timestamps,
        }
    }
}

fn write_error(err: sqlx::Error) -> RepositoryError {
    let constraint = match &err {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_owned),
        _ => None,
    };
    let context = match constraint.as_deref() {
        Some("home_address_id_key") => "address already backs another home",
        Some("home_owner_id_fkey") => "owner does not exist",
        _ => "home",
    };
    RepositoryError::from_write(err, context)
}

/// Repository for home operations.
pub struct HomeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HomeRepository<'a> {
    /// Create a new home repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a home from raw address fields.
    ///
    /// The address is resolved by exact match or created, then bound to the
    /// new home. Both steps share one transaction: if the home insert fails
    /// no address is left behind.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if an address field is invalid.
    /// Returns `RepositoryError::Conflict` if the address already backs a home.
    /// Returns `RepositoryError::InvalidReference` if the owner doesn't exist.
    pub async fn create(&self, new_home: &NewHome) -> Result<Home, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (address, _created) =
            AddressRepository::get_or_create_in(&mut *tx, &new_home.address).await?;

        let row: HomeRow = sqlx::query_as(&format!(
            r"
            WITH h AS (
                INSERT INTO meroghar.home
                    (owner_id, address_id, date_of_purchase, ownership_percentage)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT {HOME_COLUMNS}
            FROM h
            JOIN meroghar.address a ON a.id = h.address_id
            "
        ))
        .bind(new_home.owner_id)
        .bind(address.id)
        .bind(new_home.date_of_purchase)
        .bind(new_home.ownership_percentage)
        .fetch_one(&mut *tx)
        .await
        .map_err(write_error)?;

        tx.commit().await?;

        tracing::info!(
            home_id = %row.id,
            owner_id = %row.owner_id,
            address_id = %row.address_id,
            "home created"
        );
        Ok(row.into())
    }

    /// Get a home by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: HomeId) -> Result<Option<Home>, RepositoryError> {
        let row: Option<HomeRow> = sqlx::query_as(&format!(
            r"
            SELECT {HOME_COLUMNS}
            FROM meroghar.home h
            JOIN meroghar.address a ON a.id = h.address_id
            WHERE h.id = $1
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Home::from))
    }

    /// List an owner's homes, ordered by city then street.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(&self, owner_id: OwnerId) -> Result<Vec<Home>, RepositoryError> {
        let rows: Vec<HomeRow> = sqlx::query_as(&format!(
            r"
            SELECT {HOME_COLUMNS}
            FROM meroghar.home h
            JOIN meroghar.address a ON a.id = h.address_id
            WHERE h.owner_id = $1
            ORDER BY a.city, a.street_address, h.id
            "
        ))
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Home::from).collect())
    }

    /// Delete a home. Its address is kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the home doesn't exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: HomeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM meroghar.home WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        tracing::info!(home_id = %id, "home deleted");
        Ok(())
    }
}
