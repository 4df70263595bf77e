//! Address repository.
//!
//! Addresses are created either directly or through [`get_or_create`],
//! which Home creation uses to reuse an exact match.
//!
//! [`get_or_create`]: AddressRepository::get_or_create

use sqlx::{PgConnection, PgPool};

use meroghar_core::{AddressId, AddressType};

use super::RepositoryError;
use crate::models::{Address, NewAddress};

/// Columns selected for an [`Address`]; the enum is read back as text.
pub(crate) const ADDRESS_COLUMNS: &str =
    "id, street_address, city, state, postal_code, country, type::text AS type";

#[derive(sqlx::FromRow)]
pub(crate) struct AddressRow {
    id: AddressId,
    street_address: String,
    city: String,
    state: String,
    postal_code: String,
    country: String,
    #[sqlx(rename = "type")]
    kind: Option<AddressType>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: row.id,
            street_address: row.street_address,
            city: row.city,
            state: row.state,
            postal_code: row.postal_code,
            country: row.country,
            kind: row.kind,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ResolvedAddressRow {
    #[sqlx(flatten)]
    address: AddressRow,
    created: bool,
}

/// Repository for address operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new address. Duplicates are not checked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if a field is blank or too long.
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, address: &NewAddress) -> Result<Address, RepositoryError> {
        let address = address.validated()?;

        let row: AddressRow = sqlx::query_as(&format!(
            r"
            INSERT INTO meroghar.address
                (street_address, city, state, postal_code, country, type)
            VALUES ($1, $2, $3, $4, $5, $6::meroghar.address_type)
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(address.street_address())
        .bind(address.city())
        .bind(address.state())
        .bind(address.postal_code())
        .bind(address.country())
        .bind(address.kind())
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(address_id = %row.id, "address created");
        Ok(row.into())
    }

    /// Get an address by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let row: Option<AddressRow> = sqlx::query_as(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM meroghar.address WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Address::from))
    }

    /// Find an address matching every field exactly, or insert one.
    ///
    /// Returns the address and whether it was created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if a field is blank or too long.
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn get_or_create(
        &self,
        address: &NewAddress,
    ) -> Result<(Address, bool), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let resolved = Self::get_or_create_in(&mut *tx, address).await?;
        tx.commit().await?;
        Ok(resolved)
    }

    /// [`get_or_create`](Self::get_or_create) inside the caller's
    /// transaction.
    ///
    /// A transaction-scoped advisory lock keyed on the match fields
    /// serializes concurrent callers with identical input, so two of them
    /// never both insert. The lock is released at commit or rollback.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if a field is blank or too long.
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn get_or_create_in(
        conn: &mut PgConnection,
        address: &NewAddress,
    ) -> Result<(Address, bool), RepositoryError> {
        let address = address.validated()?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(address.lock_key())
            .execute(&mut *conn)
            .await?;

        let row: ResolvedAddressRow = sqlx::query_as(&format!(
            r"
            WITH existing AS (
                SELECT {ADDRESS_COLUMNS}
                FROM meroghar.address
                WHERE street_address = $1
                  AND city = $2
                  AND state = $3
                  AND postal_code = $4
                  AND country = $5
                  AND type IS NOT DISTINCT FROM $6::meroghar.address_type
                ORDER BY id
                LIMIT 1
            ),
            inserted AS (
                INSERT INTO meroghar.address
                    (street_address, city, state, postal_code, country, type)
                SELECT $1, $2, $3, $4, $5, $6::meroghar.address_type
                WHERE NOT EXISTS (SELECT 1 FROM existing)
                RETURNING {ADDRESS_COLUMNS}
            )
            SELECT existing.*, FALSE AS created FROM existing
            UNION ALL
            SELECT inserted.*, TRUE AS created FROM inserted
            "
        ))
        .bind(address.street_address())
        .bind(address.city())
        .bind(address.state())
        .bind(address.postal_code())
        .bind(address.country())
        .bind(address.kind())
        .fetch_one(&mut *conn)
        .await?;

        if row.created {
            tracing::debug!(address_id = %row.address.id, "address created by get_or_create");
        }
        Ok((row.address.into(), row.created))
    }

    /// Delete an address.
    ///
    /// The home built on it is deleted; an owner living there keeps its
    /// record with the address cleared.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: AddressId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM meroghar.address WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        tracing::info!(address_id = %id, "address deleted");
        Ok(())
    }
}
