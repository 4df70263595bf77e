//! Owner repository.
//!
//! Owner rows are always read joined to their user account, since the
//! account holds the names an owner is displayed by.

use chrono::NaiveDate;
use sqlx::PgPool;

use meroghar_core::{AddressId, MaritalStatus, OwnerId, ProfilePicture, UserId};

use super::{HomeRepository, RepositoryError};
use crate::models::{Home, Owner, OwnerFields, Timestamps};

/// Owner columns, qualified for `o` (owner) joined with `u` (user).
pub(crate) const OWNER_COLUMNS: &str = "o.id, o.user_id, u.first_name, u.last_name, o.phone_number, \
     o.date_of_birth, o.occupation, o.marital_status::text AS marital_status, o.spouse_name, \
     o.profile_picture, o.address_id, o.created_at, o.updated_at";

#[derive(sqlx::FromRow)]
pub(crate) struct OwnerRow {
    id: OwnerId,
    user_id: UserId,
    first_name: String,
    last_name: String,
    phone_number: String,
    date_of_birth: Option<NaiveDate>,
    occupation: Option<String>,
    marital_status: MaritalStatus,
    spouse_name: Option<String>,
    profile_picture: Option<String>,
    address_id: Option<AddressId>,
    #[sqlx(flatten)]
    timestamps: Timestamps,
}

impl From<OwnerRow> for Owner {
    fn from(row: OwnerRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
            date_of_birth: row.date_of_birth,
            occupation: row.occupation,
            marital_status: row.marital_status,
            spouse_name: row.spouse_name,
            profile_picture: row.profile_picture.map(ProfilePicture::from_stored),
            address_id: row.address_id,
            timestamps: row.timestamps,
        }
    }
}

/// Map an owner write failure onto the constraint it tripped.
fn write_error(err: sqlx::Error) -> RepositoryError {
    let constraint = match &err {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_owned),
        _ => None,
    };
    let context = match constraint.as_deref() {
        Some("owner_user_id_key") => "user already has an owner profile",
        Some("owner_address_id_key") => "address already belongs to another owner",
        Some("owner_user_id_fkey") => "user does not exist",
        Some("owner_address_id_fkey") => "address does not exist",
        _ => "owner",
    };
    RepositoryError::from_write(err, context)
}

/// Repository for owner operations.
pub struct OwnerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OwnerRepository<'a> {
    /// Create a new owner repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create the owner profile of an existing user account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if a field is invalid.
    /// Returns `RepositoryError::Conflict` if the user already has an owner,
    /// or the address already belongs to another owner.
    /// Returns `RepositoryError::InvalidReference` if the user or address
    /// doesn't exist.
    pub async fn create(
        &self,
        user_id: UserId,
        fields: &OwnerFields,
    ) -> Result<Owner, RepositoryError> {
        let fields = fields.validated()?;

        let row: OwnerRow = sqlx::query_as(&format!(
            r#"
            WITH o AS (
                INSERT INTO meroghar.owner
                    (user_id, phone_number, date_of_birth, occupation, marital_status,
                     spouse_name, profile_picture, address_id)
                VALUES ($1, $2, $3, $4, $5::meroghar.marital_status, $6, $7, $8)
                RETURNING *
            )
            SELECT {OWNER_COLUMNS}
            FROM o
            JOIN meroghar."user" u ON u.id = o.user_id
            "#
        ))
        .bind(user_id)
        .bind(&fields.phone_number)
        .bind(fields.date_of_birth)
        .bind(fields.occupation.as_deref())
        .bind(fields.marital_status)
        .bind(fields.spouse_name.as_deref())
        .bind(fields.profile_picture.as_ref().map(ProfilePicture::as_str))
        .bind(fields.address_id)
        .fetch_one(self.pool)
        .await
        .map_err(write_error)?;

        tracing::info!(owner_id = %row.id, user_id = %user_id, "owner created");
        Ok(row.into())
    }

    /// Get an owner by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OwnerId) -> Result<Option<Owner>, RepositoryError> {
        let row: Option<OwnerRow> = sqlx::query_as(&format!(
            r#"
            SELECT {OWNER_COLUMNS}
            FROM meroghar.owner o
            JOIN meroghar."user" u ON u.id = o.user_id
            WHERE o.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Owner::from))
    }

    /// Get the owner profile of a user account, if it has one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Owner>, RepositoryError> {
        let row: Option<OwnerRow> = sqlx::query_as(&format!(
            r#"
            SELECT {OWNER_COLUMNS}
            FROM meroghar.owner o
            JOIN meroghar."user" u ON u.id = o.user_id
            WHERE o.user_id = $1
            "#
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Owner::from))
    }

    /// Overwrite an owner's profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owner doesn't exist.
    /// Returns `RepositoryError::Validation` if a field is invalid.
    /// Returns `RepositoryError::Conflict` if the address already belongs to
    /// another owner.
    /// Returns `RepositoryError::InvalidReference` if the address doesn't
    /// exist.
    pub async fn update(
        &self,
        id: OwnerId,
        fields: &OwnerFields,
    ) -> Result<Owner, RepositoryError> {
        let fields = fields.validated()?;

        let row: Option<OwnerRow> = sqlx::query_as(&format!(
            r#"
            WITH o AS (
                UPDATE meroghar.owner
                SET phone_number = $2,
                    date_of_birth = $3,
                    occupation = $4,
                    marital_status = $5::meroghar.marital_status,
                    spouse_name = $6,
                    profile_picture = $7,
                    address_id = $8
                WHERE id = $1
                RETURNING *
            )
            SELECT {OWNER_COLUMNS}
            FROM o
            JOIN meroghar."user" u ON u.id = o.user_id
            "#
        ))
        .bind(id)
        .bind(&fields.phone_number)
        .bind(fields.date_of_birth)
        .bind(fields.occupation.as_deref())
        .bind(fields.marital_status)
        .bind(fields.spouse_name.as_deref())
        .bind(fields.profile_picture.as_ref().map(ProfilePicture::as_str))
        .bind(fields.address_id)
        .fetch_optional(self.pool)
        .await
        .map_err(write_error)?;

        let owner = row.map(Owner::from).ok_or(RepositoryError::NotFound)?;
        tracing::info!(owner_id = %owner.id, "owner updated");
        Ok(owner)
    }

    /// Point an owner at a new profile picture, leaving the other profile
    /// fields as they are.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owner doesn't exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_profile_picture(
        &self,
        id: OwnerId,
        picture: &ProfilePicture,
    ) -> Result<Owner, RepositoryError> {
        let row: Option<OwnerRow> = sqlx::query_as(&format!(
            r#"
            WITH o AS (
                UPDATE meroghar.owner
                SET profile_picture = $2
                WHERE id = $1
                RETURNING *
            )
            SELECT {OWNER_COLUMNS}
            FROM o
            JOIN meroghar."user" u ON u.id = o.user_id
            "#
        ))
        .bind(id)
        .bind(picture.as_str())
        .fetch_optional(self.pool)
        .await?;

        let owner = row.map(Owner::from).ok_or(RepositoryError::NotFound)?;
        tracing::info!(owner_id = %owner.id, path = %picture.as_str(), "profile picture set");
        Ok(owner)
    }

    /// Delete an owner and, with it, all of their homes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owner doesn't exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OwnerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM meroghar.owner WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        tracing::info!(owner_id = %id, "owner deleted");
        Ok(())
    }

    /// All homes held by an owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn homes(&self, id: OwnerId) -> Result<Vec<Home>, RepositoryError> {
        HomeRepository::new(self.pool).list_for_owner(id).await
    }
}
