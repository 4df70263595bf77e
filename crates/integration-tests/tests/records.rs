//! Store-level tests for addresses, owners and homes.
//!
//! Requires `DATABASE_URL` pointing at a `PostgreSQL` server.
//! Run with: cargo test -p meroghar-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use meroghar_admin::{
    db::{AddressRepository, HomeRepository, OwnerRepository, RepositoryError, UserRepository},
    models::{NewAddress, NewHome, OwnerFields},
};
use meroghar_core::{AddressType, MaritalStatus, OwnershipPercentage};
use meroghar_integration_tests::{address, create_owner, create_user, main_street};
use rust_decimal::Decimal;
use sqlx::PgPool;

// ============================================================================
// Addresses
// ============================================================================

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_address_create_and_render(pool: PgPool) {
    let created = AddressRepository::new(&pool)
        .create(&main_street())
        .await
        .unwrap();

    assert_eq!(created.kind, Some(AddressType::Home));
    assert_eq!(created.to_string(), "1 Main St, Springfield, IL, 62701, USA");

    let loaded = AddressRepository::new(&pool).get(created.id).await.unwrap();
    assert_eq!(loaded, Some(created));
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_address_create_allows_duplicates(pool: PgPool) {
    let addresses = AddressRepository::new(&pool);
    let first = addresses.create(&main_street()).await.unwrap();
    let second = addresses.create(&main_street()).await.unwrap();
    assert_ne!(first.id, second.id);
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_get_or_create_reuses_exact_match(pool: PgPool) {
    let addresses = AddressRepository::new(&pool);

    let (first, created) = addresses.get_or_create(&main_street()).await.unwrap();
    assert!(created);
    let (again, created) = addresses.get_or_create(&main_street()).await.unwrap();
    assert!(!created);
    assert_eq!(first.id, again.id);

    // Any differing field, type included, is a different address
    let (other_city, created) = addresses
        .get_or_create(&address("1 Main St", "Shelbyville", "IL", "62701", "USA"))
        .await
        .unwrap();
    assert!(created);
    assert_ne!(other_city.id, first.id);

    let untyped =
        NewAddress::new("1 Main St", "Springfield", "IL", "62701", "USA", None).unwrap();
    let (null_type, created) = addresses.get_or_create(&untyped).await.unwrap();
    assert!(created);
    assert_eq!(null_type.kind, None);
    let (null_again, created) = addresses.get_or_create(&untyped).await.unwrap();
    assert!(!created);
    assert_eq!(null_again.id, null_type.id);
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_get_or_create_matches_raw_values(pool: PgPool) {
    let addresses = AddressRepository::new(&pool);
    let (plain, _) = addresses.get_or_create(&main_street()).await.unwrap();

    let padded = address(" 1 Main St ", "Springfield", "IL", "62701", "USA");
    let (stored, created) = addresses.get_or_create(&padded).await.unwrap();
    assert!(created);
    assert_ne!(stored.id, plain.id);
    assert_eq!(stored.street_address, " 1 Main St ");

    let loaded = addresses.get(stored.id).await.unwrap().unwrap();
    assert_eq!(loaded.street_address, " 1 Main St ");
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_get_or_create_concurrent_callers_share_one_row(pool: PgPool) {
    let a = AddressRepository::new(&pool);
    let b = AddressRepository::new(&pool);
    let address = main_street();

    let (first, second) = tokio::join!(a.get_or_create(&address), b.get_or_create(&address));
    let (first, first_created) = first.unwrap();
    let (second, second_created) = second.unwrap();

    assert_eq!(first.id, second.id);
    assert!(first_created ^ second_created);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meroghar.address")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_address_validation_happens_before_insert(pool: PgPool) {
    let long_postal = "1".repeat(21);
    let result = NewAddress::new("1 Main St", "Springfield", "IL", &long_postal, "USA", None);
    assert!(result.is_err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meroghar.address")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

// ============================================================================
// Owners
// ============================================================================

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_owner_create_defaults_and_display(pool: PgPool) {
    let user = create_user(&pool, "doe", "jane@example.com", false).await;
    let owner = create_owner(&pool, &user).await;

    assert_eq!(owner.user_id, user.id);
    assert_eq!(owner.marital_status, MaritalStatus::Single);
    assert_eq!(owner.address_id, None);
    assert_eq!(owner.to_string(), "Jane doe");

    let by_user = OwnerRepository::new(&pool)
        .get_by_user(user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_user.id, owner.id);
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_second_owner_for_user_conflicts(pool: PgPool) {
    let user = create_user(&pool, "doe", "jane@example.com", false).await;
    create_owner(&pool, &user).await;

    let fields = OwnerFields::new("555-9999", None);
    let result = OwnerRepository::new(&pool).create(user.id, &fields).await;
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_two_owners_cannot_share_an_address(pool: PgPool) {
    let home_address = AddressRepository::new(&pool)
        .create(&main_street())
        .await
        .unwrap();
    let owners = OwnerRepository::new(&pool);

    let jane = create_user(&pool, "jane", "jane@example.com", false).await;
    let fields = OwnerFields::new("555-1234", None).address(home_address.id);
    owners.create(jane.id, &fields).await.unwrap();

    let john = create_user(&pool, "john", "john@example.com", false).await;
    let result = owners.create(john.id, &fields).await;
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_owner_update(pool: PgPool) {
    let user = create_user(&pool, "doe", "jane@example.com", false).await;
    let owner = create_owner(&pool, &user).await;

    let fields = owner
        .fields()
        .marital_status(MaritalStatus::Married)
        .spouse_name("Sam")
        .occupation("  ");
    let updated = OwnerRepository::new(&pool)
        .update(owner.id, &fields)
        .await
        .unwrap();

    assert_eq!(updated.marital_status, MaritalStatus::Married);
    assert_eq!(updated.spouse_name.as_deref(), Some("Sam"));
    assert_eq!(updated.occupation, None);
    assert!(updated.timestamps.updated_at >= owner.timestamps.updated_at);
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_owner_for_missing_user_is_invalid_reference(pool: PgPool) {
    let fields = OwnerFields::new("555-1234", None);
    let result = OwnerRepository::new(&pool)
        .create(meroghar_core::UserId::new(9999), &fields)
        .await;
    assert!(matches!(result, Err(RepositoryError::InvalidReference(_))));
}

// ============================================================================
// Homes
// ============================================================================

fn new_home(owner: &meroghar_admin::models::Owner, address: NewAddress) -> NewHome {
    NewHome {
        owner_id: owner.id,
        address,
        date_of_purchase: NaiveDate::from_ymd_opt(2020, 6, 15),
        ownership_percentage: "50".parse().unwrap(),
    }
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_home_create_resolves_address(pool: PgPool) {
    let user = create_user(&pool, "doe", "jane@example.com", false).await;
    let owner = create_owner(&pool, &user).await;

    let existing = AddressRepository::new(&pool)
        .create(&main_street())
        .await
        .unwrap();
    let home = HomeRepository::new(&pool)
        .create(&new_home(&owner, main_street()))
        .await
        .unwrap();

    assert_eq!(home.address.id, existing.id);
    assert_eq!(home.ownership_percentage.value(), Decimal::new(5000, 2));
    assert_eq!(home.to_string(), "Home at 1 Main St, Springfield, IL, 62701, USA");
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_second_home_on_same_address_conflicts(pool: PgPool) {
    let jane = create_user(&pool, "doe", "jane@example.com", false).await;
    let jane = create_owner(&pool, &jane).await;
    let sam = create_user(&pool, "roe", "sam@example.com", false).await;
    let sam = create_owner(&pool, &sam).await;
    let homes = HomeRepository::new(&pool);

    let first = homes.create(&new_home(&jane, main_street())).await.unwrap();
    let result = homes.create(&new_home(&sam, main_street())).await;
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    assert!(homes.list_for_owner(sam.id).await.unwrap().is_empty());
    assert_eq!(homes.get(first.id).await.unwrap().unwrap().owner_id, jane.id);

    // The address resolved by the failed attempt was the existing one
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meroghar.address")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_home_defaults_to_full_ownership(pool: PgPool) {
    let user = create_user(&pool, "doe", "jane@example.com", false).await;
    let owner = create_owner(&pool, &user).await;

    let home = HomeRepository::new(&pool)
        .create(&NewHome {
            owner_id: owner.id,
            address: main_street(),
            date_of_purchase: None,
            ownership_percentage: OwnershipPercentage::default(),
        })
        .await
        .unwrap();

    assert_eq!(home.ownership_percentage.to_string(), "100.00");
    assert_eq!(home.date_of_purchase, None);
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_owner_homes_are_listed(pool: PgPool) {
    let user = create_user(&pool, "doe", "jane@example.com", false).await;
    let owner = create_owner(&pool, &user).await;
    let homes = HomeRepository::new(&pool);

    homes
        .create(&new_home(&owner, address("9 Elm St", "Springfield", "IL", "62702", "USA")))
        .await
        .unwrap();
    homes
        .create(&new_home(&owner, address("2 Oak Ave", "Albany", "NY", "12207", "USA")))
        .await
        .unwrap();

    let listed = OwnerRepository::new(&pool).homes(owner.id).await.unwrap();
    let cities: Vec<&str> = listed.iter().map(|h| h.address.city.as_str()).collect();
    assert_eq!(cities, ["Albany", "Springfield"]);
}

// ============================================================================
// Referential actions
// ============================================================================

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_user_delete_cascades_to_owner_and_homes(pool: PgPool) {
    let user = create_user(&pool, "doe", "jane@example.com", false).await;
    let owner = create_owner(&pool, &user).await;
    let home = HomeRepository::new(&pool)
        .create(&new_home(&owner, main_street()))
        .await
        .unwrap();

    UserRepository::new(&pool).delete(user.id).await.unwrap();

    assert!(OwnerRepository::new(&pool).get(owner.id).await.unwrap().is_none());
    assert!(HomeRepository::new(&pool).get(home.id).await.unwrap().is_none());
    // Addresses outlive the records that pointed at them
    assert!(
        AddressRepository::new(&pool)
            .get(home.address.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_address_delete_clears_owner_and_deletes_home(pool: PgPool) {
    let addresses = AddressRepository::new(&pool);
    let residence = addresses.create(&main_street()).await.unwrap();

    let user = create_user(&pool, "doe", "jane@example.com", false).await;
    let owner = OwnerRepository::new(&pool)
        .create(user.id, &OwnerFields::new("555-1234", None).address(residence.id))
        .await
        .unwrap();
    let home = HomeRepository::new(&pool)
        .create(&new_home(&owner, address("9 Elm St", "Springfield", "IL", "62702", "USA")))
        .await
        .unwrap();

    addresses.delete(residence.id).await.unwrap();
    let reloaded = OwnerRepository::new(&pool).get(owner.id).await.unwrap().unwrap();
    assert_eq!(reloaded.address_id, None);

    addresses.delete(home.address.id).await.unwrap();
    assert!(HomeRepository::new(&pool).get(home.id).await.unwrap().is_none());
    assert!(OwnerRepository::new(&pool).get(owner.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_owner_delete_cascades_to_homes_only(pool: PgPool) {
    let user = create_user(&pool, "doe", "jane@example.com", false).await;
    let owner = create_owner(&pool, &user).await;
    let home = HomeRepository::new(&pool)
        .create(&new_home(&owner, main_street()))
        .await
        .unwrap();

    OwnerRepository::new(&pool).delete(owner.id).await.unwrap();

    assert!(HomeRepository::new(&pool).get(home.id).await.unwrap().is_none());
    assert!(UserRepository::new(&pool).get_by_id(user.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_missing_is_not_found(pool: PgPool) {
    let result = AddressRepository::new(&pool)
        .delete(meroghar_core::AddressId::new(42))
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}
