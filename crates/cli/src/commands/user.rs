//! User account commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a staff account that can sign in to the admin surface
//! mg-cli user create -u jane -e jane@example.com -p 'correct horse' --first Jane --last Doe --staff
//!
//! # Reset a password
//! mg-cli user set-password -e jane@example.com -p 'battery staple'
//!
//! # Delete an account (and its owner profile and homes)
//! mg-cli user delete -e jane@example.com
//! ```

use meroghar_admin::db::{RepositoryError, UserRepository};
use meroghar_admin::models::NewUser;
use meroghar_admin::services::EmailAuthBackend;
use meroghar_core::{Email, UserId};

use super::{CommandError, connect};

/// Create a user account with a password.
///
/// # Returns
///
/// The ID of the created user.
pub async fn create(
    username: &str,
    email: &str,
    password: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
    is_staff: bool,
) -> Result<UserId, CommandError> {
    let email = Email::parse(email)?;
    let new_user = NewUser::new(username, email, first_name, last_name, is_staff)?;

    let pool = connect().await?;
    let user = EmailAuthBackend::new(&pool)
        .create_user(&new_user, password)
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Staff: {}",
        user.id,
        user.email,
        user.is_staff
    );
    Ok(user.id)
}

/// Replace the password of the account with this email.
pub async fn set_password(email: &str, password: &str) -> Result<(), CommandError> {
    let email = Email::parse(email)?;
    let pool = connect().await?;

    let user = UserRepository::new(&pool)
        .get_by_email(&email)
        .await?
        .ok_or(RepositoryError::NotFound)?;
    EmailAuthBackend::new(&pool)
        .set_password(user.id, password)
        .await?;

    tracing::info!("Password updated for {}", user.email);
    Ok(())
}

/// Delete the account with this email.
pub async fn delete(email: &str) -> Result<(), CommandError> {
    let email = Email::parse(email)?;
    let pool = connect().await?;

    let users = UserRepository::new(&pool);
    let user = users
        .get_by_email(&email)
        .await?
        .ok_or(RepositoryError::NotFound)?;
    users.delete(user.id).await?;

    tracing::info!("Deleted user {} ({})", user.id, user.email);
    Ok(())
}
