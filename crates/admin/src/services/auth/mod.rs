//! Email authentication backend.
//!
//! Accounts log in with their email address rather than their username.
//! Passwords are stored as Argon2id PHC strings.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use meroghar_core::{Email, UserId};

use crate::db::UserRepository;
use crate::models::{NewUser, User};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Resolves login credentials by email lookup.
pub struct EmailAuthBackend<'a> {
    users: UserRepository<'a>,
}

impl<'a> EmailAuthBackend<'a> {
    /// Create a new authentication backend.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Check an email and password.
    ///
    /// Returns `Ok(None)` when the email is malformed, no account has it,
    /// or the password doesn't match.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        let Ok(email) = Email::parse(email) else {
            tracing::debug!("login rejected: malformed email");
            return Ok(None);
        };

        let Some((user, password_hash)) = self.users.get_password_hash(&email).await? else {
            // Hash anyway so an unknown email takes as long as a wrong password
            let _ = hash_password(password);
            tracing::debug!("login rejected: no such account");
            return Ok(None);
        };

        if verify_password(password, &password_hash) {
            tracing::info!(user_id = %user.id, "user authenticated");
            Ok(Some(user))
        } else {
            tracing::warn!(user_id = %user.id, "login rejected: wrong password");
            Ok(None)
        }
    }

    /// Look up the account behind a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn resolve_by_id(&self, id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.get_by_id(id).await?)
    }

    /// Create an account with a password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::Repository` if the username or email is taken.
    pub async fn create_user(&self, new_user: &NewUser, password: &str) -> Result<User, AuthError> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;
        Ok(self.users.create(new_user, &password_hash).await?)
    }

    /// Replace an account's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::Repository` if the account doesn't exist.
    pub async fn set_password(&self, id: UserId, password: &str) -> Result<(), AuthError> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;
        self.users.set_password(id, &password_hash).await?;
        tracing::info!(user_id = %id, "password changed");
        Ok(())
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC string. A malformed hash never
/// verifies.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
