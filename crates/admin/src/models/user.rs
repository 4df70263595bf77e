//! User account domain types.

use serde::Serialize;

use meroghar_core::{Email, FieldError, UserId, bounded_text, optional_text};

use super::Timestamps;

/// Column limits for user accounts.
pub mod limits {
    pub const USERNAME: usize = 150;
    pub const NAME: usize = 150;
}

/// A user account. The password hash is never loaded into this type.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    /// Whether the account may use the admin surface.
    pub is_staff: bool,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl User {
    /// "First Last", trimmed when either part is blank.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// Input for creating a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

impl NewUser {
    /// Validate and normalize the account fields.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the username is blank or a field is
    /// longer than its column.
    pub fn new(
        username: &str,
        email: Email,
        first_name: Option<&str>,
        last_name: Option<&str>,
        is_staff: bool,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            username: bounded_text("username", username, limits::USERNAME)?,
            email,
            first_name: optional_text("first_name", first_name, limits::NAME)?.unwrap_or_default(),
            last_name: optional_text("last_name", last_name, limits::NAME)?.unwrap_or_default(),
            is_staff,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults_blank_names() {
        let email = Email::parse("a@b.com").unwrap();
        let user = NewUser::new("ab", email, None, Some("  "), false).unwrap();
        assert_eq!(user.first_name, "");
        assert_eq!(user.last_name, "");
    }

    #[test]
    fn test_new_user_requires_username() {
        let email = Email::parse("a@b.com").unwrap();
        assert!(matches!(
            NewUser::new(" ", email, None, None, false),
            Err(FieldError::Required { field: "username" })
        ));
    }
}
