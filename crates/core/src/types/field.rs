//! Field-level validation shared by every record store.
//!
//! Values are checked against their column limits before any query runs,
//! so an overlong street name is a [`FieldError`] rather than a database
//! error.

use thiserror::Error;

/// A field violates its type, length, or required constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required {
        /// Column name.
        field: &'static str,
    },

    /// A text field exceeds its column length.
    #[error("{field} must be at most {max} characters (got {len})")]
    TooLong {
        /// Column name.
        field: &'static str,
        /// Column limit in characters.
        max: usize,
        /// Length of the rejected value.
        len: usize,
    },

    /// An enumerated field got a value outside its choices.
    #[error("{value:?} is not a valid choice for {field}")]
    InvalidChoice {
        /// Column name.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A decimal field is out of range or has too many digits.
    #[error("{field}: {reason}")]
    InvalidDecimal {
        /// Column name.
        field: &'static str,
        /// What was wrong with the value.
        reason: String,
    },
}

/// Validate a required text field: rejects whitespace-only values and
/// values longer than `max` characters. The value is kept as given.
///
/// # Errors
///
/// Returns [`FieldError::Required`] or [`FieldError::TooLong`].
pub fn bounded_text(field: &'static str, value: &str, max: usize) -> Result<String, FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required { field });
    }
    check_len(field, value, max)?;
    Ok(value.to_owned())
}

/// Validate an optional text field. Whitespace-only input collapses to
/// `None`; anything else is kept as given.
///
/// # Errors
///
/// Returns [`FieldError::TooLong`] when the value exceeds `max`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, FieldError> {
    match value {
        Some(v) if !v.trim().is_empty() => {
            check_len(field, v, max)?;
            Ok(Some(v.to_owned()))
        }
        _ => Ok(None),
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    let len = value.chars().count();
    if len > max {
        return Err(FieldError::TooLong { field, max, len });
    }
    Ok(())
}
