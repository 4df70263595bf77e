//! Creation and modification times shared by timestamped records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row timestamps, embedded by value in each timestamped record.
///
/// Both columns default to `NOW()` on insert; `updated_at` is refreshed by a
/// `BEFORE UPDATE` trigger, so callers never set either field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Timestamps {
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}
