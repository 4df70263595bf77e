//! Declarative admin listings.
//!
//! Each entity declares a [`ListingConfig`]: the columns it displays, the
//! fields free-text search looks in, the filters it offers and its fixed
//! ordering. [`ListingConfig::build_query`] turns a [`ListQuery`] into SQL
//! against that configuration; rendering is left to the client, which can
//! fetch the configuration itself as JSON.

pub mod addresses;
pub mod homes;
pub mod owners;
mod query;

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

pub use query::{DatePreset, ListQuery};

/// Errors from running a listing query.
#[derive(Debug, Error)]
pub enum ListingError {
    /// The query string names a filter the listing doesn't offer.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// A filter value is not one of the filter's accepted values.
    #[error("invalid value {value:?} for filter {key}")]
    InvalidFilterValue {
        /// Filter key.
        key: String,
        /// The rejected value.
        value: String,
    },

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One page of listing results.
#[derive(Debug, Clone, Serialize)]
pub struct Listing<T> {
    /// Number of matching records.
    pub count: usize,
    /// Matching records in listing order.
    pub results: Vec<T>,
}

impl<T> From<Vec<T>> for Listing<T> {
    fn from(results: Vec<T>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}

/// Column definition for a listing.
#[derive(Debug, Clone, Serialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
}

impl TableColumn {
    /// Create a new column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// A named SQL expression that search or ordering works on.
#[derive(Debug, Clone, Serialize)]
pub struct SqlField {
    /// Public name, e.g. `owner__last_name`.
    pub key: &'static str,
    /// Qualified column expression, e.g. `u.last_name`.
    #[serde(skip)]
    pub expr: &'static str,
}

/// How a filter value is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Exact match on a text column.
    Text,
    /// Exact match against a fixed set of choices.
    Choice,
    /// Exact match on a decimal column.
    Decimal,
    /// One of the [`DatePreset`] ranges.
    Date,
}

/// Where a filter's options come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSource {
    /// Declared with the filter.
    Fixed,
    /// Distinct non-null values currently in the column.
    Distinct,
}

/// Option for a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    /// Option value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Filter definition for a listing.
#[derive(Debug, Clone, Serialize)]
pub struct TableFilter {
    /// Filter parameter key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Matching behavior.
    pub kind: FilterKind,
    /// Available options.
    pub options: Vec<FilterOption>,
    #[serde(skip)]
    expr: &'static str,
    #[serde(skip)]
    source: OptionSource,
}

impl TableFilter {
    /// Filter on a fixed set of choices, e.g. an enum column read as text.
    #[must_use]
    pub fn choice(key: &str, label: &str, expr: &'static str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: FilterKind::Choice,
            options,
            expr,
            source: OptionSource::Fixed,
        }
    }

    /// Exact-match filter whose options are the column's distinct values.
    #[must_use]
    pub fn distinct(key: &str, label: &str, expr: &'static str, kind: FilterKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            options: vec![],
            expr,
            source: OptionSource::Distinct,
        }
    }

    /// Date filter offering the [`DatePreset`] ranges.
    #[must_use]
    pub fn date(key: &str, label: &str, expr: &'static str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: FilterKind::Date,
            options: DatePreset::ALL
                .iter()
                .map(|p| FilterOption::new(p.as_str(), p.label()))
                .collect(),
            expr,
            source: OptionSource::Fixed,
        }
    }

    /// Column expression the filter compares against.
    #[must_use]
    pub const fn expr(&self) -> &'static str {
        self.expr
    }
}

/// Configuration for an entity listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListingConfig {
    /// Unique listing identifier.
    pub entity: &'static str,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Fields free-text search looks in.
    pub search_fields: Vec<SqlField>,
    /// Filter definitions.
    pub filters: Vec<TableFilter>,
    /// Fixed sort order.
    pub ordering: Vec<SqlField>,
    /// Search placeholder text.
    pub search_placeholder: String,
    /// `FROM` clause, with any joins search and ordering need.
    #[serde(skip)]
    from: &'static str,
    /// Primary key expression, the final tie-break of the ordering.
    #[serde(skip)]
    pk: &'static str,
}

impl ListingConfig {
    /// Create a listing over `from`, keyed by `pk`.
    #[must_use]
    pub fn new(entity: &'static str, from: &'static str, pk: &'static str) -> Self {
        Self {
            entity,
            columns: vec![],
            search_fields: vec![],
            filters: vec![],
            ordering: vec![],
            search_placeholder: "Search...".to_string(),
            from,
            pk,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a search field.
    #[must_use]
    pub fn search(mut self, key: &'static str, expr: &'static str) -> Self {
        self.search_fields.push(SqlField { key, expr });
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append to the sort order.
    #[must_use]
    pub fn order_by(mut self, key: &'static str, expr: &'static str) -> Self {
        self.ordering.push(SqlField { key, expr });
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = placeholder.to_string();
        self
    }

    /// Look up a filter by key.
    #[must_use]
    pub fn find_filter(&self, key: &str) -> Option<&TableFilter> {
        self.filters.iter().find(|f| f.key == key)
    }

    /// Fill in the options of every [`OptionSource::Distinct`] filter from
    /// the values currently stored.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if a query fails.
    pub async fn load_options(mut self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        for filter in &mut self.filters {
            if filter.source != OptionSource::Distinct {
                continue;
            }
            let values: Vec<String> = sqlx::query_scalar(&format!(
                "SELECT DISTINCT {expr}::text FROM {from} WHERE {expr} IS NOT NULL ORDER BY 1",
                expr = filter.expr,
                from = self.from,
            ))
            .fetch_all(pool)
            .await?;

            filter.options = values
                .iter()
                .map(|v| FilterOption::new(v, v))
                .collect();
        }
        Ok(self)
    }
}
