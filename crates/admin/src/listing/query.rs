//! Search and filter SQL for listings.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

use super::{FilterKind, ListingConfig, ListingError};

/// Query string key holding the free-text search.
pub const SEARCH_PARAM: &str = "q";

/// A parsed listing request: free-text search plus filter values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Raw search text.
    pub search: Option<String>,
    /// Filter key to value, sorted by key.
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    /// Split query string parameters into search text and filters. Empty
    /// values are dropped.
    #[must_use]
    pub fn from_params(params: HashMap<String, String>) -> Self {
        let mut query = Self::default();
        for (key, value) in params {
            if value.trim().is_empty() {
                continue;
            }
            if key == SEARCH_PARAM {
                query.search = Some(value);
            } else {
                query.filters.insert(key, value);
            }
        }
        query
    }

    /// Whitespace-separated search terms.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.search.as_deref().unwrap_or_default().split_whitespace()
    }
}

/// Relative date ranges offered by date filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePreset {
    Today,
    Past7Days,
    ThisMonth,
    ThisYear,
    HasDate,
    NoDate,
}

impl DatePreset {
    /// Every preset, in display order.
    pub const ALL: [Self; 6] = [
        Self::Today,
        Self::Past7Days,
        Self::ThisMonth,
        Self::ThisYear,
        Self::HasDate,
        Self::NoDate,
    ];

    /// Query string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Past7Days => "past_7_days",
            Self::ThisMonth => "this_month",
            Self::ThisYear => "this_year",
            Self::HasDate => "has_date",
            Self::NoDate => "no_date",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Past7Days => "Past 7 days",
            Self::ThisMonth => "This month",
            Self::ThisYear => "This year",
            Self::HasDate => "Has date",
            Self::NoDate => "No date",
        }
    }

    /// SQL condition on `expr`, a `DATE` column.
    fn condition(self, expr: &str) -> String {
        match self {
            Self::Today => format!("{expr} = CURRENT_DATE"),
            Self::Past7Days => {
                format!("{expr} >= CURRENT_DATE - 7 AND {expr} <= CURRENT_DATE")
            }
            Self::ThisMonth => format!(
                "{expr} >= date_trunc('month', CURRENT_DATE)::date \
                 AND {expr} < (date_trunc('month', CURRENT_DATE) + INTERVAL '1 month')::date"
            ),
            Self::ThisYear => format!(
                "{expr} >= date_trunc('year', CURRENT_DATE)::date \
                 AND {expr} < (date_trunc('year', CURRENT_DATE) + INTERVAL '1 year')::date"
            ),
            Self::HasDate => format!("{expr} IS NOT NULL"),
            Self::NoDate => format!("{expr} IS NULL"),
        }
    }
}

impl std::str::FromStr for DatePreset {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|p| p.as_str() == s).ok_or(())
    }
}

/// Escape `LIKE` wildcards so a term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl ListingConfig {
    /// Build `SELECT {select} FROM ...` for a listing request.
    ///
    /// Every search term must match at least one search field
    /// (case-insensitive substring); filters narrow the result further.
    ///
    /// # Errors
    ///
    /// Returns `ListingError::UnknownFilter` for a filter key the listing
    /// doesn't declare and `ListingError::InvalidFilterValue` for a value
    /// the filter can't accept.
    pub fn build_query(
        &self,
        select: &str,
        query: &ListQuery,
    ) -> Result<QueryBuilder<'static, Postgres>, ListingError> {
        let mut qb = QueryBuilder::new(format!("SELECT {select} FROM {} WHERE TRUE", self.from));

        if !self.search_fields.is_empty() {
            for term in query.terms() {
                let pattern = format!("%{}%", escape_like(term));
                qb.push(" AND (");
                let mut fields = qb.separated(" OR ");
                for field in &self.search_fields {
                    fields.push(field.expr);
                    fields.push_unseparated(" ILIKE ");
                    fields.push_bind_unseparated(pattern.clone());
                }
                qb.push(")");
            }
        }

        for (key, value) in &query.filters {
            let filter = self
                .find_filter(key)
                .ok_or_else(|| ListingError::UnknownFilter(key.clone()))?;
            let invalid = || ListingError::InvalidFilterValue {
                key: key.clone(),
                value: value.clone(),
            };

            qb.push(" AND ");
            match filter.kind {
                FilterKind::Text => {
                    qb.push(filter.expr).push(" = ").push_bind(value.clone());
                }
                FilterKind::Choice => {
                    if !filter.options.iter().any(|o| &o.value == value) {
                        return Err(invalid());
                    }
                    qb.push(filter.expr).push(" = ").push_bind(value.clone());
                }
                FilterKind::Decimal => {
                    let number: Decimal = value.trim().parse().map_err(|_| invalid())?;
                    qb.push(filter.expr).push(" = ").push_bind(number);
                }
                FilterKind::Date => {
                    let preset: DatePreset = value.parse().map_err(|()| invalid())?;
                    qb.push("(").push(preset.condition(filter.expr)).push(")");
                }
            }
        }

        qb.push(" ORDER BY ");
        let mut order = qb.separated(", ");
        for field in &self.ordering {
            order.push(field.expr);
        }
        order.push(self.pk);

        Ok(qb)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::listing::{FilterOption, TableFilter};

    fn config() -> ListingConfig {
        ListingConfig::new("things", "meroghar.thing t", "t.id")
            .search("name", "t.name")
            .search("city", "t.city")
            .filter(TableFilter::distinct("state", "State", "t.state", FilterKind::Text))
            .filter(TableFilter::choice(
                "status",
                "Status",
                "t.status::text",
                vec![FilterOption::new("Single", "Single")],
            ))
            .filter(TableFilter::distinct("share", "Share", "t.share", FilterKind::Decimal))
            .filter(TableFilter::date("bought", "Bought", "t.bought"))
            .order_by("city", "t.city")
    }

    fn query(search: Option<&str>, filters: &[(&str, &str)]) -> ListQuery {
        ListQuery {
            search: search.map(str::to_owned),
            filters: filters
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }

    #[test]
    fn test_plain_listing_is_ordered() {
        let qb = config().build_query("t.*", &ListQuery::default()).unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT t.* FROM meroghar.thing t WHERE TRUE ORDER BY t.city, t.id"
        );
    }

    #[test]
    fn test_terms_and_combined_fields_or_combined() {
        let qb = config()
            .build_query("t.*", &query(Some("  main   springfield "), &[]))
            .unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT t.* FROM meroghar.thing t WHERE TRUE \
             AND (t.name ILIKE $1 OR t.city ILIKE $2) \
             AND (t.name ILIKE $3 OR t.city ILIKE $4) \
             ORDER BY t.city, t.id"
        );
    }

    #[test]
    fn test_filters_bind_values() {
        let qb = config()
            .build_query(
                "t.*",
                &query(None, &[("share", "100.00"), ("state", "IL"), ("status", "Single")]),
            )
            .unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT t.* FROM meroghar.thing t WHERE TRUE \
             AND t.share = $1 AND t.state = $2 AND t.status::text = $3 \
             ORDER BY t.city, t.id"
        );
    }

    #[test]
    fn test_date_preset_inlines_condition() {
        let qb = config()
            .build_query("t.*", &query(None, &[("bought", "no_date")]))
            .unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT t.* FROM meroghar.thing t WHERE TRUE AND (t.bought IS NULL) \
             ORDER BY t.city, t.id"
        );
    }

    #[test]
    fn test_rejects_unknown_filter() {
        let err = config()
            .build_query("t.*", &query(None, &[("color", "red")]))
            .err();
        assert!(matches!(err, Some(ListingError::UnknownFilter(k)) if k == "color"));
    }

    #[test]
    fn test_rejects_invalid_values() {
        for (key, value) in [("status", "Engaged"), ("share", "lots"), ("bought", "tomorrow")] {
            let err = config().build_query("t.*", &query(None, &[(key, value)])).err();
            assert!(
                matches!(err, Some(ListingError::InvalidFilterValue { .. })),
                "{key}={value} should be rejected"
            );
        }
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_from_params_splits_search() {
        let params = HashMap::from([
            ("q".to_owned(), "smith".to_owned()),
            ("state".to_owned(), "IL".to_owned()),
            ("type".to_owned(), " ".to_owned()),
        ]);
        let query = ListQuery::from_params(params);
        assert_eq!(query.search.as_deref(), Some("smith"));
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters["state"], "IL");
    }

    #[test]
    fn test_date_presets_parse() {
        for preset in DatePreset::ALL {
            assert_eq!(preset.as_str().parse::<DatePreset>(), Ok(preset));
        }
        assert!("yesterday".parse::<DatePreset>().is_err());
    }
}
