//! Query state, query parameters and pagination utilities

use crate::core::error::RequestError;
use crate::core::field::SortDirection;
use crate::core::record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter sentinel meaning "no constraint on this field"
pub const ALL: &str = "all";

/// Selected filter values keyed by filter name
///
/// A key is a field name, optionally suffixed with a comparison operator
/// (`totalCalls>`, `date<=`, `status!=`). Entries are AND-combined, so
/// insertion order has no effect on the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(IndexMap<String, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selected value for a filter, replacing any previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Drop a filter entirely
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Entries that actually constrain the result (value is not `"all"`)
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(_, value)| value.as_str() != ALL)
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// The complete input of one pipeline invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryState {
    /// Free-text search, trimmed and compared case-insensitively
    pub search_text: String,

    /// Categorical and comparison filters
    pub filters: Filters,

    /// Sort key; must name a declared sortable field to have an effect
    pub sort_key: Option<String>,

    /// Explicit direction; `None` uses the sort field's declared default
    pub sort_direction: Option<SortDirection>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search_text: impl Into<String>) -> Self {
        self.search_text = search_text.into();
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key, value);
        self
    }

    pub fn with_sort(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.sort_direction = Some(direction);
        self
    }

    /// Direction actually applied for record type `R`
    ///
    /// Explicit direction wins, then the sort field's declared default,
    /// then ascending.
    pub fn resolved_direction<R: Record>(&self) -> SortDirection {
        self.sort_direction.unwrap_or_else(|| {
            self.sort_key
                .as_deref()
                .and_then(R::sort_field)
                .map(|field| field.default_direction)
                .unwrap_or_default()
        })
    }
}

/// Query parameters for search, filtering, sorting and pagination
///
/// This structure is decoded from a URL query string. All parameters have
/// sensible defaults.
///
/// # Example
/// ```text
/// ?page=2&limit=10
/// ?search=acme&filter={"status": "active"}
/// ?page=1&limit=20&filter={"totalCalls>": 100}&sort=lastContact:desc
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Free-text search
    pub search: Option<String>,

    /// Filters as JSON object
    ///
    /// # Format
    /// - Exact match: `{"field": "value"}`
    /// - Comparison: `{"field>": value, "field<": value, "field>=": value, "field<=": value}`
    /// - No constraint: `{"field": "all"}`
    pub filter: Option<String>,

    /// Sort field and direction
    ///
    /// # Format
    /// - `field` (field's default direction)
    /// - `field:asc`
    /// - `field:desc`
    pub sort: Option<String>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: None,
            filter: None,
            sort: None,
        }
    }
}

const DEFAULT_PAGE: usize = 1;
const DEFAULT_LIMIT: usize = 20;

/// Upper bound on page size unless configured otherwise
pub const DEFAULT_MAX_LIMIT: usize = 100;

impl QueryParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, ensuring it doesn't exceed the maximum
    pub fn limit(&self) -> usize {
        self.limit_within(DEFAULT_MAX_LIMIT)
    }

    /// Get limit clamped to `1..=max_limit`
    pub fn limit_within(&self, max_limit: usize) -> usize {
        self.limit.clamp(1, max_limit.max(1))
    }

    /// Parse filter JSON string into Value
    pub fn filter_value(&self) -> Result<Option<Value>, RequestError> {
        self.filter
            .as_deref()
            .map(|raw| {
                serde_json::from_str(raw).map_err(|e| RequestError::InvalidFilter {
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    /// Decode the parameters into a [`QueryState`]
    pub fn to_query_state(&self) -> Result<QueryState, RequestError> {
        let mut state = QueryState::new().with_search(self.search.clone().unwrap_or_default());

        if let Some(filter) = self.filter_value()? {
            let Value::Object(entries) = filter else {
                return Err(RequestError::InvalidFilter {
                    message: "expected a JSON object".to_string(),
                });
            };
            for (key, value) in entries {
                let value = match value {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => continue,
                    Value::Array(_) | Value::Object(_) => {
                        return Err(RequestError::InvalidFilter {
                            message: format!("value for '{}' must be a scalar", key),
                        });
                    }
                };
                state.filters.insert(key, value);
            }
        }

        if let Some(sort) = self.sort.as_deref() {
            let (key, direction) = parse_sort(sort)?;
            state.sort_key = Some(key);
            state.sort_direction = direction;
        }

        Ok(state)
    }
}

fn parse_sort(sort: &str) -> Result<(String, Option<SortDirection>), RequestError> {
    let (key, direction) = match sort.split_once(':') {
        Some((key, direction)) => {
            let direction = direction
                .parse::<SortDirection>()
                .map_err(|message| RequestError::InvalidSort {
                    sort: sort.to_string(),
                    message,
                })?;
            (key, Some(direction))
        }
        None => (sort, None),
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(RequestError::InvalidSort {
            sort: sort.to_string(),
            message: "missing sort field".to_string(),
        });
    }
    Ok((key.to_string(), direction))
}

/// Paginated response structure
///
/// This structure wraps paginated data with metadata about pagination state.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }

    /// Index range of the current page within the full result
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = (self.page - 1).saturating_mul(self.limit).min(self.total);
        let end = start.saturating_add(self.limit).min(self.total);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_defaults() {
        let params = QueryParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 20);
    }

    #[test]
    fn test_query_params_limit_clamped() {
        let params = QueryParams {
            limit: 500,
            ..QueryParams::default()
        };
        assert_eq!(params.limit(), 100);
        assert_eq!(params.limit_within(50), 50);

        let params = QueryParams {
            limit: 0,
            page: 0,
            ..QueryParams::default()
        };
        assert_eq!(params.limit(), 1);
        assert_eq!(params.page(), 1);
    }

    #[test]
    fn test_to_query_state() {
        let params = QueryParams {
            search: Some("acme".to_string()),
            filter: Some(r#"{"status": "active", "totalCalls>": 5, "tier": null}"#.to_string()),
            sort: Some("lastContact:desc".to_string()),
            ..QueryParams::default()
        };

        let state = params.to_query_state().unwrap();
        assert_eq!(state.search_text, "acme");
        assert_eq!(state.filters.get("status"), Some("active"));
        assert_eq!(state.filters.get("totalCalls>"), Some("5"));
        assert_eq!(state.filters.get("tier"), None);
        assert_eq!(state.sort_key.as_deref(), Some("lastContact"));
        assert_eq!(state.sort_direction, Some(SortDirection::Descending));
    }

    #[test]
    fn test_sort_without_direction_keeps_default() {
        let params = QueryParams {
            sort: Some("name".to_string()),
            ..QueryParams::default()
        };
        let state = params.to_query_state().unwrap();
        assert_eq!(state.sort_key.as_deref(), Some("name"));
        assert_eq!(state.sort_direction, None);
    }

    #[test]
    fn test_invalid_filter_json() {
        let params = QueryParams {
            filter: Some("{not json".to_string()),
            ..QueryParams::default()
        };
        assert!(matches!(
            params.to_query_state(),
            Err(RequestError::InvalidFilter { .. })
        ));

        let params = QueryParams {
            filter: Some(r#"["status"]"#.to_string()),
            ..QueryParams::default()
        };
        assert!(matches!(
            params.to_query_state(),
            Err(RequestError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_invalid_sort() {
        let params = QueryParams {
            sort: Some("name:sideways".to_string()),
            ..QueryParams::default()
        };
        assert!(matches!(
            params.to_query_state(),
            Err(RequestError::InvalidSort { .. })
        ));

        let params = QueryParams {
            sort: Some(":desc".to_string()),
            ..QueryParams::default()
        };
        assert!(params.to_query_state().is_err());
    }

    #[test]
    fn test_filters_active_skips_all() {
        let filters: Filters = [("status", "all"), ("tier", "gold")].into_iter().collect();
        let active: Vec<_> = filters.active().collect();
        assert_eq!(active, vec![("tier", "gold")]);
        assert_eq!(filters.len(), 2);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);
        assert_eq!(meta.range(), 0..20);

        let last = PaginationMeta::new(8, 20, 145);
        assert!(!last.has_next);
        assert_eq!(last.range(), 140..145);

        let beyond = PaginationMeta::new(10, 20, 145);
        assert_eq!(beyond.range(), 145..145);
    }

    #[test]
    fn test_pagination_meta_huge_page_is_empty() {
        let meta = PaginationMeta::new(usize::MAX, 20, 145);
        assert_eq!(meta.range(), 145..145);
        assert!(!meta.has_next);
        assert!(meta.has_prev);

        let wide = PaginationMeta::new(2, usize::MAX, 145);
        assert_eq!(wide.range(), 145..145);
    }
}
