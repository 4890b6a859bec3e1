//! Configuration loading and management
//!
//! Views describe how a dashboard page opens: which record type it lists,
//! its initial sort and filters, and its page size.
//!
//! ```yaml
//! max_page_size: 100
//! views:
//!   - name: customers
//!     record_type: customer
//!     default_sort: lastContact
//!     page_size: 25
//!     filters:
//!       status: active
//! ```

use crate::core::error::ConfigError;
use crate::core::field::{FieldKind, SortDirection};
use crate::core::pipeline::QueryView;
use crate::core::predicate::{FilterOp, parse_filter_key};
use crate::core::query::{DEFAULT_MAX_LIMIT, QueryState};
use crate::core::record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn default_page_size() -> usize {
    20
}

fn default_max_page_size() -> usize {
    DEFAULT_MAX_LIMIT
}

/// Configuration for one dashboard view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// View name (e.g., "customers", "recordings")
    pub name: String,

    /// Record type listed by the view (e.g., "customer")
    pub record_type: String,

    /// Initial sort key
    #[serde(default)]
    pub default_sort: Option<String>,

    /// Initial sort direction; unset uses the sort field's default
    #[serde(default)]
    pub default_direction: Option<SortDirection>,

    /// Records per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Initial filter selections
    #[serde(default)]
    pub filters: IndexMap<String, String>,
}

impl ViewConfig {
    /// Query state the view starts with
    pub fn initial_query(&self) -> QueryState {
        QueryState {
            search_text: String::new(),
            filters: self.filters.clone().into_iter().collect(),
            sort_key: self.default_sort.clone(),
            sort_direction: self.default_direction,
        }
    }

    /// Check the view against the declarations of record type `R`
    pub fn check_record<R: Record>(&self) -> Result<(), ConfigError> {
        if self.record_type != R::record_type() {
            return Err(ConfigError::InvalidValue {
                field: format!("views.{}.record_type", self.name),
                value: self.record_type.clone(),
                message: format!("view lists '{}' records", R::record_type()),
            });
        }

        if let Some(sort) = &self.default_sort
            && R::sort_field(sort).is_none()
        {
            return Err(ConfigError::InvalidValue {
                field: format!("views.{}.default_sort", self.name),
                value: sort.clone(),
                message: format!("'{}' is not a sortable {} field", sort, R::record_type()),
            });
        }

        for key in self.filters.keys() {
            let (field, op) = parse_filter_key(key);
            let declared = match op {
                FilterOp::Eq | FilterOp::Ne => R::is_filterable(field),
                _ => R::sort_field(field)
                    .is_some_and(|f| matches!(f.kind, FieldKind::Number | FieldKind::Date)),
            };
            if !declared {
                return Err(ConfigError::InvalidValue {
                    field: format!("views.{}.filters", self.name),
                    value: key.clone(),
                    message: format!("'{}' is not a filterable {} field", field, R::record_type()),
                });
            }
        }

        Ok(())
    }

    /// Open a live view over `source` with this view's initial query
    pub fn open<R: Record>(
        &self,
        source: impl Into<Arc<[R]>>,
    ) -> Result<QueryView<R>, ConfigError> {
        self.check_record::<R>()?;
        Ok(QueryView::new(source).with_query(self.initial_query()))
    }
}

/// Complete configuration for the query pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound for any requested page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// List of view configurations
    #[serde(default)]
    pub views: Vec<ViewConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_page_size: default_max_page_size(),
            views: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        Self::parse(&content, Some(path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, None)
    }

    fn parse(yaml: &str, file: Option<&str>) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: file.map(str::to_string),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check sizes are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_page_size".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        for view in &self.views {
            if view.page_size == 0 || view.page_size > self.max_page_size {
                return Err(ConfigError::InvalidValue {
                    field: format!("views.{}.page_size", view.name),
                    value: view.page_size.to_string(),
                    message: format!("must be between 1 and {}", self.max_page_size),
                });
            }
        }

        Ok(())
    }

    /// Merge several configurations
    ///
    /// Views are keyed by name: a later view replaces an earlier one with
    /// the same name, keeping the earlier position. The last non-default
    /// `max_page_size` wins.
    pub fn merge(configs: Vec<PipelineConfig>) -> Self {
        let mut views: IndexMap<String, ViewConfig> = IndexMap::new();
        let mut max_page_size = default_max_page_size();

        for config in configs {
            if config.max_page_size != default_max_page_size() {
                max_page_size = config.max_page_size;
            }
            for view in config.views {
                views.insert(view.name.clone(), view);
            }
        }

        Self {
            max_page_size,
            views: views.into_values().collect(),
        }
    }

    /// Find a view by name
    pub fn view(&self, name: &str) -> Option<&ViewConfig> {
        self.views.iter().find(|view| view.name == name)
    }

    /// Clamp a requested page size to `1..=max_page_size`
    pub fn clamp_limit(&self, limit: usize) -> usize {
        limit.clamp(1, self.max_page_size.max(1))
    }

    /// The dashboard's standard views
    pub fn default_config() -> Self {
        let view = |name: &str, record_type: &str, sort: &str| ViewConfig {
            name: name.to_string(),
            record_type: record_type.to_string(),
            default_sort: Some(sort.to_string()),
            default_direction: None,
            page_size: default_page_size(),
            filters: IndexMap::new(),
        };

        Self {
            max_page_size: default_max_page_size(),
            views: vec![
                view("customers", "customer", "lastContact"),
                view("calls", "call", "date"),
                view("recordings", "recording", "date"),
                view("articles", "article", "updatedAt"),
            ],
        }
    }
}
