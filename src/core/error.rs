//! Typed error handling for callboard
//!
//! The query pipeline itself (predicate, comparator, executor, selection)
//! is total and never fails. Errors only arise at the edges: loading
//! configuration, decoding query parameters, and talking to source
//! collaborators.
//!
//! # Error Categories
//!
//! - [`ConfigError`]: Errors related to configuration parsing and validation
//! - [`RequestError`]: Errors related to decoding query parameters
//! - [`SourceError`]: Errors related to source providers and bulk actions
//!
//! # Example
//!
//! ```rust,ignore
//! use callboard::prelude::*;
//!
//! match params.to_query_state() {
//!     Ok(state) => run_query(&customers, &state),
//!     Err(RequestError::InvalidFilter { message }) => {
//!         eprintln!("bad filter: {}", message);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use serde::Serialize;
use std::fmt;

/// The main error type for callboard
#[derive(Debug)]
pub enum CallboardError {
    /// Configuration errors
    Config(ConfigError),

    /// Query parameter errors
    Request(RequestError),

    /// Source provider and bulk action errors
    Source(SourceError),
}

impl fmt::Display for CallboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallboardError::Config(e) => write!(f, "{}", e),
            CallboardError::Request(e) => write!(f, "{}", e),
            CallboardError::Source(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CallboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CallboardError::Config(e) => Some(e),
            CallboardError::Request(e) => Some(e),
            CallboardError::Source(e) => Some(e),
        }
    }
}

/// Serializable error payload handed to the UI layer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CallboardError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CallboardError::Config(_) => "CONFIG_ERROR",
            CallboardError::Request(e) => e.error_code(),
            CallboardError::Source(e) => e.error_code(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            CallboardError::Request(RequestError::InvalidSort { sort, .. }) => {
                Some(serde_json::json!({ "sort": sort }))
            }
            CallboardError::Source(SourceError::BulkActionFailed {
                action, record_ids, ..
            }) => Some(serde_json::json!({
                "action": action,
                "record_ids": record_ids
            })),
            _ => None,
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for CallboardError {
    fn from(err: ConfigError) -> Self {
        CallboardError::Config(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to decoding query parameters
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// Filter parameter is not a JSON object of scalar values
    InvalidFilter { message: String },

    /// Sort parameter is not `field`, `field:asc` or `field:desc`
    InvalidSort { sort: String, message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidFilter { message } => {
                write!(f, "Invalid filter: {}", message)
            }
            RequestError::InvalidSort { sort, message } => {
                write!(f, "Invalid sort '{}': {}", sort, message)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidFilter { .. } => "INVALID_FILTER",
            RequestError::InvalidSort { .. } => "INVALID_SORT",
        }
    }
}

impl From<RequestError> for CallboardError {
    fn from(err: RequestError) -> Self {
        CallboardError::Request(err)
    }
}

// =============================================================================
// Source Errors
// =============================================================================

/// Errors related to source providers and bulk actions
#[derive(Debug)]
pub enum SourceError {
    /// Fetching a collection failed
    FetchFailed {
        record_type: String,
        message: String,
    },

    /// A bulk action over selected records failed
    BulkActionFailed {
        action: String,
        record_ids: Vec<String>,
        message: String,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::FetchFailed {
                record_type,
                message,
            } => {
                write!(f, "Failed to fetch {} collection: {}", record_type, message)
            }
            SourceError::BulkActionFailed {
                action,
                record_ids,
                message,
            } => {
                write!(
                    f,
                    "Bulk action '{}' on {} record(s) failed: {}",
                    action,
                    record_ids.len(),
                    message
                )
            }
        }
    }
}

impl std::error::Error for SourceError {}

impl SourceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SourceError::FetchFailed { .. } => "SOURCE_FETCH_FAILED",
            SourceError::BulkActionFailed { .. } => "BULK_ACTION_FAILED",
        }
    }
}

impl From<SourceError> for CallboardError {
    fn from(err: SourceError) -> Self {
        CallboardError::Source(err)
    }
}
