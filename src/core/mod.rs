//! Core module containing the query pipeline and its building blocks

pub mod bulk;
pub mod comparator;
pub mod error;
pub mod field;
pub mod notify;
pub mod pipeline;
pub mod predicate;
pub mod query;
pub mod record;
pub mod selection;
pub mod source;

pub use bulk::dispatch_bulk;
pub use comparator::{Comparator, SortKey, collate, select_comparator, select_comparator_in};
pub use error::{CallboardError, ConfigError, ErrorResponse, RequestError, SourceError};
pub use field::{FieldKind, FieldValue, SortDirection, SortField, ToFieldValue, parse_instant};
pub use notify::{CollectingNotifier, NotificationKind, NotificationSink, TracingNotifier};
pub use pipeline::{QueryView, query_indices, run_paginated, run_query, run_query_owned};
pub use predicate::{FilterOp, Predicate, compile_predicate, parse_filter_key};
pub use query::{ALL, Filters, PaginatedResponse, PaginationMeta, QueryParams, QueryState};
pub use record::Record;
pub use selection::{SelectionState, SelectionTracker};
pub use source::{CombinedSource, SourceProvider, reload_view};
