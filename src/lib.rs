//! # Callboard
//!
//! The query pipeline behind a call-center dashboard's list pages.
//!
//! ## Features
//!
//! - **Predicate Compiler**: Search text and filter selections become one record test
//! - **Comparator Selector**: Sort keys resolve to text, number or date comparators
//! - **Pipeline Executor**: Filter then stable-sort, memoised per query and source
//! - **Selection Tracker**: Multi-select with select-all over the visible rows
//! - **Configuration-Based**: Define dashboard views via YAML configuration
//! - **Type-Safe**: Record declarations are checked at compile time by `impl_record!`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use callboard::prelude::*;
//!
//! let customers: Vec<Customer> = load_customers();
//!
//! let mut view = QueryView::new(customers).with_query(
//!     QueryState::new()
//!         .with_search("acme")
//!         .with_filter("status", "active")
//!         .with_sort("lastContact"),
//! );
//!
//! for customer in view.visible() {
//!     println!("{}", customer.name);
//! }
//!
//! view.toggle_all();
//! dispatch_bulk(&mut view, &TracingNotifier, "call", |records| async move {
//!     dialer.start(records).await
//! })
//! .await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod records;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        notify::NotificationSink, record::Record, source::SourceProvider, field::ToFieldValue,
    };

    // === Pipeline ===
    pub use crate::core::{
        comparator::{Comparator, SortKey, collate, select_comparator},
        pipeline::{QueryView, run_paginated, run_query, run_query_owned},
        predicate::{FilterOp, Predicate, compile_predicate},
        selection::{SelectionState, SelectionTracker},
    };

    // === Query Types ===
    pub use crate::core::{
        field::{FieldKind, FieldValue, SortDirection, SortField},
        query::{ALL, Filters, PaginatedResponse, PaginationMeta, QueryParams, QueryState},
    };

    // === Sources & Actions ===
    pub use crate::core::{
        bulk::dispatch_bulk,
        notify::{CollectingNotifier, NotificationKind, TracingNotifier},
        source::{CombinedSource, reload_view},
    };

    // === Errors ===
    pub use crate::core::error::{
        CallboardError, ConfigError, ErrorResponse, RequestError, SourceError,
    };

    // === Macros ===
    pub use crate::impl_record;

    // === Records ===
    pub use crate::records::{Article, CallRecord, Customer, Recording};

    // === Storage ===
    pub use crate::storage::InMemorySource;

    // === Config ===
    pub use crate::config::{PipelineConfig, ViewConfig};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
}
