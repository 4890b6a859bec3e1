//! Source provider trait and source combinators

use crate::core::error::SourceError;
use crate::core::pipeline::QueryView;
use crate::core::record::Record;
use anyhow::Result;
use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;

/// Supplies the raw, unfiltered collection a query runs over
///
/// Implementations may hold records in memory or fetch them from a remote
/// API. The pipeline does not care which.
#[async_trait]
pub trait SourceProvider<R: Record>: Send + Sync {
    /// Fetch the whole collection, in source order
    async fn fetch_collection(&self) -> Result<Vec<R>>;
}

#[async_trait]
impl<R: Record> SourceProvider<R> for Vec<R> {
    async fn fetch_collection(&self) -> Result<Vec<R>> {
        Ok(self.clone())
    }
}

/// Several providers fetched concurrently and concatenated in order
///
/// Any failing provider fails the whole fetch; partial results are never
/// returned.
pub struct CombinedSource<R: Record> {
    providers: Vec<Arc<dyn SourceProvider<R>>>,
}

impl<R: Record> CombinedSource<R> {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn SourceProvider<R>>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl<R: Record> Default for CombinedSource<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> SourceProvider<R> for CombinedSource<R> {
    async fn fetch_collection(&self) -> Result<Vec<R>> {
        let batches = try_join_all(
            self.providers
                .iter()
                .map(|provider| provider.fetch_collection()),
        )
        .await?;
        Ok(batches.into_iter().flatten().collect())
    }
}

/// Reload a view from a provider
///
/// On failure the view keeps its last-known-good collection. Returns
/// whether the fetched collection was applied.
pub async fn reload_view<R: Record>(
    view: &mut QueryView<R>,
    provider: &dyn SourceProvider<R>,
) -> std::result::Result<bool, SourceError> {
    let ticket = view.begin_fetch();
    let records = provider
        .fetch_collection()
        .await
        .map_err(|e| SourceError::FetchFailed {
            record_type: R::record_type().to_string(),
            message: e.to_string(),
        })?;
    Ok(view.apply_fetched(ticket, records))
}
