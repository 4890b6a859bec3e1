//! Pipeline executor: filter, then stable sort, then optionally paginate

use crate::core::comparator::select_comparator;
use crate::core::field::SortDirection;
use crate::core::predicate::compile_predicate;
use crate::core::query::{PaginatedResponse, PaginationMeta, QueryState};
use crate::core::record::Record;
use crate::core::selection::{SelectionState, SelectionTracker};
use indexmap::IndexSet;
use std::sync::Arc;

/// Run a query over a source collection
///
/// Records failing the predicate are dropped, keeping source order; the
/// rest are stably sorted by the query's sort key. The source is never
/// mutated, and identical inputs always produce the identical list.
pub fn run_query<'a, R: Record>(source: &'a [R], state: &QueryState) -> Vec<&'a R> {
    query_indices(source, state)
        .into_iter()
        .map(|index| &source[index])
        .collect()
}

/// Same as [`run_query`], cloning the resulting records
pub fn run_query_owned<R: Record>(source: &[R], state: &QueryState) -> Vec<R> {
    run_query(source, state).into_iter().cloned().collect()
}

/// Run a query and cut one page out of the result
pub fn run_paginated<R: Record>(
    source: &[R],
    state: &QueryState,
    page: usize,
    limit: usize,
) -> PaginatedResponse<R> {
    let visible = run_query(source, state);
    paginate(&visible, page, limit)
}

fn paginate<R: Record>(visible: &[&R], page: usize, limit: usize) -> PaginatedResponse<R> {
    let pagination = PaginationMeta::new(page, limit, visible.len());
    let data = visible[pagination.range()]
        .iter()
        .map(|record| (*record).clone())
        .collect();
    PaginatedResponse { data, pagination }
}

/// Positions of the visible records in `source`, in display order
pub fn query_indices<R: Record>(source: &[R], state: &QueryState) -> Vec<usize> {
    let predicate = compile_predicate::<R>(&state.search_text, &state.filters);
    let visible: Vec<usize> = if predicate.is_trivial() {
        (0..source.len()).collect()
    } else {
        source
            .iter()
            .enumerate()
            .filter(|(_, record)| predicate.matches(record))
            .map(|(index, _)| index)
            .collect()
    };

    let Some(sort_key) = state.sort_key.as_deref() else {
        return visible;
    };
    let comparator = select_comparator::<R>(sort_key);
    comparator.sort_indices(source, visible, state.resolved_direction::<R>())
}

/// A live, memoised query over one source collection
///
/// Owns the query state and selection of one page. Any input change marks
/// the view dirty; the visible list is recomputed at most once per change,
/// the next time it is read. Recomputing also drops selected ids that are
/// no longer visible, whether deleted from the source or hidden by the
/// query, so a bulk action only ever sees what the user sees.
///
/// Replacing the source bumps a generation counter. Asynchronous loads grab
/// a ticket with [`begin_fetch`](Self::begin_fetch) and hand it back to
/// [`apply_fetched`](Self::apply_fetched), which discards results that a
/// newer load or replacement has superseded.
#[derive(Debug)]
pub struct QueryView<R: Record> {
    source: Arc<[R]>,
    state: QueryState,
    visible: Vec<usize>,
    dirty: bool,
    generation: u64,
    selection: SelectionTracker,
}

impl<R: Record> QueryView<R> {
    pub fn new(source: impl Into<Arc<[R]>>) -> Self {
        Self {
            source: source.into(),
            state: QueryState::default(),
            visible: Vec::new(),
            dirty: true,
            generation: 0,
            selection: SelectionTracker::new(),
        }
    }

    pub fn with_query(mut self, state: QueryState) -> Self {
        self.state = state;
        self.dirty = true;
        self
    }

    pub fn source(&self) -> &[R] {
        &self.source
    }

    pub fn query(&self) -> &QueryState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the source collection
    ///
    /// Passing the same shared collection again is a no-op.
    pub fn set_source(&mut self, source: impl Into<Arc<[R]>>) {
        let source = source.into();
        if Arc::ptr_eq(&self.source, &source) {
            return;
        }
        self.generation += 1;
        self.source = source;
        self.dirty = true;
    }

    /// Start an asynchronous load; returns the ticket to apply it with
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Apply the result of a load started with [`begin_fetch`](Self::begin_fetch)
    ///
    /// Returns `false` and leaves the view untouched when the ticket is stale.
    pub fn apply_fetched(&mut self, ticket: u64, source: impl Into<Arc<[R]>>) -> bool {
        if ticket != self.generation {
            tracing::warn!(
                record_type = R::record_type(),
                ticket,
                current = self.generation,
                "discarding stale fetch result"
            );
            return false;
        }
        self.source = source.into();
        self.dirty = true;
        true
    }

    pub fn set_query(&mut self, state: QueryState) {
        if self.state != state {
            self.state = state;
            self.dirty = true;
        }
    }

    pub fn set_search_text(&mut self, search_text: impl Into<String>) {
        let search_text = search_text.into();
        if self.state.search_text != search_text {
            self.state.search_text = search_text;
            self.dirty = true;
        }
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if self.state.filters.get(&key) != Some(value.as_str()) {
            self.state.filters.insert(key, value);
            self.dirty = true;
        }
    }

    pub fn clear_filter(&mut self, key: &str) {
        if self.state.filters.remove(key).is_some() {
            self.dirty = true;
        }
    }

    /// Sort by `sort_key`; `None` direction uses the field's default
    pub fn set_sort(&mut self, sort_key: impl Into<String>, direction: Option<SortDirection>) {
        let sort_key = Some(sort_key.into());
        if self.state.sort_key != sort_key || self.state.sort_direction != direction {
            self.state.sort_key = sort_key;
            self.state.sort_direction = direction;
            self.dirty = true;
        }
    }

    pub fn set_direction(&mut self, direction: SortDirection) {
        if self.state.sort_direction != Some(direction) {
            self.state.sort_direction = Some(direction);
            self.dirty = true;
        }
    }

    /// Recompute the visible list if any input changed
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.visible = query_indices(&self.source, &self.state);
        let source = &self.source;
        let pruned = self
            .selection
            .retain_present(self.visible.iter().map(|&index| source[index].id()));
        self.dirty = false;

        tracing::debug!(
            record_type = R::record_type(),
            source = self.source.len(),
            visible = self.visible.len(),
            pruned,
            "recomputed query view"
        );
    }

    /// Records passing the query, in display order
    pub fn visible(&mut self) -> Vec<&R> {
        self.refresh();
        self.visible.iter().map(|&index| &self.source[index]).collect()
    }

    pub fn visible_ids(&mut self) -> Vec<&str> {
        self.refresh();
        self.visible
            .iter()
            .map(|&index| self.source[index].id())
            .collect()
    }

    pub fn visible_len(&mut self) -> usize {
        self.refresh();
        self.visible.len()
    }

    /// One page of the visible records
    pub fn page(&mut self, page: usize, limit: usize) -> PaginatedResponse<R> {
        let visible = self.visible();
        paginate(&visible, page, limit)
    }

    /// Flip the selection of one record
    ///
    /// Ids outside the visible list are ignored. Returns whether the record
    /// is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        self.refresh();
        let source = &self.source;
        if !self.visible.iter().any(|&index| source[index].id() == id) {
            tracing::debug!(record_type = R::record_type(), id, "ignoring toggle of hidden id");
            return false;
        }
        self.selection.toggle(id)
    }

    /// Select every visible record, or clear if all are selected
    pub fn toggle_all(&mut self) -> SelectionState {
        self.refresh();
        let source = &self.source;
        let ids = self.visible.iter().map(|&index| source[index].id());
        self.selection.toggle_all(ids)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection_state(&mut self) -> SelectionState {
        self.refresh();
        let source = &self.source;
        let ids = self.visible.iter().map(|&index| source[index].id());
        self.selection.state(ids)
    }

    pub fn selected_ids(&self) -> &IndexSet<String> {
        self.selection.selected_ids()
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Selected records, in display order
    pub fn selected_records(&mut self) -> Vec<&R> {
        self.refresh();
        self.visible
            .iter()
            .map(|&index| &self.source[index])
            .filter(|record| self.selection.is_selected(record.id()))
            .collect()
    }
}
