//! Selection tracking for bulk actions

use indexmap::IndexSet;
use serde::Serialize;
use std::collections::HashSet;

/// Selection state relative to the currently visible records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionState {
    /// No visible id selected
    Empty,
    /// Some visible ids selected, but not all
    Partial,
    /// Every visible id is selected (and at least one is visible)
    AllVisible,
}

/// Set of record ids marked for a pending bulk action
///
/// The tracker never looks at records itself: callers pass the ids of the
/// currently visible (filtered and sorted) list. `toggle_all` only ever
/// selects ids from that list, so records hidden by a search or filter are
/// never swept into a bulk action.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: IndexSet<String>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids, in the order they were selected
    pub fn selected_ids(&self) -> &IndexSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Flip one id; returns whether it is selected afterwards
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.shift_remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Select every visible id, or clear if they are all selected already
    pub fn toggle_all<'a, I>(&mut self, visible_ids: I) -> SelectionState
    where
        I: IntoIterator<Item = &'a str>,
    {
        let visible: Vec<&str> = visible_ids.into_iter().collect();

        if self.state_of(&visible) == SelectionState::AllVisible {
            self.clear();
            return SelectionState::Empty;
        }

        self.selected = visible.iter().map(|id| id.to_string()).collect();
        self.state_of(&visible)
    }

    /// Drop every selection, e.g. after a bulk action was dispatched
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drain the selection for dispatching, leaving the tracker empty
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.selected).into_iter().collect()
    }

    /// Keep only ids still present in the source collection
    ///
    /// Returns the number of ids dropped.
    pub fn retain_present<'a, I>(&mut self, present_ids: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.selected.is_empty() {
            return 0;
        }
        let present: HashSet<&str> = present_ids.into_iter().collect();
        let before = self.selected.len();
        self.selected.retain(|id| present.contains(id.as_str()));
        before - self.selected.len()
    }

    /// Selection state relative to `visible_ids`
    pub fn state<'a, I>(&self, visible_ids: I) -> SelectionState
    where
        I: IntoIterator<Item = &'a str>,
    {
        let visible: Vec<&str> = visible_ids.into_iter().collect();
        self.state_of(&visible)
    }

    fn state_of(&self, visible: &[&str]) -> SelectionState {
        let selected = visible
            .iter()
            .filter(|id| self.selected.contains(**id))
            .count();
        match selected {
            0 => SelectionState::Empty,
            n if n == visible.len() => SelectionState::AllVisible,
            _ => SelectionState::Partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(range: std::ops::RangeInclusive<u32>) -> Vec<String> {
        range.map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut tracker = SelectionTracker::new();
        assert!(tracker.toggle("1"));
        assert!(tracker.is_selected("1"));
        assert!(!tracker.toggle("1"));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_state_transitions() {
        let visible = ids(1..=3);
        let visible = || visible.iter().map(String::as_str);

        let mut tracker = SelectionTracker::new();
        assert_eq!(tracker.state(visible()), SelectionState::Empty);

        tracker.toggle("1");
        assert_eq!(tracker.state(visible()), SelectionState::Partial);

        tracker.toggle("2");
        tracker.toggle("3");
        assert_eq!(tracker.state(visible()), SelectionState::AllVisible);

        tracker.toggle("2");
        assert_eq!(tracker.state(visible()), SelectionState::Partial);
    }

    #[test]
    fn test_toggle_all_selects_only_visible_then_clears() {
        let visible = ["2", "5", "7"];
        let mut tracker = SelectionTracker::new();

        assert_eq!(tracker.toggle_all(visible), SelectionState::AllVisible);
        assert_eq!(tracker.len(), 3);
        assert!(!tracker.is_selected("1"));

        assert_eq!(tracker.toggle_all(visible), SelectionState::Empty);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_toggle_all_from_partial_replaces_selection() {
        let mut tracker = SelectionTracker::new();
        tracker.toggle("9");
        tracker.toggle("2");

        assert_eq!(tracker.toggle_all(["2", "3"]), SelectionState::AllVisible);
        let selected: Vec<&str> = tracker.selected_ids().iter().map(String::as_str).collect();
        assert_eq!(selected, vec!["2", "3"]);
    }

    #[test]
    fn test_empty_visible_list_is_never_all_visible() {
        let mut tracker = SelectionTracker::new();
        assert_eq!(tracker.toggle_all(std::iter::empty()), SelectionState::Empty);

        tracker.toggle("1");
        assert_eq!(tracker.state(std::iter::empty()), SelectionState::Empty);
    }

    #[test]
    fn test_state_counts_only_visible_ids() {
        let mut tracker = SelectionTracker::new();
        tracker.toggle("2");

        assert_eq!(tracker.state(["3"]), SelectionState::Empty);
        assert_eq!(tracker.state(["2", "3"]), SelectionState::Partial);
        assert_eq!(tracker.state(["2"]), SelectionState::AllVisible);
    }

    #[test]
    fn test_retain_present_prunes_removed_ids() {
        let mut tracker = SelectionTracker::new();
        tracker.toggle("1");
        tracker.toggle("2");
        tracker.toggle("3");

        let dropped = tracker.retain_present(["1", "3", "4"]);
        assert_eq!(dropped, 1);
        assert!(!tracker.is_selected("2"));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_take_drains_in_selection_order() {
        let mut tracker = SelectionTracker::new();
        tracker.toggle("b");
        tracker.toggle("a");

        assert_eq!(tracker.take(), vec!["b".to_string(), "a".to_string()]);
        assert!(tracker.is_empty());
    }
}
