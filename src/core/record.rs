//! Record trait defining the queryable capability set of a record type

use crate::core::field::{FieldValue, SortField};

/// Base trait for every record that can flow through the query pipeline.
///
/// A record type declares, once and statically, which of its fields are:
/// - searchable: substring-matched by free-text search
/// - filterable: compared exactly against categorical filter values
/// - sortable: ordered by a comparator chosen from the field's [`FieldKind`]
///
/// Field names are the dashboard's wire names (e.g. `lastContact`,
/// `totalCalls`), not necessarily the Rust field names.
///
/// [`FieldKind`]: crate::core::field::FieldKind
pub trait Record: Clone + Send + Sync + 'static {
    /// The record type name (e.g., "customer", "call")
    fn record_type() -> &'static str;

    /// Stable identifier, unique within one source collection
    fn id(&self) -> &str;

    /// Fields matched by free-text search
    fn searchable_fields() -> &'static [&'static str];

    /// Fields usable as categorical filters
    fn filterable_fields() -> &'static [&'static str];

    /// Fields usable as sort keys, with their kind and default direction
    fn sortable_fields() -> &'static [SortField];

    /// Get the value of a specific field by name
    ///
    /// Returns `None` for names the record type does not know.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Look up the sort declaration for a key
    fn sort_field(key: &str) -> Option<&'static SortField> {
        Self::sortable_fields().iter().find(|field| field.name == key)
    }

    /// Check whether a field is declared filterable
    fn is_filterable(field: &str) -> bool {
        Self::filterable_fields().contains(&field)
    }
}
