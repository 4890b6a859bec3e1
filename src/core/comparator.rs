//! Comparator selection for named sort keys
//!
//! Each sortable field declares a [`FieldKind`] that decides how two
//! records compare:
//!
//! - `Text`: collation in the spirit of a locale compare. Base letters
//!   first (accents and case ignored), then accents (unaccented first),
//!   then case (lower-case first), then raw code points.
//! - `Number`: numeric order; `NaN` and missing values are the lowest.
//! - `Date`: instant order; unparsable and missing dates come after every
//!   valid date.
//!
//! An unknown key selects a comparator that reports every pair as equal,
//! so a stable sort leaves the input order untouched.

use crate::core::field::{FieldKind, FieldValue, SortDirection, SortField};
use crate::core::record::Record;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::marker::PhantomData;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Precomputed collation key for a text value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollationKey {
    primary: String,
    secondary: String,
    tertiary: Vec<bool>,
    raw: String,
}

impl CollationKey {
    pub fn new(text: &str) -> Self {
        let primary = text
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect();
        let secondary = text.nfd().flat_map(char::to_lowercase).collect();
        let tertiary = text
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .map(char::is_uppercase)
            .collect();

        Self {
            primary,
            secondary,
            tertiary,
            raw: text.to_string(),
        }
    }
}

impl Ord for CollationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.primary
            .cmp(&other.primary)
            .then_with(|| self.secondary.cmp(&other.secondary))
            .then_with(|| self.tertiary.cmp(&other.tertiary))
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for CollationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two strings the way the text comparator does
pub fn collate(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}

/// Sort value extracted once per record
#[derive(Debug, Clone)]
pub enum SortKey {
    Text(CollationKey),
    Number(f64),
    Date(Option<DateTime<Utc>>),
    /// Produced by the no-op comparator
    Unordered,
}

impl SortKey {
    fn extract(kind: FieldKind, value: Option<FieldValue>) -> Self {
        match kind {
            FieldKind::Text => SortKey::Text(CollationKey::new(&text_of(value.as_ref()))),
            FieldKind::Number => SortKey::Number(value.map_or(f64::NAN, |v| v.as_number())),
            FieldKind::Date => SortKey::Date(value.and_then(|v| v.as_instant())),
        }
    }

    /// Total order between keys of the same comparator
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => compare_numbers(*a, *b),
            (SortKey::Date(a), SortKey::Date(b)) => compare_dates(a.as_ref(), b.as_ref()),
            _ => Ordering::Equal,
        }
    }
}

fn text_of(value: Option<&FieldValue>) -> String {
    match value {
        Some(FieldValue::String(s)) => s.clone(),
        Some(FieldValue::List(items)) => items
            .iter()
            .filter_map(FieldValue::filter_key)
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.filter_key().unwrap_or_default(),
        None => String::new(),
    }
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

fn compare_dates(a: Option<&DateTime<Utc>>, b: Option<&DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ordering for records of type `R` under one sort key
#[derive(Debug, Clone)]
pub struct Comparator<R> {
    field: Option<SortField>,
    _record: PhantomData<fn(&R, &R) -> Ordering>,
}

/// Select the comparator for `sort_key` from `R`'s declared sortable fields
pub fn select_comparator<R: Record>(sort_key: &str) -> Comparator<R> {
    select_comparator_in(sort_key, R::sortable_fields())
}

/// Select the comparator for `sort_key` from explicit field declarations
pub fn select_comparator_in<R: Record>(sort_key: &str, fields: &[SortField]) -> Comparator<R> {
    let field = fields.iter().find(|field| field.name == sort_key).copied();
    if field.is_none() {
        tracing::debug!(
            record_type = R::record_type(),
            sort_key,
            "unknown sort key, keeping source order"
        );
    }
    Comparator {
        field,
        _record: PhantomData,
    }
}

impl<R: Record> Comparator<R> {
    /// Comparator that treats every pair as equal
    pub fn noop() -> Self {
        Self {
            field: None,
            _record: PhantomData,
        }
    }

    /// Whether this comparator leaves order untouched
    pub fn is_noop(&self) -> bool {
        self.field.is_none()
    }

    /// The declared field this comparator orders by
    pub fn field(&self) -> Option<&SortField> {
        self.field.as_ref()
    }

    /// Direction used when the query does not name one
    pub fn default_direction(&self) -> SortDirection {
        self.field
            .map(|field| field.default_direction)
            .unwrap_or_default()
    }

    /// Extract the sort key of one record
    pub fn key(&self, record: &R) -> SortKey {
        match &self.field {
            Some(field) => SortKey::extract(field.kind, record.field_value(field.name)),
            None => SortKey::Unordered,
        }
    }

    /// Compare two records (ascending)
    ///
    /// Extracts both sort keys on every call. Sorting many records is
    /// cheaper with [`sort_records`](Self::sort_records) or
    /// [`sort_indices`](Self::sort_indices), which extract each key once.
    pub fn compare(&self, a: &R, b: &R) -> Ordering {
        if self.is_noop() {
            return Ordering::Equal;
        }
        self.key(a).compare(&self.key(b))
    }

    /// Borrow the comparator as a plain closure, usable with `sort_by`
    pub fn as_fn(&self) -> impl Fn(&R, &R) -> Ordering + '_ {
        move |a, b| self.compare(a, b)
    }

    /// Stably sort records, extracting each sort key once
    pub fn sort_records<'a>(&self, records: Vec<&'a R>, direction: SortDirection) -> Vec<&'a R> {
        if self.is_noop() {
            return records;
        }
        let keyed = records
            .into_iter()
            .map(|record| (self.key(record), record))
            .collect();
        sort_keyed(keyed, direction)
    }

    /// Stably sort positions into `source`, extracting each sort key once
    pub fn sort_indices(
        &self,
        source: &[R],
        indices: Vec<usize>,
        direction: SortDirection,
    ) -> Vec<usize> {
        if self.is_noop() {
            return indices;
        }
        let keyed = indices
            .into_iter()
            .map(|index| (self.key(&source[index]), index))
            .collect();
        sort_keyed(keyed, direction)
    }
}

fn sort_keyed<T>(mut keyed: Vec<(SortKey, T)>, direction: SortDirection) -> Vec<T> {
    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Ascending => a.compare(b),
        SortDirection::Descending => a.compare(b).reverse(),
    });
    keyed.into_iter().map(|(_, item)| item).collect()
}
