//! Predicate compiler: free-text search plus filters into one record test

use crate::core::field::{FieldKind, parse_instant};
use crate::core::query::Filters;
use crate::core::record::Record;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::marker::PhantomData;
use std::sync::OnceLock;

/// Comparison operator carried by a filter key suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl FilterOp {
    fn from_suffix(suffix: Option<&str>) -> Self {
        match suffix {
            Some(">") => FilterOp::Gt,
            Some("<") => FilterOp::Lt,
            Some(">=") => FilterOp::Gte,
            Some("<=") => FilterOp::Lte,
            Some("!=") => FilterOp::Ne,
            _ => FilterOp::Eq,
        }
    }

    fn accepts(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            FilterOp::Eq => ordering == Equal,
            FilterOp::Ne => ordering != Equal,
            FilterOp::Gt => ordering == Greater,
            FilterOp::Lt => ordering == Less,
            FilterOp::Gte => ordering != Less,
            FilterOp::Lte => ordering != Greater,
        }
    }
}

/// Split a filter key into field name and operator (`totalCalls>=` → `totalCalls`, `>=`)
pub fn parse_filter_key(key: &str) -> (&str, FilterOp) {
    static FILTER_KEY: OnceLock<Regex> = OnceLock::new();
    let regex = FILTER_KEY.get_or_init(|| {
        Regex::new(r"^(?P<field>.*?)\s*(?P<op>>=|<=|!=|>|<)?$").expect("filter key pattern")
    });

    match regex.captures(key) {
        Some(caps) => {
            let field = caps.name("field").map_or(key, |m| m.as_str());
            let op = FilterOp::from_suffix(caps.name("op").map(|m| m.as_str()));
            (field, op)
        }
        None => (key, FilterOp::Eq),
    }
}

#[derive(Debug, Clone)]
enum Threshold {
    Number(f64),
    Instant(DateTime<Utc>),
}

#[derive(Debug, Clone)]
enum Condition {
    /// Exact categorical match (or mismatch for `!=`)
    Category {
        field: String,
        value: String,
        negate: bool,
    },
    /// Ordered comparison against a numeric or date threshold
    Range {
        field: String,
        op: FilterOp,
        threshold: Threshold,
    },
    /// A filter no record can satisfy
    Unsatisfiable,
}

/// A compiled record test
///
/// Holds the normalized search needle and the active filter conditions.
/// Testing a record has no side effects.
#[derive(Debug, Clone)]
pub struct Predicate<R> {
    needle: Option<String>,
    conditions: Vec<Condition>,
    _record: PhantomData<fn(&R) -> bool>,
}

/// Compile search text and filter selections into a [`Predicate`]
///
/// - Whitespace-only search text matches every record.
/// - Filters whose value is `"all"` are skipped.
/// - Equality filters on fields `R` does not declare filterable match nothing.
/// - Ordering filters (`>`, `<`, `>=`, `<=`) need a sortable number or date
///   field and a parsable threshold; otherwise they match nothing.
pub fn compile_predicate<R: Record>(search_text: &str, filters: &Filters) -> Predicate<R> {
    let trimmed = search_text.trim();
    let needle = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());

    let conditions = filters
        .active()
        .map(|(key, value)| compile_condition::<R>(key, value))
        .collect();

    Predicate {
        needle,
        conditions,
        _record: PhantomData,
    }
}

fn compile_condition<R: Record>(key: &str, value: &str) -> Condition {
    let (field, op) = parse_filter_key(key);

    match op {
        FilterOp::Eq | FilterOp::Ne => {
            if !R::is_filterable(field) {
                tracing::debug!(
                    record_type = R::record_type(),
                    field,
                    "filter on undeclared field matches nothing"
                );
                return Condition::Unsatisfiable;
            }
            Condition::Category {
                field: field.to_string(),
                value: value.to_string(),
                negate: op == FilterOp::Ne,
            }
        }
        _ => {
            let threshold = match R::sort_field(field).map(|f| f.kind) {
                Some(FieldKind::Number) => value.trim().parse().ok().map(Threshold::Number),
                Some(FieldKind::Date) => parse_instant(value).map(Threshold::Instant),
                _ => None,
            };
            match threshold {
                Some(threshold) => Condition::Range {
                    field: field.to_string(),
                    op,
                    threshold,
                },
                None => {
                    tracing::debug!(
                        record_type = R::record_type(),
                        key,
                        value,
                        "range filter without a comparable field or threshold matches nothing"
                    );
                    Condition::Unsatisfiable
                }
            }
        }
    }
}

impl<R: Record> Predicate<R> {
    /// Test one record
    pub fn matches(&self, record: &R) -> bool {
        self.matches_search(record) && self.conditions.iter().all(|c| c.holds(record))
    }

    /// Borrow the predicate as a plain closure
    pub fn as_fn(&self) -> impl Fn(&R) -> bool + '_ {
        move |record| self.matches(record)
    }

    /// Whether this predicate accepts every record
    pub fn is_trivial(&self) -> bool {
        self.needle.is_none() && self.conditions.is_empty()
    }

    fn matches_search(&self, record: &R) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        R::searchable_fields().iter().any(|field| {
            record
                .field_value(field)
                .is_some_and(|value| value.search_terms().iter().any(|t| t.contains(needle)))
        })
    }
}

impl Condition {
    fn holds<R: Record>(&self, record: &R) -> bool {
        match self {
            Condition::Category {
                field,
                value,
                negate,
            } => {
                let key = record.field_value(field).and_then(|v| v.filter_key());
                let equal = key.as_deref() == Some(value.as_str());
                equal != *negate
            }
            Condition::Range {
                field,
                op,
                threshold,
            } => {
                let Some(actual) = record.field_value(field) else {
                    return false;
                };
                let ordering = match threshold {
                    Threshold::Number(limit) => actual.as_number().partial_cmp(limit),
                    Threshold::Instant(limit) => actual.as_instant().map(|at| at.cmp(limit)),
                };
                ordering.is_some_and(|ordering| op.accepts(ordering))
            }
            Condition::Unsatisfiable => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::{FieldValue, SortField, ToFieldValue};

    #[derive(Clone, Debug)]
    struct Contact {
        id: String,
        name: Option<String>,
        tags: Vec<String>,
        status: String,
        calls: f64,
        last_contact: String,
    }

    impl Record for Contact {
        fn record_type() -> &'static str {
            "contact"
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn searchable_fields() -> &'static [&'static str] {
            &["name", "tags"]
        }

        fn filterable_fields() -> &'static [&'static str] {
            &["status"]
        }

        fn sortable_fields() -> &'static [SortField] {
            const FIELDS: &[SortField] = &[
                SortField::text("name"),
                SortField::number("calls").descending(),
                SortField::date("lastContact").descending(),
            ];
            FIELDS
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "name" => Some(self.name.to_field_value()),
                "tags" => Some(self.tags.to_field_value()),
                "status" => Some(self.status.to_field_value()),
                "calls" => Some(self.calls.to_field_value()),
                "lastContact" => Some(self.last_contact.to_field_value()),
                _ => None,
            }
        }
    }

    fn contact(id: &str, name: Option<&str>, status: &str, calls: f64) -> Contact {
        Contact {
            id: id.to_string(),
            name: name.map(str::to_string),
            tags: vec!["VIP".to_string(), "Renewal".to_string()],
            status: status.to_string(),
            calls,
            last_contact: "2024-03-01T09:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_parse_filter_key() {
        assert_eq!(parse_filter_key("status"), ("status", FilterOp::Eq));
        assert_eq!(parse_filter_key("calls>"), ("calls", FilterOp::Gt));
        assert_eq!(parse_filter_key("calls >="), ("calls", FilterOp::Gte));
        assert_eq!(parse_filter_key("lastContact<="), ("lastContact", FilterOp::Lte));
        assert_eq!(parse_filter_key("status!="), ("status", FilterOp::Ne));
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let predicate = compile_predicate::<Contact>("   ", &Filters::new());
        assert!(predicate.is_trivial());
        assert!(predicate.matches(&contact("1", None, "active", 0.0)));
    }

    #[test]
    fn test_search_is_case_insensitive_and_trimmed() {
        let predicate = compile_predicate::<Contact>("  ALI ", &Filters::new());
        assert!(predicate.matches(&contact("1", Some("Alice"), "active", 0.0)));
        assert!(!predicate.matches(&contact("2", Some("Bob"), "active", 0.0)));
    }

    #[test]
    fn test_search_matches_list_elements() {
        let predicate = compile_predicate::<Contact>("renew", &Filters::new());
        assert!(predicate.matches(&contact("1", Some("Bob"), "active", 0.0)));
    }

    #[test]
    fn test_missing_searchable_field_does_not_match() {
        let mut record = contact("1", None, "active", 0.0);
        record.tags.clear();
        let predicate = compile_predicate::<Contact>("x", &Filters::new());
        assert!(!predicate.matches(&record));
    }

    #[test]
    fn test_category_filter_is_exact_and_case_sensitive() {
        let filters: Filters = [("status", "active")].into_iter().collect();
        let predicate = compile_predicate::<Contact>("", &filters);
        assert!(predicate.matches(&contact("1", None, "active", 0.0)));
        assert!(!predicate.matches(&contact("2", None, "Active", 0.0)));
        assert!(!predicate.matches(&contact("3", None, "inactive", 0.0)));
    }

    #[test]
    fn test_all_sentinel_is_skipped() {
        let filters: Filters = [("status", "all")].into_iter().collect();
        let predicate = compile_predicate::<Contact>("", &filters);
        assert!(predicate.is_trivial());
    }

    #[test]
    fn test_undeclared_filter_field_matches_nothing() {
        let filters: Filters = [("name", "Bob")].into_iter().collect();
        let predicate = compile_predicate::<Contact>("", &filters);
        assert!(!predicate.is_trivial());
        assert!(!predicate.matches(&contact("1", Some("Bob"), "active", 0.0)));
        assert!(!predicate.matches(&contact("2", Some("Alice"), "active", 0.0)));
    }

    #[test]
    fn test_negated_category_filter() {
        let filters: Filters = [("status!=", "inactive")].into_iter().collect();
        let predicate = compile_predicate::<Contact>("", &filters);
        assert!(predicate.matches(&contact("1", None, "active", 0.0)));
        assert!(!predicate.matches(&contact("2", None, "inactive", 0.0)));
    }

    #[test]
    fn test_numeric_range_filter() {
        let filters: Filters = [("calls>=", "10")].into_iter().collect();
        let predicate = compile_predicate::<Contact>("", &filters);
        assert!(predicate.matches(&contact("1", None, "active", 10.0)));
        assert!(!predicate.matches(&contact("2", None, "active", 9.5)));
        assert!(!predicate.matches(&contact("3", None, "active", f64::NAN)));
    }

    #[test]
    fn test_date_range_filter() {
        let filters: Filters = [("lastContact<", "2024-02-01")].into_iter().collect();
        let predicate = compile_predicate::<Contact>("", &filters);

        let mut early = contact("1", None, "active", 0.0);
        early.last_contact = "2024-01-20T00:00:00Z".to_string();
        let mut broken = contact("2", None, "active", 0.0);
        broken.last_contact = "not-a-date".to_string();

        assert!(predicate.matches(&early));
        assert!(!predicate.matches(&contact("3", None, "active", 0.0)));
        assert!(!predicate.matches(&broken));
    }

    #[test]
    fn test_unusable_range_filters_match_nothing() {
        let record = contact("1", Some("Carl"), "active", 50.0);
        for (key, value) in [("calls>", "lots"), ("name>", "B"), ("shoeSize<", "9")] {
            let filters: Filters = [(key, value)].into_iter().collect();
            let predicate = compile_predicate::<Contact>("", &filters);
            assert!(!predicate.matches(&record), "{} {} should match nothing", key, value);
        }
    }

    #[test]
    fn test_as_fn_filters_iterators() {
        let records = vec![
            contact("1", Some("Alice"), "active", 1.0),
            contact("2", Some("Bob"), "inactive", 2.0),
        ];
        let filters: Filters = [("status", "inactive")].into_iter().collect();
        let predicate = compile_predicate::<Contact>("", &filters);
        let test = predicate.as_fn();
        let ids: Vec<&str> = records.iter().filter(|&r| test(r)).map(|r| r.id()).collect();
        assert_eq!(ids, vec!["2"]);
    }
}
