//! Macros for reducing boilerplate when defining record types
//!
//! These macros generate the struct and the `Record` implementation
//! needed for each record type flowing through the query pipeline.

/// Complete macro to create a record type with its `Record` implementation
///
/// Every field is listed with its wire name, the name used by
/// `field_value`, filters and sort keys. The generated struct always has
/// an `id: String` field, serialized as `id`.
///
/// # Example
///
/// ```rust,ignore
/// use callboard::prelude::*;
///
/// impl_record!(
///     Customer,
///     "customer",
///     searchable: ["name", "email"],
///     filterable: ["status"],
///     sortable: ["name": text, "lastContact": date descending],
///     {
///         name: String => "name",
///         email: String => "email",
///         status: String => "status",
///         last_contact: String => "lastContact",
///     }
/// );
///
/// // Usage
/// let customer = Customer::new(
///     "Acme Corp".to_string(),
///     "ops@acme.test".to_string(),
///     "active".to_string(),
///     "2024-03-01T09:00:00Z".to_string(),
/// );
/// ```
#[macro_export]
macro_rules! impl_record {
    (
        $type:ident,
        $type_name:expr,
        searchable: [ $( $searchable:literal ),* $(,)? ],
        filterable: [ $( $filterable:literal ),* $(,)? ],
        sortable: [ $( $sort_name:literal : $sort_kind:ident $( $sort_dir:ident )? ),* $(,)? ],
        {
            $( $field:ident : $field_type:ty => $wire:literal ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier for this record
            pub id: String,
            $(
                #[serde(rename = $wire)]
                pub $field : $field_type
            ),*
        }

        impl $type {
            /// Create a new record with a fresh id
            #[allow(clippy::too_many_arguments)]
            pub fn new($( $field: $field_type ),*) -> Self {
                Self {
                    id: ::uuid::Uuid::new_v4().to_string(),
                    $( $field ),*
                }
            }

            /// Create a record with a known id
            #[allow(clippy::too_many_arguments)]
            pub fn with_id(id: impl Into<String>, $( $field: $field_type ),*) -> Self {
                Self {
                    id: id.into(),
                    $( $field ),*
                }
            }
        }

        impl $crate::core::record::Record for $type {
            fn record_type() -> &'static str {
                $type_name
            }

            fn id(&self) -> &str {
                &self.id
            }

            fn searchable_fields() -> &'static [&'static str] {
                &[ $( $searchable ),* ]
            }

            fn filterable_fields() -> &'static [&'static str] {
                &[ $( $filterable ),* ]
            }

            fn sortable_fields() -> &'static [$crate::core::field::SortField] {
                const FIELDS: &[$crate::core::field::SortField] = &[
                    $( $crate::core::field::SortField::$sort_kind($sort_name) $( .$sort_dir() )? ),*
                ];
                FIELDS
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                match field {
                    "id" => Some($crate::core::field::FieldValue::String(self.id.clone())),
                    $(
                        $wire => Some($crate::core::field::ToFieldValue::to_field_value(&self.$field)),
                    )*
                    _ => None,
                }
            }
        }
    };
}
