//! Record types shown by the dashboard pages
//!
//! Each type declares its searchable, filterable and sortable fields with
//! [`impl_record!`](crate::impl_record). Field names follow the dashboard's
//! camelCase wire names.

pub mod article;
pub mod call;
pub mod customer;
pub mod recording;

pub use article::Article;
pub use call::CallRecord;
pub use customer::Customer;
pub use recording::Recording;
