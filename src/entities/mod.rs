//! Record definition helpers

pub mod macros;
