//! Builder API for ergonomic store construction.

pub mod store;

pub use store::StoreBuilder;
