//! HTTP handlers for the mock Rally service.

mod query;

pub use query::query_objects;
