//! Trait definitions for Rally operations.

mod list;

pub use list::{List, DEFAULT_PAGE_SIZE};
