//! Pagination utilities for Rally query responses.
//!
//! Rally pages by item offset: `start` is the 1-based index of the first
//! item to return and `pagesize` bounds how many come back.

use serde::Serialize;

use crate::error::{RallyError, Result};

/// A (start, page size) pair defining one bounded fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    start: u64,
    page_size: u32,
}

impl PageWindow {
    /// The 1-row window used to discover a query's total count.
    pub const COUNT: PageWindow = PageWindow {
        start: 1,
        page_size: 1,
    };

    /// Create a window starting at the 1-based index `start`.
    ///
    /// # Errors
    ///
    /// Returns [`RallyError::InvalidRequest`] if either value is zero.
    pub fn new(start: u64, page_size: u32) -> Result<Self> {
        if start == 0 {
            return Err(RallyError::InvalidRequest(
                "start index is 1-based and must be at least 1".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(RallyError::InvalidRequest(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(Self { start, page_size })
    }

    /// The window that follows `received` items already collected.
    pub fn after(received: u64, page_size: u32) -> Result<Self> {
        Self::new(received + 1, page_size)
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// A page of results from the Rally API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages (if reported).
    pub total: Option<u64>,
    /// The window this page was fetched with.
    pub window: PageWindow,
    /// Whether there are more items after this page.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a new page from items and pagination info.
    #[must_use]
    pub fn new(items: Vec<T>, window: PageWindow, total: Option<u64>) -> Self {
        let has_more = match total {
            Some(t) => window.start() - 1 + (items.len() as u64) < t,
            None => items.len() >= window.page_size() as usize,
        };
        Self {
            items,
            total,
            window,
            has_more,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
