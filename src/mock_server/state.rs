//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Rally service.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

/// A listing query as received by the mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
    pub object_type: String,
    pub workspace: String,
    pub query: String,
    pub start: u64,
    pub page_size: u32,
}

/// Shared state for the mock server.
///
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Objects indexed by lowercase type name (e.g. "iteration").
    pub objects: HashMap<String, Vec<Value>>,

    /// If set, requests must carry these Basic credentials.
    pub required_credentials: Option<(String, String)>,

    /// Prefix every body with a `throw ...;` guard line.
    pub guard_line: bool,

    /// Report this total instead of the real object count.
    pub reported_total: Option<u64>,

    /// Serve at most this many objects per page, whatever was asked.
    pub max_page_size: Option<u32>,

    /// Every listing query received, in arrival order.
    pub requests: Vec<RecordedQuery>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add objects of a type.
    pub fn with_objects(mut self, object_type: &str, objects: Vec<Value>) -> Self {
        self.objects
            .entry(object_type.to_lowercase())
            .or_default()
            .extend(objects);
        self
    }

    /// Require HTTP Basic credentials.
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.required_credentials = Some((username.to_string(), password.to_string()));
        self
    }

    /// Prefix responses with a guard line.
    pub fn with_guard_line(mut self) -> Self {
        self.guard_line = true;
        self
    }

    /// Override the reported total count.
    pub fn with_reported_total(mut self, total: u64) -> Self {
        self.reported_total = Some(total);
        self
    }

    /// Cap the number of objects per page.
    pub fn with_max_page_size(mut self, max: u32) -> Self {
        self.max_page_size = Some(max);
        self
    }

    /// Get the objects of a type, if the type is known.
    pub fn objects_of(&self, object_type: &str) -> Option<&[Value]> {
        self.objects
            .get(&object_type.to_lowercase())
            .map(Vec::as_slice)
    }

    /// Check a username/password pair against the required credentials.
    pub fn accepts(&self, username: &str, password: &str) -> bool {
        match &self.required_credentials {
            Some((u, p)) => u == username && p == password,
            None => true,
        }
    }
}
