//! List trait for fetching collections of objects.

use async_trait::async_trait;

use crate::client::RallyClient;
use crate::error::{RallyError, Result};
use crate::pagination::{Page, PageWindow};

/// Page size used when fetching every page of a query.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Count and list objects with offset pagination.
///
/// # Example
///
/// ```ignore
/// use rallyapi::{List, RallyClient, Record, ReportQuery};
///
/// let client = RallyClient::from_env()?;
/// let query = ReportQuery::new("iteration");
///
/// // How many are there?
/// let total = Record::count(&client, &query).await?;
///
/// // Fetch every page
/// let iterations = Record::list_all(&client, &query).await?;
/// assert_eq!(iterations.len() as u64, total);
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters for filtering.
    type Query: std::fmt::Debug + Send + Sync;

    /// Total number of objects matching the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no count.
    async fn count(client: &RallyClient, query: &Self::Query) -> Result<u64>;

    /// List the objects in one window.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &RallyClient,
        query: &Self::Query,
        window: PageWindow,
    ) -> Result<Page<Self>>;

    /// List all objects matching the query (fetches all pages).
    ///
    /// The total is counted first; each following window starts right after
    /// the items actually received, so short pages are tolerated. Any error
    /// aborts the run and the items gathered so far are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails, or [`RallyError::Protocol`] if
    /// a page comes back empty before the total is reached.
    async fn list_all(client: &RallyClient, query: &Self::Query) -> Result<Vec<Self>> {
        let total = Self::count(client, query).await?;
        let mut all_items = Vec::new();
        let mut received: u64 = 0;
        let mut pages = 0u32;

        while received < total {
            let window = PageWindow::after(received, DEFAULT_PAGE_SIZE)?;
            let page = Self::list_page(client, query, window).await?;

            if page.is_empty() {
                return Err(RallyError::Protocol(format!(
                    "page at start {} returned no items after {received} of {total}",
                    window.start()
                )));
            }

            received += page.len() as u64;
            pages += 1;
            tracing::debug!(start = window.start(), received, total, "Fetched page");
            all_items.extend(page.items);
        }

        tracing::info!(query = ?query, total, pages, "Pagination complete");
        Ok(all_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RallyConfig;
    use crate::models::Record;
    use crate::request::ReportQuery;
    use crate::test_support::ScriptedTransport;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn client_with(transport: ScriptedTransport) -> RallyClient {
        let config = RallyConfig::new("rally1.rallydev.com", "1.39", "alice", "secret");
        RallyClient::with_transport(config, transport).unwrap()
    }

    #[tokio::test]
    async fn test_three_pages_for_120_items() {
        let transport = ScriptedTransport::paged(120, 120, u64::MAX);
        let log = transport.log();
        let client = client_with(transport);

        let records = Record::list_all(&client, &ReportQuery::new("iteration"))
            .await
            .unwrap();

        assert_eq!(records.len(), 120);

        let log = log.lock().unwrap();
        // Count, then three pages
        assert_eq!(log.len(), 4);
        assert_eq!((log[0].start(), log[0].page_size()), (1, 1));
        let starts: Vec<u64> = log[1..].iter().map(|c| c.start()).collect();
        assert_eq!(starts, [1, 51, 101]);
        assert!(log[1..].iter().all(|c| c.page_size() == 50));
    }

    #[tokio::test]
    async fn test_start_advances_by_items_received() {
        // Service caps pages at 40 regardless of the requested size
        let transport = ScriptedTransport::paged(120, 120, 40);
        let log = transport.log();
        let client = client_with(transport);

        let records = Record::list_all(&client, &ReportQuery::new("iteration"))
            .await
            .unwrap();

        assert_eq!(records.len(), 120);
        let starts: Vec<u64> = log.lock().unwrap()[1..].iter().map(|c| c.start()).collect();
        assert_eq!(starts, [1, 41, 81]);
    }

    #[tokio::test]
    async fn test_records_keep_response_order() {
        let client = client_with(ScriptedTransport::paged(60, 60, u64::MAX));

        let records = Record::list_all(&client, &ReportQuery::new("iteration"))
            .await
            .unwrap();

        let names: Vec<&str> = records
            .iter()
            .filter_map(|r| r.get("Name").and_then(|v| v.as_str()))
            .collect();
        assert_eq!(names.first(), Some(&"Sprint 1"));
        assert_eq!(names.get(50), Some(&"Sprint 51"));
        assert_eq!(names.last(), Some(&"Sprint 60"));
    }

    #[tokio::test]
    async fn test_zero_progress_is_protocol_error() {
        // Claims 120 but only 40 exist: the page at 41 comes back empty
        let transport = ScriptedTransport::paged(120, 40, u64::MAX);
        let log = transport.log();
        let client = client_with(transport);

        let result = Record::list_all(&client, &ReportQuery::new("iteration")).await;

        assert!(matches!(result, Err(RallyError::Protocol(_))));
        // Count, the page at 1, the empty page at 41, and nothing after
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_zero_total_fetches_no_pages() {
        let transport = ScriptedTransport::paged(0, 0, u64::MAX);
        let log = transport.log();
        let client = client_with(transport);

        let records = Record::list_all(&client, &ReportQuery::new("release"))
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_completion_log_names_the_query() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = client_with(ScriptedTransport::paged(3, 3, u64::MAX));
        let query = ReportQuery::new("defect").in_workspace("workspace/7");
        Record::list_all(&client, &query).await.unwrap();

        let output = buffer.contents();
        let line = output
            .lines()
            .find(|line| line.contains("Pagination complete"))
            .unwrap();
        assert!(line.contains("object_type: \"defect\""), "{line}");
        assert!(line.contains("workspace/7"), "{line}");
        assert!(line.contains("total=3"), "{line}");
    }
}
