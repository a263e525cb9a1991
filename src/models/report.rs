//! Listing and counting objects as flattened records.

use async_trait::async_trait;

use super::record::Record;
use crate::client::RallyClient;
use crate::error::Result;
use crate::pagination::{Page, PageWindow};
use crate::request::ReportQuery;
use crate::traits::List;

#[async_trait]
impl List for Record {
    type Query = ReportQuery;

    #[tracing::instrument(skip(client))]
    async fn count(client: &RallyClient, query: &Self::Query) -> Result<u64> {
        client
            .query(query, PageWindow::COUNT)
            .await?
            .total_result_count()
    }

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &RallyClient,
        query: &Self::Query,
        window: PageWindow,
    ) -> Result<Page<Self>> {
        let result = client.query(query, window).await?;
        let records = result.records()?;

        Ok(Page::new(records, window, result.reported_total()))
    }
}

/// Get every object matching `query`, flattened.
///
/// # Example
///
/// ```ignore
/// let releases = get_report(&client, &ReportQuery::new("release")).await?;
/// ```
pub async fn get_report(client: &RallyClient, query: &ReportQuery) -> Result<Vec<Record>> {
    Record::list_all(client, query).await
}

/// Get the objects in one caller-chosen window.
pub async fn get_report_page(
    client: &RallyClient,
    query: &ReportQuery,
    start: u64,
    page_size: u32,
) -> Result<Page<Record>> {
    Record::list_page(client, query, PageWindow::new(start, page_size)?).await
}

/// Get the number of objects matching `query`.
pub async fn get_report_total_count(client: &RallyClient, query: &ReportQuery) -> Result<u64> {
    Record::count(client, query).await
}
