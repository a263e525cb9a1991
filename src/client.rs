//! Rally API client.
//!
//! Low-level client that holds the configuration, fetches documents through
//! a [`Transport`] and decodes the query envelope. Counting and listing are
//! implemented via the [`List`](crate::List) trait on [`Record`](crate::Record).

use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::config::RallyConfig;
use crate::error::Result;
use crate::models::QueryResult;
use crate::pagination::PageWindow;
use crate::request::{report_url, ReportQuery};
use crate::transport::{HttpTransport, Transport};

/// Leading token of the script guard line some responses start with.
const GUARD_PREFIX: &str = "throw";

/// Rally API client.
///
/// This struct is cheaply cloneable; clones share the configuration and
/// transport. It holds no mutable state, so independent queries may run
/// from several tasks at once.
///
/// # Example
///
/// ```no_run
/// use rallyapi::RallyClient;
///
/// # fn example() -> rallyapi::Result<()> {
/// // Create from environment variables
/// let client = RallyClient::from_env()?;
///
/// // Or configure manually
/// let client = RallyClient::new("rally1.rallydev.com", "1.39", "user", "secret")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RallyClient {
    config: Arc<RallyConfig>,
    service_root: Arc<Url>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for RallyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RallyClient")
            .field("service_root", &self.service_root.as_str())
            .field("username", &self.config.credentials().username())
            .finish_non_exhaustive()
    }
}

impl RallyClient {
    /// Create a client for `host` speaking API `version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host or version do not form a valid URL.
    pub fn new(host: &str, version: &str, username: &str, password: &str) -> Result<Self> {
        Self::from_config(RallyConfig::new(host, version, username, password))
    }

    /// Create a client from environment variables.
    ///
    /// See [`RallyConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::from_config(RallyConfig::from_env()?)
    }

    /// Create a client using the default HTTP transport.
    pub fn from_config(config: RallyConfig) -> Result<Self> {
        Self::with_transport(config, HttpTransport::new()?)
    }

    /// Create a client that fetches documents through `transport`.
    pub fn with_transport(
        config: RallyConfig,
        transport: impl Transport + 'static,
    ) -> Result<Self> {
        let service_root = config.service_root()?;

        Ok(Self {
            config: Arc::new(config),
            service_root: Arc::new(service_root),
            transport: Arc::new(transport),
        })
    }

    pub fn config(&self) -> &RallyConfig {
        &self.config
    }

    /// The URL object-type resources are resolved against.
    pub fn service_root(&self) -> &Url {
        &self.service_root
    }

    /// Fetch a document as text, without any guard lines.
    #[tracing::instrument(skip(self, url), fields(url = %url))]
    pub async fn get_document(&self, url: &Url) -> Result<String> {
        let body = self
            .transport
            .fetch(url, self.config.credentials())
            .await?;

        Ok(strip_guard_lines(&body))
    }

    /// Fetch and parse a JSON document.
    pub async fn get_json_document(&self, url: &Url) -> Result<Value> {
        let text = self.get_document(url).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Run one windowed query and decode its envelope.
    #[tracing::instrument(skip(self))]
    pub async fn query(&self, query: &ReportQuery, window: PageWindow) -> Result<QueryResult> {
        let url = report_url(&self.service_root, query, window)?;
        let document = self.get_json_document(&url).await?;
        QueryResult::from_document(document)
    }
}

/// Drop lines starting with the script guard token and join the rest
/// without separators.
fn strip_guard_lines(body: &str) -> String {
    body.lines()
        .filter(|line| {
            let guard = line.starts_with(GUARD_PREFIX);
            if guard {
                tracing::debug!(line = %line, "Dropping guard line");
            }
            !guard
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RallyError;
    use crate::test_support::ScriptedTransport;

    fn config() -> RallyConfig {
        RallyConfig::new("rally1.rallydev.com", "1.39", "alice", "hunter2")
    }

    #[test]
    fn test_client_debug() {
        let client = RallyClient::new("rally1.rallydev.com", "1.39", "alice", "hunter2").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("RallyClient"));
        assert!(debug.contains("service_root"));
        // Password should not be in debug output
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_strip_guard_lines() {
        let body = "throw 'allowIllegalResourceCall is false.';\n\
                    {\"QueryResult\":\n{\"TotalResultCount\": 3}}";
        assert_eq!(
            strip_guard_lines(body),
            "{\"QueryResult\":{\"TotalResultCount\": 3}}"
        );
    }

    #[test]
    fn test_strip_guard_lines_only_at_line_start() {
        let body = "{\"Name\": \"throw\"}\n  throw indented";
        assert_eq!(strip_guard_lines(body), "{\"Name\": \"throw\"}  throw indented");
    }

    #[tokio::test]
    async fn test_guard_only_body_is_parse_error() {
        let transport = ScriptedTransport::new(|_| "throw new Error('denied');".to_string());
        let client = RallyClient::with_transport(config(), transport).unwrap();
        let url = client.service_root().join("iteration.js").unwrap();

        let result = client.get_json_document(&url).await;
        assert!(matches!(result, Err(RallyError::Parse(_))));
    }

    #[tokio::test]
    async fn test_guarded_body_parses() {
        let transport = ScriptedTransport::new(|_| {
            "throw new Error('guard');\n\
             {\"QueryResult\": {\"TotalResultCount\": 7, \"Results\": []}}"
                .to_string()
        });
        let client = RallyClient::with_transport(config(), transport).unwrap();

        let result = client
            .query(&ReportQuery::new("release"), PageWindow::COUNT)
            .await
            .unwrap();
        assert_eq!(result.total_result_count().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_transport_receives_credentials() {
        let transport = ScriptedTransport::new(|_| "{}".to_string());
        let log = transport.log();
        let client = RallyClient::with_transport(config(), transport).unwrap();
        let url = client.service_root().join("release.js").unwrap();

        client.get_document(&url).await.unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].username, "alice");
    }
}
