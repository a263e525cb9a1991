//! Mock Rally web service for E2E testing.
//!
//! This module provides an in-memory server that answers object listing
//! queries the way Rally does: a `QueryResult` envelope, 1-based `start`
//! offsets, HTTP Basic authentication and the optional script guard line.
//! Unlike wiremock, which mocks per request, the server keeps its objects
//! and a log of the queries it has seen across requests.
//!
//! # Example
//!
//! ```ignore
//! use rallyapi::mock_server::MockServer;
//! use rallyapi::{get_report, RallyClient, ReportQuery};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = RallyClient::new(server.url(), "1.39", "user", "pass").unwrap();
//!
//!     // Server comes with default fixtures
//!     let iterations = get_report(&client, &ReportQuery::new("iteration")).await.unwrap();
//!     assert_eq!(iterations.len(), 120);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::Fixtures;
pub use server::MockServer;
pub use state::{MockState, RecordedQuery};
