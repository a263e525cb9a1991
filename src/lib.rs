//! Rally API client library.
//!
//! A Rust library for pulling object reports out of the Rally Web Services
//! API. Objects of one type (iterations, releases, defects, ...) are listed
//! page by page and each one is flattened into an ordered [`Record`] of
//! strings: nulls become `""`, embedded references collapse to the object
//! id they point at, and long scalars are cut to 255 characters.
//!
//! # Quick Start
//!
//! ```no_run
//! use rallyapi::{List, RallyClient, Record, ReportQuery};
//!
//! #[tokio::main]
//! async fn main() -> rallyapi::Result<()> {
//!     // Create client from environment variables
//!     let client = RallyClient::from_env()?;
//!
//!     // Count the iterations
//!     let query = ReportQuery::new("iteration");
//!     let total = Record::count(&client, &query).await?;
//!     println!("{total} iterations");
//!
//!     // Fetch all of them
//!     let iterations = Record::list_all(&client, &query).await?;
//!     for iteration in &iterations {
//!         println!("{:?}", iteration.get("Name"));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `RALLY_USERNAME` (required) - Rally user name
//! - `RALLY_PASSWORD` (required) - Rally password
//! - `RALLY_HOST` (optional) - Host name (defaults to `rally1.rallydev.com`)
//! - `RALLY_API_VERSION` (optional) - API version (defaults to `1.39`)

pub mod cli;
mod client;
mod config;
mod error;
mod models;
pub mod output;
mod pagination;
mod request;
mod traits;
mod transport;

#[cfg(feature = "test-server")]
pub mod mock_server;

#[cfg(test)]
mod test_support;

// Re-export core types
pub use client::RallyClient;
pub use config::{Credentials, RallyConfig, DEFAULT_API_VERSION, DEFAULT_HOST};
pub use error::{RallyError, Result};
pub use pagination::{Page, PageWindow};
pub use request::{report_url, ReportQuery};
pub use transport::{HttpTransport, Transport};

// Re-export traits
pub use traits::{List, DEFAULT_PAGE_SIZE};

// Re-export models
pub use models::{reference_id, FieldValue, QueryResult, Record, MAX_VALUE_CHARS, REF_FIELD};

// Re-export convenience functions
pub use models::{get_report, get_report_page, get_report_total_count};
