//! HTTP transport.
//!
//! The [`Transport`] trait is the seam between the paging logic and the
//! network. [`HttpTransport`] is the reqwest-backed implementation used by
//! default; tests and callers with special needs (custom deadlines, caching)
//! can plug in their own.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use url::Url;

use crate::config::Credentials;
use crate::error::{RallyError, Result};

const USER_AGENT: &str = concat!("rallyapi/", env!("CARGO_PKG_VERSION"));

/// Performs one authenticated GET and returns the raw body text.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `target` using HTTP Basic `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`RallyError::Auth`] when the credentials are rejected and a
    /// transport error for connection failures or other non-success statuses.
    async fn fetch(&self, target: &Url, credentials: &Credentials) -> Result<String>;
}

/// reqwest-backed [`Transport`].
///
/// Credentials are sent preemptively on every request, whatever host, port
/// or realm the target names.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Create a transport with the default client settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(RallyError::Http)?;

        Ok(Self { http })
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RallyError::Auth {
                status_code: status.as_u16(),
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(RallyError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        Err(RallyError::Api {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, target, credentials), fields(url = %target))]
    async fn fetch(&self, target: &Url, credentials: &Credentials) -> Result<String> {
        let response = self
            .http
            .get(target.clone())
            .basic_auth(credentials.username(), Some(credentials.password()))
            .send()
            .await
            .map_err(RallyError::Http)?;

        let response = Self::check_response(response).await?;
        response.text().await.map_err(RallyError::Http)
    }
}
