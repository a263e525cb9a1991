//! In-crate test doubles.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use url::Url;

use crate::config::Credentials;
use crate::error::Result;
use crate::transport::Transport;

/// One call seen by a [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct FetchCall {
    pub url: Url,
    pub username: String,
}

impl FetchCall {
    pub fn param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    pub fn start(&self) -> u64 {
        self.param("start").and_then(|s| s.parse().ok()).unwrap_or(0)
    }

    pub fn page_size(&self) -> u64 {
        self.param("pagesize").and_then(|s| s.parse().ok()).unwrap_or(0)
    }
}

type Responder = dyn Fn(&FetchCall) -> String + Send + Sync;

/// Transport answering from a closure and recording every call.
pub struct ScriptedTransport {
    respond: Box<Responder>,
    log: Arc<Mutex<Vec<FetchCall>>>,
}

impl ScriptedTransport {
    pub fn new(respond: impl Fn(&FetchCall) -> String + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serves `available` items while reporting `reported_total`, returning
    /// at most `max_page` items per request whatever page size was asked.
    pub fn paged(reported_total: u64, available: u64, max_page: u64) -> Self {
        Self::new(move |call| {
            let start = call.start();
            let end = (start + call.page_size().min(max_page)).min(available + 1);
            let results: Vec<_> = (start..end)
                .map(|n| {
                    json!({
                        "_ref": format!("https://host/slm/webservice/1.39/iteration/{n}.js"),
                        "Name": format!("Sprint {n}")
                    })
                })
                .collect();

            json!({
                "QueryResult": {
                    "TotalResultCount": reported_total,
                    "StartIndex": start,
                    "Results": results
                }
            })
            .to_string()
        })
    }

    pub fn log(&self) -> Arc<Mutex<Vec<FetchCall>>> {
        self.log.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, target: &Url, credentials: &Credentials) -> Result<String> {
        let call = FetchCall {
            url: target.clone(),
            username: credentials.username().to_string(),
        };
        let body = (self.respond)(&call);
        self.log.lock().expect("log poisoned").push(call);
        Ok(body)
    }
}
