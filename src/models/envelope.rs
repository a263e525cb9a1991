//! The `QueryResult` envelope wrapping every listing response.

use serde::Deserialize;
use serde_json::Value;

use super::record::Record;
use crate::error::{RallyError, Result};

/// Top-level response document.
#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    #[serde(rename = "QueryResult")]
    query_result: Option<QueryResult>,
}

/// The body of a listing response.
///
/// Only the `QueryResult` object itself is required when decoding; the count
/// and results are validated by the accessor that needs them, so a count
/// request does not care whether `Results` is well formed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResult {
    #[serde(default)]
    total_result_count: Option<Value>,

    #[serde(default)]
    start_index: Option<Value>,

    #[serde(default)]
    page_size: Option<Value>,

    #[serde(default)]
    results: Option<Value>,

    #[serde(default)]
    errors: Option<Value>,

    #[serde(default)]
    warnings: Option<Value>,
}

impl QueryResult {
    /// Decode the envelope from a parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`RallyError::Protocol`] if the document has no `QueryResult`
    /// object, or if the service reported query errors.
    pub fn from_document(document: Value) -> Result<Self> {
        let envelope: QueryEnvelope = serde_json::from_value(document)
            .map_err(|e| RallyError::Protocol(format!("malformed query envelope: {e}")))?;

        let result = envelope
            .query_result
            .ok_or_else(|| RallyError::Protocol("response has no QueryResult".to_string()))?;

        let errors = messages(result.errors.as_ref());
        if !errors.is_empty() {
            return Err(RallyError::Protocol(format!(
                "query rejected: {}",
                errors.join("; ")
            )));
        }

        for warning in result.warnings() {
            tracing::warn!(warning = %warning, "Rally query warning");
        }

        Ok(result)
    }

    /// The total number of objects matching the query.
    pub fn total_result_count(&self) -> Result<u64> {
        match &self.total_result_count {
            None | Some(Value::Null) => Err(RallyError::Protocol(
                "QueryResult has no TotalResultCount".to_string(),
            )),
            Some(value) => value.as_u64().ok_or_else(|| {
                RallyError::Protocol(format!("TotalResultCount is not a count: {value}"))
            }),
        }
    }

    /// The total count, if the service reported a usable one.
    pub fn reported_total(&self) -> Option<u64> {
        self.total_result_count.as_ref().and_then(Value::as_u64)
    }

    /// 1-based index of the first result, as echoed by the service.
    pub fn start_index(&self) -> Option<u64> {
        self.start_index.as_ref().and_then(Value::as_u64)
    }

    /// Page size, as echoed by the service.
    pub fn page_size(&self) -> Option<u64> {
        self.page_size.as_ref().and_then(Value::as_u64)
    }

    /// Non-fatal messages from the service.
    pub fn warnings(&self) -> Vec<String> {
        messages(self.warnings.as_ref())
    }

    /// Flatten every result item into a [`Record`], in response order.
    ///
    /// # Errors
    ///
    /// Returns [`RallyError::Protocol`] if `Results` is missing, is not an
    /// array, or holds anything other than objects.
    pub fn records(&self) -> Result<Vec<Record>> {
        let results = match &self.results {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => {
                return Err(RallyError::Protocol("QueryResult has no Results".to_string()))
            }
            Some(_) => {
                return Err(RallyError::Protocol(
                    "QueryResult Results is not an array".to_string(),
                ))
            }
        };

        results
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(fields) => Ok(Record::from_json_object(fields)),
                _ => Err(RallyError::Protocol(format!(
                    "result {index} is not an object"
                ))),
            })
            .collect()
    }
}

/// Message strings from an `Errors`/`Warnings` list. Null or absent reads
/// as no messages; non-string entries are rendered as JSON.
fn messages(list: Option<&Value>) -> Vec<String> {
    match list {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}
