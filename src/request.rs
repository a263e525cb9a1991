//! Query targets for the object listing endpoint.

use url::Url;

use crate::error::{RallyError, Result};
use crate::pagination::PageWindow;

/// Which objects to list: a type, plus an optional workspace and filter.
///
/// # Example
///
/// ```
/// use rallyapi::ReportQuery;
///
/// let all_iterations = ReportQuery::new("iteration");
/// let open_defects = ReportQuery::new("defect")
///     .in_workspace("https://rally1.rallydev.com/slm/webservice/1.39/workspace/41529001")
///     .with_query("(State = \"Open\")");
/// # let _ = (all_iterations, open_defects);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    /// Object type, e.g. `iteration` or `release`.
    pub object_type: String,

    /// Workspace reference to scope the query to.
    pub workspace: Option<String>,

    /// Rally query expression, e.g. `(Name = "Sprint 4")`.
    pub query: Option<String>,
}

impl ReportQuery {
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            workspace: None,
            query: None,
        }
    }

    #[must_use]
    pub fn in_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    fn workspace_param(&self) -> &str {
        self.workspace.as_deref().unwrap_or_default()
    }

    /// The filter only travels with a workspace. Without one the service
    /// receives an empty `query` even when a filter was supplied.
    fn query_param(&self) -> &str {
        if self.workspace_param().is_empty() {
            ""
        } else {
            self.query.as_deref().unwrap_or_default()
        }
    }
}

/// Build the listing URL for one page window.
///
/// The object type becomes a single `{type}.js` path segment under the
/// service root, so separators and dot segments in it are percent-encoded
/// rather than interpreted. Parameters are always emitted in the order
/// `workspace`, `query`, `start`, `pagesize`, `fetch`; values are
/// percent-encoded.
///
/// # Errors
///
/// Returns [`RallyError::InvalidRequest`] if the object type is empty or the
/// service root cannot carry a path.
pub fn report_url(service_root: &Url, query: &ReportQuery, window: PageWindow) -> Result<Url> {
    let object_type = query.object_type.trim();
    if object_type.is_empty() {
        return Err(RallyError::InvalidRequest(
            "object type is required".to_string(),
        ));
    }

    let mut url = service_root.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| RallyError::InvalidRequest("service root cannot be a base".to_string()))?
        .pop_if_empty()
        .push(&format!("{object_type}.js"));

    url.query_pairs_mut()
        .append_pair("workspace", query.workspace_param())
        .append_pair("query", query.query_param())
        .append_pair("start", &window.start().to_string())
        .append_pair("pagesize", &window.page_size().to_string())
        .append_pair("fetch", "true");

    Ok(url)
}
