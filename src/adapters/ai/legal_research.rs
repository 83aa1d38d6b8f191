//! Legal research tool exposed to the drafting model.
//!
//! Wraps a [`WebSearch`] backend, restricts queries to Canadian legal
//! sources, and never fails: search errors are returned to the model as text
//! so the conversation can continue.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::drafting::LEGAL_SEARCH_TOOL;
use crate::ports::WebSearch;

/// Suffix restricting every query to Canadian legal sources.
pub const SITE_SCOPE: &str = " site:canlii.org OR site:justice.gc.ca";

/// Prefix of the text returned when a search fails.
pub const SEARCH_ERROR_PREFIX: &str = "An error occurred during the search: ";

const TOOL_DESCRIPTION: &str = "Use this tool to search the web for Canadian legal information, including statutes and case law. It is focused on official government and legal institute sources.";

const QUERY_DESCRIPTION: &str =
    "A detailed search query to find information on Canadian legal topics.";

#[derive(Debug, Deserialize)]
struct SearchArguments {
    query: String,
}

/// Appends the site restriction to a query.
pub fn scoped_query(query: &str) -> String {
    format!("{}{}", query, SITE_SCOPE)
}

/// The `Legal_Web_Search` tool.
#[derive(Clone)]
pub struct LegalResearchTool {
    search: Arc<dyn WebSearch>,
}

impl LegalResearchTool {
    pub fn new(search: Arc<dyn WebSearch>) -> Self {
        Self { search }
    }

    /// Tool name as presented to the model.
    pub fn name(&self) -> &'static str {
        LEGAL_SEARCH_TOOL
    }

    /// OpenAI-compatible function definition.
    pub fn definition(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": LEGAL_SEARCH_TOOL,
                "description": TOOL_DESCRIPTION,
                "parameters": {
                    "type": "object",
                    "required": ["query"],
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": QUERY_DESCRIPTION
                        }
                    }
                }
            }
        })
    }

    /// Runs the tool with raw JSON arguments from the model.
    pub async fn call(&self, arguments: &str) -> String {
        match serde_json::from_str::<SearchArguments>(arguments) {
            Ok(args) => self.search(&args.query).await,
            Err(e) => format!("{}invalid arguments: {}", SEARCH_ERROR_PREFIX, e),
        }
    }

    /// Searches with the site restriction applied.
    pub async fn search(&self, query: &str) -> String {
        let scoped = scoped_query(query);
        info!(query = %query, "Running legal research search");

        match self.search.search(&scoped).await {
            Ok(results) => results,
            Err(e) => {
                warn!(query = %query, error = %e, "Legal research search failed");
                format!("{}{}", SEARCH_ERROR_PREFIX, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::SearchError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingSearch {
        queries: Mutex<Vec<String>>,
        result: Result<String, SearchError>,
    }

    impl RecordingSearch {
        fn returning(result: Result<String, SearchError>) -> Arc<Self> {
            Arc::new(Self {
                queries: Mutex::new(Vec::new()),
                result,
            })
        }
    }

    #[async_trait]
    impl WebSearch for RecordingSearch {
        async fn search(&self, query: &str) -> Result<String, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.result.clone()
        }
    }

    #[test]
    fn scoped_query_appends_site_restriction() {
        assert_eq!(
            scoped_query("Ontario lease termination"),
            "Ontario lease termination site:canlii.org OR site:justice.gc.ca"
        );
    }

    #[tokio::test]
    async fn search_sends_scoped_query() {
        let backend = RecordingSearch::returning(Ok("results".to_string()));
        let tool = LegalResearchTool::new(backend.clone());

        let out = tool.search("notice period").await;

        assert_eq!(out, "results");
        assert_eq!(
            backend.queries.lock().unwrap()[0],
            "notice period site:canlii.org OR site:justice.gc.ca"
        );
    }

    #[tokio::test]
    async fn search_failure_degrades_to_text() {
        let backend = RecordingSearch::returning(Err(SearchError::Status { status: 503 }));
        let tool = LegalResearchTool::new(backend);

        let out = tool.search("anything").await;

        assert_eq!(
            out,
            "An error occurred during the search: search returned status 503"
        );
    }

    #[tokio::test]
    async fn call_parses_json_arguments() {
        let backend = RecordingSearch::returning(Ok("ok".to_string()));
        let tool = LegalResearchTool::new(backend.clone());

        let out = tool.call(r#"{"query": "privacy act"}"#).await;

        assert_eq!(out, "ok");
        assert!(backend.queries.lock().unwrap()[0].starts_with("privacy act site:"));
    }

    #[tokio::test]
    async fn call_with_bad_arguments_reports_error_text() {
        let backend = RecordingSearch::returning(Ok("unused".to_string()));
        let tool = LegalResearchTool::new(backend.clone());

        let out = tool.call("not json").await;

        assert!(out.starts_with(SEARCH_ERROR_PREFIX));
        assert!(backend.queries.lock().unwrap().is_empty());
    }

    #[test]
    fn definition_uses_openai_function_format() {
        let tool = LegalResearchTool::new(RecordingSearch::returning(Ok(String::new())));
        let def = tool.definition();
        assert_eq!(def["type"], "function");
        assert_eq!(def["function"]["name"], "Legal_Web_Search");
        assert_eq!(def["function"]["parameters"]["required"][0], "query");
    }
}
