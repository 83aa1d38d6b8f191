//! Web Search Port - Interface for the external search engine.
//!
//! Used by the drafting agent's legal research tool. Implementations return
//! a plain-text digest of results suitable for inclusion in a prompt.

use async_trait::async_trait;

/// Errors from a web search backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(String),

    #[error("search returned status {status}")]
    Status { status: u16 },

    #[error("could not read search results: {0}")]
    Parse(String),
}

/// Port for running web searches.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Runs a query and returns a plain-text summary of the results.
    async fn search(&self, query: &str) -> Result<String, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_shows_code() {
        assert_eq!(
            SearchError::Status { status: 503 }.to_string(),
            "search returned status 503"
        );
    }
}
