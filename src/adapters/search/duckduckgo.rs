//! DuckDuckGo search backend.
//!
//! Uses the Instant Answer API (`format=json`), which needs no key. The
//! abstract, heading and related topics are flattened into a plain-text digest.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::ports::{SearchError, WebSearch};

pub const DEFAULT_SEARCH_URL: &str = "https://api.duckduckgo.com";

/// Returned when a query produced nothing usable.
pub const NO_RESULTS: &str = "No results found";

/// Cap on related topics included in a digest.
const MAX_TOPICS: usize = 8;

/// Web search over the DuckDuckGo Instant Answer API.
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    base_url: String,
}

impl DuckDuckGoSearch {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<String, SearchError> {
        let url = format!("{}/", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(SearchError::Status { status });
        }

        // The API serves JSON as application/x-javascript, so decode the text.
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;
        let answer: InstantAnswer =
            serde_json::from_str(&body).map_err(|e| SearchError::Parse(e.to_string()))?;

        let digest = answer.digest();
        debug!(query = %query, digest_len = digest.len(), "Search complete");
        Ok(digest)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    heading: String,
    #[serde(default)]
    abstract_text: String,
    #[serde(default, rename = "AbstractURL")]
    abstract_url: String,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

/// Either a single result or a named group of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Result {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
}

impl RelatedTopic {
    fn collect_into<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        match self {
            RelatedTopic::Result { text, first_url } => {
                if !text.trim().is_empty() {
                    out.push((text.as_str(), first_url.as_str()));
                }
            }
            RelatedTopic::Group { topics } => {
                for topic in topics {
                    topic.collect_into(out);
                }
            }
        }
    }
}

impl InstantAnswer {
    fn digest(&self) -> String {
        let mut lines = Vec::new();

        if !self.abstract_text.trim().is_empty() {
            let title = if self.heading.trim().is_empty() {
                "Summary"
            } else {
                self.heading.trim()
            };
            lines.push(format!("{}: {}", title, self.abstract_text.trim()));
            if !self.abstract_url.is_empty() {
                lines.push(format!("Source: {}", self.abstract_url));
            }
        }

        let mut topics = Vec::new();
        for topic in &self.related_topics {
            topic.collect_into(&mut topics);
        }
        for (text, url) in topics.into_iter().take(MAX_TOPICS) {
            if url.is_empty() {
                lines.push(format!("- {}", text));
            } else {
                lines.push(format!("- {} ({})", text, url));
            }
        }

        if lines.is_empty() {
            NO_RESULTS.to_string()
        } else {
            lines.join("\n")
        }
    }
}
