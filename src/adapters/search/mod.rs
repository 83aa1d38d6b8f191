//! Web search adapters.

mod duckduckgo;

pub use duckduckgo::{DuckDuckGoSearch, DEFAULT_SEARCH_URL, NO_RESULTS};
