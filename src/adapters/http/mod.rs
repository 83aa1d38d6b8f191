//! HTTP adapters - REST API implementations.

pub mod drafting;

pub use drafting::{api_router, DraftingHandlers};
