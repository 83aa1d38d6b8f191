//! Axum router configuration for drafting endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    confirm_session_details, create_session, delete_session, edit_draft, export_document,
    extract_details, format_document, generate, get_session, get_session_details, health,
    list_sessions, refine, submit_message, DraftingHandlers,
};

/// Session endpoints, suitable for mounting at `/api/sessions`.
///
/// # Routes
///
/// - `POST /` - Create a session
/// - `GET /` - List sessions
/// - `GET /:id` - Get a session
/// - `DELETE /:id` - Delete a session
/// - `POST /:id/messages` - Submit a user turn
/// - `PUT /:id/draft` - Replace the draft
/// - `GET /:id/details` - Confirmed details, or those extracted from the history
/// - `PUT /:id/details` - Store corrected details and the verification tick
/// - `GET /:id/document` - Formatted draft for export, once details are verified
pub fn session_routes() -> Router<DraftingHandlers> {
    Router::new()
        .route("/", post(create_session).get(list_sessions))
        .route("/:id", get(get_session).delete(delete_session))
        .route("/:id/messages", post(submit_message))
        .route("/:id/draft", put(edit_draft))
        .route(
            "/:id/details",
            get(get_session_details).put(confirm_session_details),
        )
        .route("/:id/document", get(export_document))
}

/// Stateless AI endpoints, suitable for mounting at `/api/ai`.
///
/// # Routes
///
/// - `POST /generate` - One drafting call over supplied history
/// - `POST /refine` - Refine a supplied draft
/// - `POST /extract-details` - Extract details from supplied history
/// - `POST /format` - Lay out raw document text
/// - `GET /health` - Agent configuration status
pub fn ai_routes() -> Router<DraftingHandlers> {
    Router::new()
        .route("/generate", post(generate))
        .route("/refine", post(refine))
        .route("/extract-details", post(extract_details))
        .route("/format", post(format_document))
        .route("/health", get(health))
}

/// The complete API under `/api`.
///
/// # Example
///
/// ```ignore
/// let handlers = DraftingHandlers::new(store, engine);
/// let app = api_router(handlers);
/// ```
pub fn api_router(handlers: DraftingHandlers) -> Router {
    Router::new()
        .nest("/api/sessions", session_routes())
        .nest("/api/ai", ai_routes())
        .with_state(handlers)
}
