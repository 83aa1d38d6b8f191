//! HTTP handlers for drafting endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::{
    ConfirmDetailsCommand, ConfirmDetailsHandler, ConversationEngine, CreateSessionHandler,
    DeleteSessionHandler, DraftingError, EditDraftCommand, EditDraftHandler, ExportDocumentHandler, GetSessionDetailsHandler,
    GetSessionHandler, ListSessionsHandler, Operation, SubmitMessageCommand,
    SubmitMessageHandler,
};
use crate::domain::document::format;
use crate::domain::foundation::ChatSessionId;
use crate::ports::SessionStore;

use super::dto::{
    history_contents, history_to_messages, ConfirmDetailsRequest, DetailsResponse,
    DocumentResponse, EditDraftRequest, ErrorResponse, ExtractDetailsRequest, FormatRequest,
    GenerateRequest, RefineRequest, ResultResponse, SessionDetailsResponse, SessionListResponse,
    SessionResponse, SubmitMessageRequest, SubmitMessageResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DraftingHandlers {
    create_handler: Arc<CreateSessionHandler>,
    list_handler: Arc<ListSessionsHandler>,
    get_handler: Arc<GetSessionHandler>,
    delete_handler: Arc<DeleteSessionHandler>,
    submit_handler: Arc<SubmitMessageHandler>,
    edit_handler: Arc<EditDraftHandler>,
    details_handler: Arc<GetSessionDetailsHandler>,
    confirm_details_handler: Arc<ConfirmDetailsHandler>,
    export_handler: Arc<ExportDocumentHandler>,
    engine: ConversationEngine,
}

impl DraftingHandlers {
    /// Builds every handler over one store and engine.
    pub fn new(store: Arc<dyn SessionStore>, engine: ConversationEngine) -> Self {
        Self {
            create_handler: Arc::new(CreateSessionHandler::new(store.clone())),
            list_handler: Arc::new(ListSessionsHandler::new(store.clone())),
            get_handler: Arc::new(GetSessionHandler::new(store.clone())),
            delete_handler: Arc::new(DeleteSessionHandler::new(store.clone())),
            submit_handler: Arc::new(SubmitMessageHandler::new(store.clone(), engine.clone())),
            edit_handler: Arc::new(EditDraftHandler::new(store.clone())),
            details_handler: Arc::new(GetSessionDetailsHandler::new(store.clone())),
            confirm_details_handler: Arc::new(ConfirmDetailsHandler::new(store.clone())),
            export_handler: Arc::new(ExportDocumentHandler::new(store)),
            engine,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Session endpoints
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions - Create a new session
pub async fn create_session(State(handlers): State<DraftingHandlers>) -> Response {
    match handlers.create_handler.handle().await {
        Ok(session) => {
            (StatusCode::CREATED, Json(SessionResponse::from(&session))).into_response()
        }
        Err(e) => handle_drafting_error(e),
    }
}

/// GET /api/sessions - List sessions, most recent first
pub async fn list_sessions(State(handlers): State<DraftingHandlers>) -> Response {
    match handlers.list_handler.handle().await {
        Ok(summaries) => {
            (StatusCode::OK, Json(SessionListResponse::from(summaries))).into_response()
        }
        Err(e) => handle_drafting_error(e),
    }
}

/// GET /api/sessions/:id - Get a session with its messages and draft
pub async fn get_session(
    State(handlers): State<DraftingHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(session_id).await {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => handle_drafting_error(e),
    }
}

/// DELETE /api/sessions/:id - Delete a session
pub async fn delete_session(
    State(handlers): State<DraftingHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.delete_handler.handle(session_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_drafting_error(e),
    }
}

/// POST /api/sessions/:id/messages - Submit a user turn
pub async fn submit_message(
    State(handlers): State<DraftingHandlers>,
    Path(session_id): Path<String>,
    Json(req): Json<SubmitMessageRequest>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = SubmitMessageCommand::new(session_id, req.content);
    match handlers.submit_handler.handle(cmd).await {
        Ok(result) => {
            (StatusCode::OK, Json(SubmitMessageResponse::from(result))).into_response()
        }
        Err(e) => handle_drafting_error(e),
    }
}

/// PUT /api/sessions/:id/draft - Replace the draft with edited text
pub async fn edit_draft(
    State(handlers): State<DraftingHandlers>,
    Path(session_id): Path<String>,
    Json(req): Json<EditDraftRequest>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = EditDraftCommand {
        session_id,
        text: req.text,
    };
    match handlers.edit_handler.handle(cmd).await {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => handle_drafting_error(e),
    }
}

/// GET /api/sessions/:id/details - Confirmed details, or those extracted from the history
pub async fn get_session_details(
    State(handlers): State<DraftingHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.details_handler.handle(session_id).await {
        Ok(details) => {
            (StatusCode::OK, Json(SessionDetailsResponse::from(details))).into_response()
        }
        Err(e) => handle_drafting_error(e),
    }
}

/// PUT /api/sessions/:id/details - Store corrected details and the verification tick
pub async fn confirm_session_details(
    State(handlers): State<DraftingHandlers>,
    Path(session_id): Path<String>,
    Json(req): Json<ConfirmDetailsRequest>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = ConfirmDetailsCommand {
        session_id,
        details: req.details,
        verified: req.verified,
    };
    match handlers.confirm_details_handler.handle(cmd).await {
        Ok(details) => {
            (StatusCode::OK, Json(SessionDetailsResponse::from(details))).into_response()
        }
        Err(e) => handle_drafting_error(e),
    }
}

/// GET /api/sessions/:id/document - Formatted draft for export
pub async fn export_document(
    State(handlers): State<DraftingHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.export_handler.handle(session_id).await {
        Ok(doc) => (StatusCode::OK, Json(DocumentResponse::from(doc))).into_response(),
        Err(e) => handle_drafting_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Stateless AI endpoints
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/ai/generate - One drafting call over supplied history
pub async fn generate(
    State(handlers): State<DraftingHandlers>,
    Json(req): Json<GenerateRequest>,
) -> Response {
    let history = history_to_messages(req.conversation_history);

    match handlers.engine.generate(&req.prompt, history).await {
        Ok(outcome) => (StatusCode::OK, Json(ResultResponse::from(outcome))).into_response(),
        Err(e) => handle_drafting_error(e),
    }
}

/// POST /api/ai/refine - Refine a supplied draft
pub async fn refine(
    State(handlers): State<DraftingHandlers>,
    Json(req): Json<RefineRequest>,
) -> Response {
    match handlers
        .engine
        .refine(&req.current_draft, &req.user_request)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(ResultResponse { result })).into_response(),
        Err(e) => handle_drafting_error(e),
    }
}

/// POST /api/ai/extract-details - Extract details from supplied history
pub async fn extract_details(
    State(handlers): State<DraftingHandlers>,
    Json(req): Json<ExtractDetailsRequest>,
) -> Response {
    let details = handlers
        .engine
        .extract_details(history_contents(&req.conversation_history));
    (StatusCode::OK, Json(DetailsResponse { details })).into_response()
}

/// POST /api/ai/format - Lay out raw document text
pub async fn format_document(Json(req): Json<FormatRequest>) -> Response {
    let result = format(&req.text);
    (StatusCode::OK, Json(ResultResponse { result })).into_response()
}

/// GET /api/ai/health - Agent configuration status
pub async fn health(State(handlers): State<DraftingHandlers>) -> Response {
    (StatusCode::OK, Json(handlers.engine.health())).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_session_id(raw: &str) -> Result<ChatSessionId, Response> {
    raw.parse::<ChatSessionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session ID")),
        )
            .into_response()
    })
}

/// HTTP status for a drafting error.
pub fn status_for(error: &DraftingError) -> StatusCode {
    match error {
        DraftingError::Validation { .. } => StatusCode::BAD_REQUEST,
        DraftingError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        DraftingError::InvalidState { .. } => StatusCode::CONFLICT,
        DraftingError::MissingCredential { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DraftingError::AgentInvocation { .. } => StatusCode::BAD_GATEWAY,
        DraftingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn handle_drafting_error(error: DraftingError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        error!(code = %error.code(), error = %error, "Drafting request failed");
    }

    let mut body = ErrorResponse::new(error.code().to_string(), error.to_string());
    if let Some(operation) = error.operation() {
        body = body.with_details(serde_json::json!({ "operation": operation.to_string() }));
    }
    (status, Json(body)).into_response()
}
