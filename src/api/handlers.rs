//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    AttachmentUpload, ChatRequest, ChatResponse, ConversationListResponse, ConversationResponse,
    ErrorResponse, LoginRequest, SessionResponse,
};
use super::AppState;
use crate::runtime::{DispatchError, SseEvent};
use crate::state_machine::{Event, TransitionError};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session lifecycle
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/session", get(get_session))
        // Conversation listing
        .route("/api/conversations", get(list_conversations))
        // Conversation creation
        .route("/api/conversations/new", post(create_conversation))
        // Conversation retrieval
        .route("/api/conversations/:id", get(get_conversation))
        // Conversation actions
        .route("/api/conversations/:id/select", post(select_conversation))
        .route("/api/conversations/:id/delete", post(delete_conversation))
        // Messaging
        .route("/api/chat", post(send_chat))
        // SSE streaming
        .route("/api/stream", get(stream_session))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let Json(req) = payload?;
    let view = state
        .session
        .dispatch(Event::Login {
            username: req.username,
            password: req.password,
        })
        .await?;

    Ok(Json(SessionResponse { view }))
}

async fn logout(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    let view = state.session.dispatch(Event::Logout).await?;
    Ok(Json(SessionResponse { view }))
}

async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        view: state.session.snapshot(),
    })
}

// ============================================================
// Conversations
// ============================================================

async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<ConversationListResponse>, AppError> {
    let view = state.session.snapshot();
    if !view.is_logged_in() {
        return Err(TransitionError::NotLoggedIn.into());
    }

    Ok(Json(ConversationListResponse {
        active_conversation_id: view.active_conversation_id().map(String::from),
        conversations: view.conversations,
    }))
}

async fn create_conversation(
    State(state): State<AppState>,
) -> Result<Json<ConversationResponse>, AppError> {
    let view = state.session.dispatch(Event::CreateConversation).await?;
    let conversation = view
        .active_conversation
        .ok_or_else(|| AppError::Internal("New conversation was not activated".to_string()))?;

    Ok(Json(ConversationResponse { conversation }))
}

async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationResponse>, AppError> {
    let conversation = state
        .session
        .conversation(&id)
        .ok_or_else(|| AppError::NotFound(format!("Conversation not found: {id}")))?;

    Ok(Json(ConversationResponse { conversation }))
}

async fn select_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let view = state
        .session
        .dispatch(Event::SelectConversation {
            conversation_id: id,
        })
        .await?;

    Ok(Json(SessionResponse { view }))
}

async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let view = state
        .session
        .dispatch(Event::DeleteConversation {
            conversation_id: id,
        })
        .await?;

    Ok(Json(SessionResponse { view }))
}

// ============================================================
// Messaging
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = payload?;
    let attachments = req
        .attachments
        .into_iter()
        .map(AttachmentUpload::into_attachment)
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::BadRequest)?;

    let view = state
        .session
        .dispatch(Event::SendMessage {
            text: req.text,
            attachments,
        })
        .await?;

    // With no active conversation the send is ignored
    Ok(Json(ChatResponse {
        queued: view.active_conversation.is_some(),
        conversation: view.active_conversation,
    }))
}

// ============================================================
// SSE Streaming
// ============================================================

async fn stream_session(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe before reading the snapshot so no update falls in between
    let broadcast_rx = state.session.subscribe();
    let init = SseEvent::Init {
        view: state.session.snapshot(),
    };

    sse_stream(init, broadcast_rx)
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("archabot ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
    /// Body could not be extracted; keeps the extractor's status
    Rejected(StatusCode, String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        let message = e.to_string();
        match e {
            TransitionError::Validation(_) => AppError::BadRequest(message),
            TransitionError::InvalidCredentials => AppError::Unauthorized(message),
            TransitionError::UnknownConversation(_) => AppError::NotFound(message),
            TransitionError::NotLoggedIn | TransitionError::InvalidTransition(_) => {
                AppError::Conflict(message)
            }
        }
    }
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::Transition(e) => e.into(),
            DispatchError::RuntimeStopped => {
                tracing::error!("Session runtime is gone");
                AppError::Internal(DispatchError::RuntimeStopped.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Rejected(status, msg) => (status, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
