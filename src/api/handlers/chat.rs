use crate::{
    api::extract::AppJson,
    types::{
        AppError, ChatRequest, ChatResponse, MessageResponse, Result, SessionStatus,
        SummaryResponse,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};

/// Chat with the customer service assistant
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Chat response", body = ChatResponse),
        (status = 400, description = "Invalid input")
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let response = state.engine.run(payload).await?;
    Ok(Json(response))
}

/// Get a chat session's history
#[utoipa::path(
    get,
    path = "/api/chat/{session_id}",
    params(
        ("session_id" = String, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session status", body = SessionStatus),
        (status = 404, description = "Session not found")
    ),
    tag = "chat"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionStatus>> {
    state
        .sessions
        .status(&session_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Session '{}' not found", session_id)))
}

/// Clear a chat session
#[utoipa::path(
    delete,
    path = "/api/chat/{session_id}",
    params(
        ("session_id" = String, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session cleared", body = MessageResponse),
        (status = 404, description = "Session not found")
    ),
    tag = "chat"
)]
pub async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.sessions.clear(&session_id) {
        return Err(AppError::NotFound(format!(
            "Session '{}' not found",
            session_id
        )));
    }

    Ok(Json(MessageResponse {
        message: "Chat history cleared.".to_string(),
    }))
}

/// Summarize what the user said in a session
#[utoipa::path(
    post,
    path = "/api/chat/{session_id}/summary",
    params(
        ("session_id" = String, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Conversation summary", body = SummaryResponse),
        (status = 400, description = "Nothing to summarize"),
        (status = 404, description = "Session not found")
    ),
    tag = "chat"
)]
pub async fn summarize_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SummaryResponse>> {
    let summary = state.engine.summarize(&session_id).await?;
    Ok(Json(SummaryResponse {
        session_id,
        summary,
    }))
}
