//! Conversation handlers: list, history, staff reply, mark-as-read.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use gymdesk_types::chat::{ChatMessage, ConversationSummary};

use crate::http::error::AppError;
use crate::http::extractors::auth::StaffSession;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MarkReadView {
    pub success: bool,
    pub updated: u64,
}

/// GET /api/v1/conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    _staff: StaffSession,
) -> Result<Json<ApiResponse<Vec<ConversationSummary>>>, AppError> {
    let timer = RequestTimer::start();
    let summaries = state.read_state.unread_by_conversation().await?;
    Ok(Json(timer.respond(summaries)))
}

/// GET /api/v1/conversations/{user_id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let timer = RequestTimer::start();
    let messages = state.conversations.history(&user_id, query.limit).await?;
    Ok(Json(timer.respond(messages).with_link(
        "read",
        format!("/api/v1/conversations/{user_id}/read"),
    )))
}

/// POST /api/v1/conversations/{user_id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    StaffSession(staff): StaffSession,
    Path(user_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<ChatMessage>>, AppError> {
    let timer = RequestTimer::start();
    let message = state
        .conversations
        .send_staff_message(&user_id, &body.text)
        .await?;
    tracing::info!(staff_id = %staff.id, user_id = %user_id, "staff reply sent");
    Ok(Json(timer.respond(message)))
}

/// POST /api/v1/conversations/{user_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<MarkReadView>>, AppError> {
    let timer = RequestTimer::start();
    let updated = state.read_state.mark_messages_as_read(&user_id).await?;
    Ok(Json(timer.respond(MarkReadView {
        success: true,
        updated,
    })))
}
