use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::models::chat::{ChatRequest, ChatResponse, ClearRequest, HistoryResponse, SessionId};
use crate::services::conversation::{CacheStats, ConversationManager};
use crate::utils::error::ApiError;

pub async fn chat_handler(
    Extension(manager): Extension<Arc<ConversationManager>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let start_time = Instant::now();

    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message must not be empty".to_string()));
    }

    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);

    info!(
        "Chat request: session={}, message_len={}",
        session_id,
        message.len()
    );

    let reply = manager.handle_message(session_id, message.to_string()).await;

    Ok(Json(ChatResponse {
        session_id,
        reply: reply.content,
        is_error: reply.is_error,
        processing_time_ms: start_time.elapsed().as_millis() as u64,
    }))
}

pub async fn history_handler(
    Extension(manager): Extension<Arc<ConversationManager>>,
    Path(session_id): Path<SessionId>,
) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        session_id,
        turns: manager.history(session_id),
    })
}

pub async fn clear_handler(
    Extension(manager): Extension<Arc<ConversationManager>>,
    Json(request): Json<ClearRequest>,
) -> StatusCode {
    manager.clear(request.session_id);
    StatusCode::NO_CONTENT
}

pub async fn stats_handler(
    Extension(manager): Extension<Arc<ConversationManager>>,
) -> Json<CacheStats> {
    Json(manager.cache_stats())
}
