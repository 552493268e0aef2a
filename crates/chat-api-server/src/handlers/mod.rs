pub mod chat;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::services::conversation::ConversationManager;

pub fn build_router(manager: Arc<ConversationManager>) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let api_routes = Router::new()
        .route("/api/chat", post(chat::chat_handler))
        .route("/api/chat/history/{session_id}", get(chat::history_handler))
        .route("/api/chat/clear", post(chat::clear_handler))
        .route("/api/sessions/stats", get(chat::stats_handler))
        .layer(Extension(manager));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Static chat page
        .fallback_service(ServeDir::new("static"))
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        // Body limit (chat payloads only, no uploads)
        .layer(DefaultBodyLimit::max(64 * 1024))
}
