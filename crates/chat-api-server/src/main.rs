use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use chat_api_server::config::Settings;
use chat_api_server::handlers;
use chat_api_server::services::conversation::{ContextBuilder, ConversationManager};
use chat_api_server::services::LlmService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,chat_api_server=debug".to_string()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .init();

    info!("🚀 Starting chat API server...");

    // Load configuration
    let settings = Settings::load()?;
    info!("✅ Configuration loaded");

    let llm_service = LlmService::new(settings.llm.clone());

    let system_preamble = settings
        .chat
        .system_prompt
        .clone()
        .unwrap_or_else(ContextBuilder::default_preamble);

    let manager = Arc::new(ConversationManager::new(
        Box::new(llm_service),
        system_preamble,
        settings.chat.history_window,
    ));

    // Build router
    let app = handlers::build_router(manager);

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("🎯 Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
