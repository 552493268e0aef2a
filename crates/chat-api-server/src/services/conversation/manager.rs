use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::cache::{CacheStats, ConversationCache};
use super::context_builder::ContextBuilder;
use super::types::ConversationState;
use crate::models::chat::{ChatMessage, SessionId, Turn};

/// Trait for the completion service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Outcome of one chat interaction. A remote failure still produces a
/// reply, flagged so the presentation layer can style it.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub content: String,
    pub is_error: bool,
}

pub struct ConversationManager {
    cache: ConversationCache,
    context_builder: ContextBuilder,
    llm_provider: Box<dyn LlmProvider>,
}

impl ConversationManager {
    pub fn new(
        llm_provider: Box<dyn LlmProvider>,
        system_preamble: String,
        history_window: usize,
    ) -> Self {
        Self {
            cache: ConversationCache::new(),
            context_builder: ContextBuilder::new(system_preamble, history_window),
            llm_provider,
        }
    }

    /// Handle one user message: build the windowed context from the state
    /// as it was before this message, call the model, then append the
    /// user/assistant pair so the log stays pairwise consistent.
    pub async fn handle_message(&self, session_id: SessionId, message: String) -> ChatReply {
        let mut state = self.get_or_create_session(session_id);

        let llm_messages = self.context_builder.build(state.snapshot(), &message);
        debug!(
            "Session {}: dispatching {} messages to completion service",
            session_id,
            llm_messages.len()
        );

        let reply = match self.llm_provider.generate(&llm_messages).await {
            Ok(content) => ChatReply {
                content,
                is_error: false,
            },
            Err(e) => {
                warn!("Completion call failed for session {}: {:#}", session_id, e);
                ChatReply {
                    content: format!("Error: {:#}", e),
                    is_error: true,
                }
            }
        };

        state.append(Turn::user(message));
        state.append(Turn::assistant(reply.content.clone()));
        if reply.is_error {
            state.metadata.failed_replies += 1;
        }
        state.touch();
        self.cache.set(session_id, state);

        reply
    }

    /// Ordered turn log for the renderer. Unknown or expired sessions read
    /// as empty.
    pub fn history(&self, session_id: SessionId) -> Vec<Turn> {
        self.cache
            .get(session_id)
            .map(|state| state.snapshot().to_vec())
            .unwrap_or_default()
    }

    /// Discard a session's log. Idempotent; clearing an unknown session is
    /// a no-op.
    pub fn clear(&self, session_id: SessionId) {
        if let Some(mut state) = self.cache.get(session_id) {
            state.clear();
            state.touch();
            self.cache.set(session_id, state);
            info!("Cleared conversation history for session {}", session_id);
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cleanup_expired_sessions(&self) -> usize {
        self.cache.cleanup_expired()
    }

    fn get_or_create_session(&self, session_id: SessionId) -> ConversationState {
        if let Some(state) = self.cache.get(session_id) {
            return state;
        }

        info!("Session created: {}", session_id);
        ConversationState::new(session_id)
    }
}
