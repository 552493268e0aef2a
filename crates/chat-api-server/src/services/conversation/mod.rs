//! Conversation memory management module
//!
//! Provides in-memory conversation state management with:
//! - Thread-safe session caching (DashMap)
//! - Append-only per-session turn logs
//! - Fixed-window context building for completion calls

mod cache;
mod context_builder;
pub mod manager;
pub mod types;

pub use cache::{CacheStats, ConversationCache};
pub use context_builder::{ContextBuilder, DEFAULT_HISTORY_WINDOW};
pub use manager::{ChatReply, ConversationManager, LlmProvider};
pub use types::ConversationState;

// Re-export common types for convenience; ChatMessage/Turn live in models
pub use crate::models::chat::{ChatMessage, SessionId, Turn, TurnRole};
