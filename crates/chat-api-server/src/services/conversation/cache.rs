use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::types::ConversationState;
use crate::models::chat::SessionId;

/// Thread-safe in-memory conversation cache
/// Uses DashMap for lock-free concurrent access
#[derive(Clone)]
pub struct ConversationCache {
    /// Session storage: session_id -> ConversationState
    storage: Arc<DashMap<SessionId, ConversationState>>,
}

impl ConversationCache {
    /// Create new cache instance
    pub fn new() -> Self {
        info!("Initializing conversation cache with DashMap");
        Self {
            storage: Arc::new(DashMap::new()),
        }
    }

    /// Get conversation state by session_id
    /// Returns None if not found or expired
    pub fn get(&self, session_id: SessionId) -> Option<ConversationState> {
        let entry = self.storage.get(&session_id)?;
        let state = entry.value().clone();

        // Check expiration (lazy deletion)
        if state.is_expired() {
            drop(entry); // Release read lock
            self.remove(session_id);
            debug!("Session {} expired, removed from cache", session_id);
            return None;
        }

        Some(state)
    }

    /// Insert or update conversation state
    pub fn set(&self, session_id: SessionId, state: ConversationState) {
        self.storage.insert(session_id, state);
        debug!("Updated session {} in cache", session_id);
    }

    /// Remove conversation from cache
    pub fn remove(&self, session_id: SessionId) -> Option<ConversationState> {
        self.storage.remove(&session_id).map(|(_, state)| state)
    }

    /// Get number of active sessions
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Cleanup expired sessions (manual trigger)
    /// Returns number of sessions removed
    pub fn cleanup_expired(&self) -> usize {
        let start_len = self.storage.len();
        self.storage
            .retain(|_, state: &mut ConversationState| !state.is_expired());
        let end_len = self.storage.len();

        let count = start_len.saturating_sub(end_len);

        if count > 0 {
            info!("Cleaned up {} expired sessions", count);
        }

        count
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        let mut stored_turns = 0;
        let mut failed_replies = 0;
        for entry in self.storage.iter() {
            stored_turns += entry.value().turn_count();
            failed_replies += entry.value().metadata.failed_replies;
        }

        CacheStats {
            active_sessions: self.len(),
            stored_turns,
            failed_replies,
        }
    }
}

impl Default for ConversationCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub active_sessions: usize,
    pub stored_turns: usize,
    pub failed_replies: usize,
}
