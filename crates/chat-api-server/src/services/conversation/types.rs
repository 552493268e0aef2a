use std::time::Instant;

use crate::models::chat::{SessionId, Turn};

const SESSION_TTL_SECS: u64 = 6 * 60 * 60;

/// Complete conversation state for one session, stored in the memory cache
#[derive(Debug, Clone)]
pub struct ConversationState {
    /// Session identifier
    pub session_id: SessionId,

    /// Ordered turn log. Append-only except for a full clear.
    turns: Vec<Turn>,

    /// Session creation time (for 6-hour absolute expiration)
    pub created_at: Instant,

    /// Last activity timestamp (for monitoring)
    pub last_activity: Instant,

    /// Metadata for analytics
    pub metadata: ConversationMetadata,
}

impl ConversationState {
    /// Create new conversation session
    pub fn new(session_id: SessionId) -> Self {
        let now = Instant::now();
        Self {
            session_id,
            turns: Vec::new(),
            created_at: now,
            last_activity: now,
            metadata: ConversationMetadata::default(),
        }
    }

    /// Append a turn to the end of the log
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.metadata.total_turns += 1;
    }

    /// Discard the whole log. Idempotent; lifetime counters survive.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Read-only view of the log in insertion order
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    /// Check if session is expired (6 hours from creation)
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() > SESSION_TTL_SECS
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// Conversation metadata for analytics
#[derive(Debug, Clone, Default)]
pub struct ConversationMetadata {
    /// Turns appended over the session's lifetime (clear does not reset this)
    pub total_turns: usize,

    /// Replies that recorded a remote-call failure
    pub failed_replies: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let mut state = ConversationState::new(Uuid::new_v4());
        state.append(Turn::user("first"));
        state.append(Turn::assistant("second"));
        state.append(Turn::user("third"));

        let contents: Vec<&str> = state
            .snapshot()
            .iter()
            .map(|turn| turn.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_clear_empties_log() {
        let mut state = ConversationState::new(Uuid::new_v4());
        state.append(Turn::user("hello"));
        state.append(Turn::assistant("hi"));

        state.clear();
        assert!(state.snapshot().is_empty());

        // Idempotent
        state.clear();
        assert!(state.snapshot().is_empty());
    }

    #[test]
    fn test_append_after_clear() {
        let mut state = ConversationState::new(Uuid::new_v4());
        state.append(Turn::user("before"));
        state.clear();
        state.append(Turn::user("after"));

        assert_eq!(state.turn_count(), 1);
        assert_eq!(state.snapshot()[0].content, "after");
        // Lifetime counter keeps counting across clears
        assert_eq!(state.metadata.total_turns, 2);
    }

    #[test]
    fn test_fresh_session_not_expired() {
        let state = ConversationState::new(Uuid::new_v4());
        assert!(!state.is_expired());
    }
}
