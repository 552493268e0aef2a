use crate::models::chat::{ChatMessage, Turn, TurnRole};

pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Derives the exact message list submitted to the completion service for
/// one request: fixed preamble, windowed history, then the new user text.
pub struct ContextBuilder {
    preamble: String,
    history_window: usize,
}

impl ContextBuilder {
    pub fn new(preamble: String, history_window: usize) -> Self {
        Self {
            preamble,
            history_window,
        }
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    pub fn default_preamble() -> String {
        "You are a helpful assistant. Always give short, simple, and direct answers. \
         Keep responses under 100 words. Pay attention to the conversation history \
         to maintain context."
            .to_string()
    }

    /// Build the request payload. `current_message` is the text just
    /// submitted by the user, not yet appended to the session log.
    pub fn build(&self, history: &[Turn], current_message: &str) -> Vec<ChatMessage> {
        let window_start = history.len().saturating_sub(self.history_window);
        let window = &history[window_start..];

        let mut messages = Vec::with_capacity(window.len() + 2);
        messages.push(ChatMessage::system(self.preamble.clone()));

        for turn in window {
            messages.push(match turn.role {
                TurnRole::User => ChatMessage::user(turn.content.clone()),
                TurnRole::Assistant => ChatMessage::assistant(turn.content.clone()),
            });
        }

        messages.push(ChatMessage::user(current_message));
        messages
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(Self::default_preamble(), DEFAULT_HISTORY_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alternating_history(len: usize) -> Vec<Turn> {
        (0..len)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::user(format!("turn {}", i))
                } else {
                    Turn::assistant(format!("turn {}", i))
                }
            })
            .collect()
    }

    #[test]
    fn test_empty_store_yields_preamble_and_message() {
        let builder = ContextBuilder::default();
        let messages = builder.build(&[], "Hi");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, ContextBuilder::default_preamble());
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "Hi");
    }

    #[test]
    fn test_short_history_is_fully_included() {
        let builder = ContextBuilder::default();
        let history = alternating_history(4);
        let messages = builder.build(&history, "next");

        // 1 preamble + 4 turns + 1 new message
        assert_eq!(messages.len(), 6);
        assert_eq!(messages[1].content, "turn 0");
        assert_eq!(messages[4].content, "turn 3");
        assert_eq!(messages[5].content, "next");
    }

    #[test]
    fn test_long_history_keeps_most_recent_window() {
        let builder = ContextBuilder::default();
        let history = alternating_history(12);
        let messages = builder.build(&history, "next");

        // 1 preamble + 10 windowed turns + 1 new message
        assert_eq!(messages.len(), 12);
        // The oldest two turns are dropped; order is preserved
        assert_eq!(messages[1].content, "turn 2");
        assert_eq!(messages[10].content, "turn 11");
        assert_eq!(messages[11].content, "next");
    }

    #[test]
    fn test_role_mapping_is_total_and_deterministic() {
        let builder = ContextBuilder::default();
        let history = alternating_history(6);
        let messages = builder.build(&history, "next");

        for (i, turn) in history.iter().enumerate() {
            let expected = match turn.role {
                TurnRole::User => "user",
                TurnRole::Assistant => "assistant",
            };
            assert_eq!(messages[i + 1].role, expected);
        }
    }

    #[test]
    fn test_context_preamble_is_system_role() {
        let builder = ContextBuilder::new("be brief".to_string(), 3);
        let messages = builder.build(&alternating_history(8), "next");

        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "be brief");
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1].content, "turn 5");
    }

    #[test]
    fn test_current_message_is_last_and_user_tagged() {
        let builder = ContextBuilder::default();
        let messages = builder.build(&alternating_history(3), "the question");

        let last = messages.last().unwrap();
        assert_eq!(last.role, "user");
        assert_eq!(last.content, "the question");
    }
}
