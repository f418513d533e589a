//! Caller-owned conversation history.
//!
//! The accumulator hands finalized messages back here; it never reads or
//! mutates history itself.

use crate::types::messages::{Message, MessageParam};

/// Ordered message history for one session
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    session_id: String,
    messages: Vec<MessageParam>,
}

impl Conversation {
    /// Creates an empty history for the given session
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            messages: Vec::new(),
        }
    }

    /// Seeds the history with a system prompt
    #[must_use]
    pub fn with_system(mut self, instructions: impl Into<String>) -> Self {
        self.messages.insert(0, MessageParam::system(instructions));
        self
    }

    /// The session this history belongs to
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Appends a user message
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(MessageParam::user(content));
    }

    /// Appends a finalized assistant message, collapsed to plain text
    pub fn record(&mut self, message: &Message) {
        self.messages.push(MessageParam::assistant(
            message.plain_text(),
            message.stop_reason.clone(),
        ));
    }

    /// The ordered history, usable as input to the next turn
    #[must_use]
    pub fn messages(&self) -> &[MessageParam] {
        &self.messages
    }

    /// Number of messages in the history
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// `true` when the history holds no messages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::messages::{Block, BlockKind, Role, StopReason};

    #[test]
    fn system_prompt_comes_first() {
        let mut history = Conversation::new("s-1").with_system("Be friendly.");
        history.push_user("hi");
        assert_eq!(history.messages()[0].role, Role::System);
        assert_eq!(history.messages()[1].role, Role::User);
    }

    #[test]
    fn record_collapses_blocks_and_keeps_stop_reason() {
        let mut history = Conversation::new("s-1");
        history.push_user("what is 6 * 7?");
        history.record(&Message {
            role: Role::Assistant,
            content: vec![
                Block {
                    kind: BlockKind::ToolNotice,
                    content: "Tool wolfram_alpha was used.".into(),
                },
                Block {
                    kind: BlockKind::Text,
                    content: "42".into(),
                },
            ],
            stop_reason: StopReason::EndOfTurn,
        });

        let recorded = &history.messages()[1];
        assert_eq!(recorded.role, Role::Assistant);
        assert_eq!(recorded.content, "Tool wolfram_alpha was used. 42");
        assert_eq!(recorded.stop_reason, Some(StopReason::EndOfTurn));
    }
}
