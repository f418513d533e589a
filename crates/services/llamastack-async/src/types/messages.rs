use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System instructions
    System,
    /// End-user input
    User,
    /// Model output
    Assistant,
    /// Tool result fed back to the model
    Tool,
}

/// Why the assistant stopped generating
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The model finished its turn
    #[default]
    EndOfTurn,
    /// The model finished one message of a multi-message turn
    EndOfMessage,
    /// Generation hit the token budget
    OutOfTokens,
    /// Stop reason the client does not recognize
    #[serde(other)]
    Unknown,
}

/// An input message, as sent to the service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageParam {
    /// Message role
    pub role: Role,
    /// Plain-text content
    pub content: String,
    /// Stop reason; only meaningful on recorded assistant messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
}

impl MessageParam {
    /// A system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            stop_reason: None,
        }
    }

    /// A user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            stop_reason: None,
        }
    }

    /// An assistant message with a stop reason, as appended to history
    #[must_use]
    pub fn assistant(content: impl Into<String>, stop_reason: StopReason) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            stop_reason: Some(stop_reason),
        }
    }
}

/// Source kind of one contiguous span of accumulated assistant output
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Streamed assistant text
    Text,
    /// Human-readable note that a tool ran
    ToolNotice,
    /// Human-readable note about a shield outcome
    SafetyNotice,
}

/// A contiguous, single-kind span of assistant output
///
/// Blocks are append-only: content grows only by appending, and a closed
/// block is never reopened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    /// What produced this span
    pub kind: BlockKind,
    /// Accumulated content
    pub content: String,
}

/// Incremental render update emitted after applying one event
///
/// Carries the full current content of the affected block, not just the
/// delta, so a UI can re-render the bubble idempotently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockUpdate {
    /// Ordinal of the block within the turn (stable across updates)
    pub index: usize,
    /// Block kind
    pub kind: BlockKind,
    /// Full content of the block so far
    pub content: String,
}

/// A finalized assistant message produced by a completed turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Always [`Role::Assistant`] for accumulated turns
    pub role: Role,
    /// Ordered blocks, as accumulated
    pub content: Vec<Block>,
    /// Why the turn ended
    pub stop_reason: StopReason,
}

impl Message {
    /// Collapses the block sequence to a plain-text history entry.
    ///
    /// Blank blocks are dropped; the rest are joined with single spaces.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let parts: Vec<&str> = self
            .content
            .iter()
            .map(|b| b.content.trim())
            .filter(|s| !s.is_empty())
            .collect();
        parts.join(" ")
    }
}

/// Request to create a turn within a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnCreateRequest {
    /// New input messages for this turn (history lives server-side per session)
    pub messages: Vec<MessageParam>,
    /// Whether to stream the response; set automatically by the resource methods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl TurnCreateRequest {
    /// A request carrying a single user message
    #[must_use]
    pub fn from_user(content: impl Into<String>) -> Self {
        Self {
            messages: vec![MessageParam::user(content)],
            stream: None,
        }
    }
}

/// Non-streaming turn response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnResponse {
    /// Server-assigned turn identifier
    pub turn_id: String,
    /// The assistant's complete output message
    pub output_message: MessageParam,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_joins_blocks() {
        let msg = Message {
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
        };
        assert_eq!(msg.plain_text(), "Tool wolfram_alpha was used. 42");
    }

    #[test]
    fn plain_text_drops_blank_blocks() {
        let msg = Message {
            role: Role::Assistant,
            content: vec![
                Block {
                    kind: BlockKind::Text,
                    content: "  ".into(),
                },
                Block {
                    kind: BlockKind::Text,
                    content: "hello".into(),
                },
            ],
            stop_reason: StopReason::EndOfTurn,
        };
        assert_eq!(msg.plain_text(), "hello");
    }

    #[test]
    fn stop_reason_unknown_round_trip() {
        let parsed: StopReason = serde_json::from_str(r#""some_future_reason""#).unwrap();
        assert_eq!(parsed, StopReason::Unknown);
        let parsed: StopReason = serde_json::from_str(r#""end_of_turn""#).unwrap();
        assert_eq!(parsed, StopReason::EndOfTurn);
    }

    #[test]
    fn turn_request_ser_skips_absent_stream() {
        let req = TurnCreateRequest::from_user("hi");
        let s = serde_json::to_string(&req).unwrap();
        assert!(s.contains(r#""role":"user""#));
        assert!(!s.contains("stream"));
        assert!(!s.contains("stop_reason"));
    }
}
