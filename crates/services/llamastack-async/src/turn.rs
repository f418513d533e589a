//! The streaming turn accumulator.
//!
//! Folds an in-order sequence of [`TurnEvent`]s into (a) live
//! [`BlockUpdate`]s for a UI and (b) one finalized assistant [`Message`] to
//! append to conversation history. One accumulator serves exactly one turn;
//! concurrent turns each get their own instance and share nothing.
//!
//! Delivery contract: events are applied in arrival order, at most once.
//! The accumulator has no reordering buffer; transports that can reorder or
//! duplicate must restore the guarantee themselves.

use crate::error::StackError;
use crate::types::events::{ShieldVerdict, TurnEvent};
use crate::types::messages::{Block, BlockKind, BlockUpdate, Message, Role, StopReason};

/// Lifecycle state of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// Accepting events
    Open,
    /// A `turn_complete` event arrived; ready to finalize
    Complete,
    /// The stream failed mid-turn, or a shield violation halted the turn
    /// under [`ViolationPolicy::Fail`]
    Failed,
    /// The caller abandoned the turn
    Discarded,
}

/// What to do when a shield reports a violation
///
/// The upstream scripts are ambiguous about whether a failed safety check
/// ends the turn, so this is a policy knob rather than hard-coded behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViolationPolicy {
    /// Record a safety notice block and keep the turn open (default);
    /// callers should treat the notice as a strong signal to stop sending
    /// input until acknowledged
    #[default]
    Notice,
    /// Record the notice, move the turn to [`TurnStatus::Failed`], and
    /// return [`StackError::ShieldViolation`] from `apply`
    Fail,
}

/// Accumulates one turn's streamed events into blocks and a final message
///
/// # Example
///
/// ```ignore
/// let mut acc = TurnAccumulator::new(session_id);
/// while let Some(event) = stream.next().await {
///     for update in acc.apply(&event?)? {
///         render(&update);
///     }
///     if acc.is_complete() {
///         history.record(&acc.finalize()?);
///         break;
///     }
/// }
/// ```
#[derive(Debug)]
pub struct TurnAccumulator {
    session_id: String,
    status: TurnStatus,
    policy: ViolationPolicy,
    open: Option<Block>,
    closed: Vec<Block>,
    stop_reason: Option<StopReason>,
    finalized: bool,
    unrecognized: u64,
}

impl TurnAccumulator {
    /// Create an accumulator for one turn of the given session
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            status: TurnStatus::Open,
            policy: ViolationPolicy::default(),
            open: None,
            closed: Vec::new(),
            stop_reason: None,
            finalized: false,
            unrecognized: 0,
        }
    }

    /// Sets the shield violation policy
    #[must_use]
    pub const fn with_policy(mut self, policy: ViolationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The session this turn belongs to
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn status(&self) -> TurnStatus {
        self.status
    }

    /// `true` once a `turn_complete` event has been applied
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == TurnStatus::Complete
    }

    /// Number of events that decoded to `Unknown` and were skipped
    #[must_use]
    pub const fn unrecognized_events(&self) -> u64 {
        self.unrecognized
    }

    /// Apply one event, in arrival order.
    ///
    /// Returns the render updates the event produced: one full-content
    /// update for a text delta or safety check, one per tool call, none for
    /// `turn_complete` or unrecognized payloads.
    ///
    /// # Errors
    ///
    /// - [`StackError::LateEvent`] if the turn is no longer open
    /// - [`StackError::ShieldViolation`] on a failed safety check under
    ///   [`ViolationPolicy::Fail`] (the notice block is still recorded)
    pub fn apply(&mut self, event: &TurnEvent) -> Result<Vec<BlockUpdate>, StackError> {
        if self.status != TurnStatus::Open {
            return Err(StackError::LateEvent {
                status: self.status,
                category: event.category(),
            });
        }

        match event {
            TurnEvent::TextDelta { text } => {
                if self.open.as_ref().is_none_or(|b| b.kind != BlockKind::Text) {
                    self.close_open();
                }
                let index = self.closed.len();
                let block = self.open.get_or_insert_with(|| Block {
                    kind: BlockKind::Text,
                    content: String::new(),
                });
                block.content.push_str(text);
                Ok(vec![BlockUpdate {
                    index,
                    kind: BlockKind::Text,
                    content: block.content.clone(),
                }])
            }
            TurnEvent::ToolCallComplete { calls } => {
                // Closes the open text block; the next delta starts a fresh one.
                self.close_open();
                let mut updates = Vec::with_capacity(calls.len());
                for call in calls {
                    let content = format!("Tool {} was used.", call.name);
                    updates.push(BlockUpdate {
                        index: self.closed.len(),
                        kind: BlockKind::ToolNotice,
                        content: content.clone(),
                    });
                    self.closed.push(Block {
                        kind: BlockKind::ToolNotice,
                        content,
                    });
                }
                Ok(updates)
            }
            TurnEvent::SafetyCheckComplete { verdict } => {
                self.close_open();
                let content = match verdict {
                    ShieldVerdict::Pass => "Message passed the safety check.".to_string(),
                    ShieldVerdict::Violation { user_message } => user_message
                        .clone()
                        .unwrap_or_else(|| "Safety violation detected.".to_string()),
                };
                let update = BlockUpdate {
                    index: self.closed.len(),
                    kind: BlockKind::SafetyNotice,
                    content: content.clone(),
                };
                self.closed.push(Block {
                    kind: BlockKind::SafetyNotice,
                    content: content.clone(),
                });
                if verdict.is_violation() && self.policy == ViolationPolicy::Fail {
                    self.status = TurnStatus::Failed;
                    tracing::warn!(session_id = %self.session_id, "shield violation halted turn");
                    return Err(StackError::ShieldViolation(content));
                }
                Ok(vec![update])
            }
            TurnEvent::TurnComplete { stop_reason } => {
                // Whitespace-only trailing blocks are dropped silently.
                if let Some(block) = self.open.take()
                    && !block.content.trim().is_empty()
                {
                    self.closed.push(block);
                }
                self.stop_reason = stop_reason.clone();
                self.status = TurnStatus::Complete;
                tracing::debug!(
                    session_id = %self.session_id,
                    blocks = self.closed.len(),
                    "turn complete"
                );
                Ok(Vec::new())
            }
            TurnEvent::Unknown { raw } => {
                self.unrecognized += 1;
                tracing::warn!(session_id = %self.session_id, payload = %raw, "skipping unrecognized stream event");
                Ok(Vec::new())
            }
        }
    }

    /// Blocks accumulated so far, closed first, then the open block if any.
    ///
    /// Remains inspectable after a mid-stream failure so a UI can render a
    /// partial response.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.closed.iter().chain(self.open.iter())
    }

    /// Concatenated content of all text blocks so far (convenience)
    #[must_use]
    pub fn current_text(&self) -> String {
        self.blocks()
            .filter(|b| b.kind == BlockKind::Text)
            .map(|b| b.content.as_str())
            .collect()
    }

    /// Abandon the turn, releasing buffered blocks without finalizing.
    ///
    /// A discarded turn rejects all later events, including `turn_complete`.
    pub fn discard(&mut self) {
        self.open = None;
        self.closed = Vec::new();
        self.status = TurnStatus::Discarded;
        tracing::debug!(session_id = %self.session_id, "turn discarded");
    }

    /// Mark the turn failed after an upstream transport error.
    ///
    /// Unlike [`discard`](Self::discard) this keeps the accumulated blocks,
    /// so callers can show "partial response, stream interrupted".
    pub fn mark_failed(&mut self) {
        if self.status == TurnStatus::Open {
            self.status = TurnStatus::Failed;
        }
    }

    /// Produce the finalized assistant message and release working state.
    ///
    /// Callable exactly once, and only after the turn completed.
    ///
    /// # Errors
    ///
    /// - [`StackError::AlreadyFinalized`] on a second call
    /// - [`StackError::IncompleteTurn`] before `turn_complete` was applied
    pub fn finalize(&mut self) -> Result<Message, StackError> {
        if self.finalized {
            return Err(StackError::AlreadyFinalized);
        }
        if self.status != TurnStatus::Complete {
            return Err(StackError::IncompleteTurn);
        }
        self.finalized = true;
        // Hand off the buffer; long-running sessions must not pile up turns.
        let content = std::mem::take(&mut self.closed);
        Ok(Message {
            role: Role::Assistant,
            content,
            stop_reason: self.stop_reason.take().unwrap_or_default(),
        })
    }

    fn close_open(&mut self) {
        if let Some(block) = self.open.take() {
            self.closed.push(block);
        }
    }
}

/// Couple a live event stream to one accumulator.
///
/// Applies each event, invokes `on_update` per render update, and finalizes
/// when the turn completes. On a transport error the accumulator is marked
/// failed and the error is returned; its partial state stays inspectable.
///
/// # Errors
///
/// Propagates accumulator errors from `apply`/`finalize`, transport errors
/// from the stream, and [`StackError::Stream`] if the stream ends before a
/// `turn_complete` event.
pub async fn drive<S, F>(
    mut stream: S,
    acc: &mut TurnAccumulator,
    mut on_update: F,
) -> Result<Message, StackError>
where
    S: futures::Stream<Item = Result<TurnEvent, StackError>> + Unpin,
    F: FnMut(&BlockUpdate),
{
    use futures::StreamExt;

    while let Some(item) = stream.next().await {
        let event = match item {
            Ok(event) => event,
            Err(e) => {
                acc.mark_failed();
                return Err(e);
            }
        };
        for update in acc.apply(&event)? {
            on_update(&update);
        }
        if acc.is_complete() {
            return acc.finalize();
        }
    }

    acc.mark_failed();
    Err(StackError::Stream(
        "event stream ended before turn_complete".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::events::ToolInvocation;

    fn delta(text: &str) -> TurnEvent {
        TurnEvent::TextDelta { text: text.into() }
    }

    fn tool(name: &str) -> TurnEvent {
        TurnEvent::ToolCallComplete {
            calls: vec![ToolInvocation {
                name: name.into(),
                arguments: None,
                output: None,
            }],
        }
    }

    #[test]
    fn text_block_reopened_after_tool_is_fresh() {
        let mut acc = TurnAccumulator::new("s");
        acc.apply(&delta("first")).unwrap();
        acc.apply(&tool("search")).unwrap();
        let updates = acc.apply(&delta("second")).unwrap();
        assert_eq!(updates[0].content, "second");
        assert_eq!(updates[0].index, 2);
    }

    #[test]
    fn whitespace_only_open_block_dropped_at_completion() {
        let mut acc = TurnAccumulator::new("s");
        acc.apply(&delta("  \n")).unwrap();
        acc.apply(&TurnEvent::TurnComplete { stop_reason: None })
            .unwrap();
        let message = acc.finalize().unwrap();
        assert!(message.content.is_empty());
    }

    #[test]
    fn mark_failed_keeps_partial_state() {
        let mut acc = TurnAccumulator::new("s");
        acc.apply(&delta("partial answer")).unwrap();
        acc.mark_failed();
        assert_eq!(acc.status(), TurnStatus::Failed);
        assert_eq!(acc.current_text(), "partial answer");
        assert!(matches!(
            acc.finalize(),
            Err(StackError::IncompleteTurn)
        ));
    }

    #[test]
    fn discard_releases_blocks() {
        let mut acc = TurnAccumulator::new("s");
        acc.apply(&delta("abandoned")).unwrap();
        acc.discard();
        assert_eq!(acc.blocks().count(), 0);
    }
}
