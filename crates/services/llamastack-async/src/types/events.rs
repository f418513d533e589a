use crate::types::messages::StopReason;

/// Fixed category set for streamed turn events
///
/// Every event maps to exactly one category; payload shapes the decoder does
/// not recognize map to [`Unknown`](EventCategory::Unknown) rather than
/// failing, so callers can log and skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    /// Incremental assistant text
    TextDelta,
    /// One or more tool invocations finished
    ToolCallComplete,
    /// A shield finished checking input or output
    SafetyCheckComplete,
    /// Terminal event for the turn
    TurnComplete,
    /// Unrecognized or malformed payload
    Unknown,
}

/// One unit of a streamed turn response, decoded once at the transport
/// boundary into a closed set of variants.
///
/// Downstream code matches exhaustively over these variants instead of
/// probing loosely-typed payloads for optional fields.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    /// A fragment of assistant text to append to the current text block
    TextDelta {
        /// Text fragment, exactly as produced upstream
        text: String,
    },
    /// A tool execution step finished
    ToolCallComplete {
        /// The invocations that ran, in upstream order
        calls: Vec<ToolInvocation>,
    },
    /// A shield call finished
    SafetyCheckComplete {
        /// Pass/fail outcome
        verdict: ShieldVerdict,
    },
    /// The turn finished; no further events are expected
    TurnComplete {
        /// Stop reason reported by the service, if any
        stop_reason: Option<StopReason>,
    },
    /// Payload the decoder could not classify; kept raw for diagnostics
    Unknown {
        /// The undecoded payload
        raw: serde_json::Value,
    },
}

impl TurnEvent {
    /// Classifies the event. Pure and total; never mutates anything.
    #[must_use]
    pub const fn category(&self) -> EventCategory {
        match self {
            Self::TextDelta { .. } => EventCategory::TextDelta,
            Self::ToolCallComplete { .. } => EventCategory::ToolCallComplete,
            Self::SafetyCheckComplete { .. } => EventCategory::SafetyCheckComplete,
            Self::TurnComplete { .. } => EventCategory::TurnComplete,
            Self::Unknown { .. } => EventCategory::Unknown,
        }
    }
}

/// A completed tool invocation reported by the service
///
/// The client never executes tools itself; it only learns that the service
/// already ran one.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    /// Tool name, e.g. `wolfram_alpha`
    pub name: String,
    /// Arguments the service passed to the tool, when reported
    pub arguments: Option<serde_json::Value>,
    /// Raw tool output, when reported
    pub output: Option<String>,
}

/// Outcome of a shield call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShieldVerdict {
    /// The checked content passed
    Pass,
    /// The checked content violated the shield's policy
    Violation {
        /// User-facing message describing the violation, if provided
        user_message: Option<String>,
    },
}

impl ShieldVerdict {
    /// Returns `true` for a failed safety check
    #[must_use]
    pub const fn is_violation(&self) -> bool {
        matches!(self, Self::Violation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_is_stable_per_variant() {
        let events = [
            (
                TurnEvent::TextDelta { text: "x".into() },
                EventCategory::TextDelta,
            ),
            (
                TurnEvent::ToolCallComplete { calls: vec![] },
                EventCategory::ToolCallComplete,
            ),
            (
                TurnEvent::SafetyCheckComplete {
                    verdict: ShieldVerdict::Pass,
                },
                EventCategory::SafetyCheckComplete,
            ),
            (
                TurnEvent::TurnComplete { stop_reason: None },
                EventCategory::TurnComplete,
            ),
            (
                TurnEvent::Unknown {
                    raw: serde_json::Value::Null,
                },
                EventCategory::Unknown,
            ),
        ];
        for (event, expected) in events {
            assert_eq!(event.category(), expected);
        }
    }
}
